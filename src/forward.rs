//! Forward model: raw stick reading to adjusted stick to intended motion.
//!
//! These are the simulation's own input calculations, reproduced exactly.
//! Everything downstream (table construction, brute-force search, the
//! closed-form inverses) is defined in terms of these two functions.

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::trig::Trig;

/// Maximum adjusted stick magnitude.
pub const MAX_ADJUSTED_MAG: f32 = 64.0;

/// A raw analog stick reading, one signed byte per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawStick {
    /// Raw stick x, `[-128, 127]`.
    pub x: i8,
    /// Raw stick y, `[-128, 127]`.
    pub y: i8,
}

impl RawStick {
    /// Construct a raw stick value.
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// The adjusted stick this reading produces.
    pub fn adjusted(self) -> AdjustedStick {
        stick_raw_to_adjusted(self.x, self.y)
    }
}

/// The joystick's state after removing the dead zone and capping the
/// magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustedStick {
    /// Adjusted stick x.
    pub x: f32,
    /// Adjusted stick y.
    pub y: f32,
    /// Adjusted magnitude, `[0, 64]`.
    pub mag: f32,
}

/// The movement the simulation reads out of an adjusted stick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntendedStick {
    /// Intended yaw in world space.
    pub yaw: Angle,
    /// Intended magnitude, normally `[0, 32]`.
    pub mag: f32,
}

/// In-game calculation converting raw stick inputs to adjusted.
///
/// Each axis is dead-zoned (zeroed below a raw magnitude of 8, pulled 6
/// toward zero otherwise), then the pair is clamped to a Euclidean magnitude
/// of 64. Total over the full `i8` domain.
pub fn stick_raw_to_adjusted(raw_stick_x: i8, raw_stick_y: i8) -> AdjustedStick {
    let mut x = 0.0;
    let mut y = 0.0;

    if raw_stick_x <= -8 {
        x = f32::from(raw_stick_x) + 6.0;
    }
    if raw_stick_x >= 8 {
        x = f32::from(raw_stick_x) - 6.0;
    }
    if raw_stick_y <= -8 {
        y = f32::from(raw_stick_y) + 6.0;
    }
    if raw_stick_y >= 8 {
        y = f32::from(raw_stick_y) - 6.0;
    }

    let mut mag = (x * x + y * y).sqrt();

    if mag > MAX_ADJUSTED_MAG {
        x *= MAX_ADJUSTED_MAG / mag;
        y *= MAX_ADJUSTED_MAG / mag;
        mag = MAX_ADJUSTED_MAG;
    }

    AdjustedStick { x, y, mag }
}

/// In-game calculation converting adjusted stick to intended.
///
/// The magnitude is squared-and-rescaled then halved (divided by 8 instead
/// when `squished`). A zero intended magnitude leaves no defined direction,
/// so the yaw falls back to `face_yaw`; otherwise it is the stick's angle in
/// camera space.
pub fn stick_adjusted_to_intended<T: Trig + ?Sized>(
    trig: &T,
    stick: AdjustedStick,
    face_yaw: Angle,
    camera_yaw: Angle,
    squished: bool,
) -> IntendedStick {
    let mag = ((stick.mag / 64.0) * (stick.mag / 64.0)) * 64.0;

    let intended_mag = if !squished { mag / 2.0 } else { mag / 8.0 };

    let intended_yaw = if intended_mag > 0.0 {
        trig.atan2s(-stick.y, stick.x) + camera_yaw
    } else {
        face_yaw
    };

    IntendedStick {
        yaw: intended_yaw,
        mag: intended_mag,
    }
}
