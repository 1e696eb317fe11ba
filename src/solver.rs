//! Inverse solving: recover raw stick inputs from intended motion.
//!
//! Three families of inversion with different accuracy/cost trade-offs:
//!
//! - **Exact brute force** ([`StickSolver::intended_to_raw_exact`],
//!   [`StickSolver::intended_to_raw_visual`]) scans the whole raw domain.
//!   Authoritative, and slow on purpose.
//! - **Table-based** ([`StickSolver::adjusted_yaw_to_raw`]) answers
//!   saturated-direction queries from the precomputed adjusted-yaw table.
//! - **Closed-form approximation** ([`stick_intended_to_adjusted_approx`],
//!   [`stick_adjusted_to_raw_approx`]) algebraically inverts the forward
//!   model where it is invertible.
//!
//! [`StickSolver::intended_to_raw`] dispatches between the last two: at
//! saturation the discretization error is worst and the table is exact, so
//! it takes the table path; below saturation the direct inverse is already
//! faithful.

use tracing::debug;

use crate::angle::{hau_distance, Angle};
use crate::forward::{
    stick_adjusted_to_intended, AdjustedStick, IntendedStick, RawStick, MAX_ADJUSTED_MAG,
};
use crate::search::{raw_joystick_min, raw_joystick_min_bounded};
use crate::table::AdjustedYawTable;
use crate::trig::{TableTrig, Trig};

/// Return an adjusted stick whose intended stick is approximately equal to
/// `intended`.
///
/// Direct algebraic inverse of the adjusted-to-intended transform. Only
/// approximate: the rounding to integral axes and the forward dead-zone and
/// magnitude clamp are not perfectly invertible. May not be accurate if the
/// resulting magnitude is >= 64.
pub fn stick_intended_to_adjusted_approx<T: Trig + ?Sized>(
    trig: &T,
    intended: IntendedStick,
    _face_yaw: Angle,
    camera_yaw: Angle,
    squished: bool,
) -> AdjustedStick {
    let mag = if !squished {
        intended.mag * 2.0
    } else {
        intended.mag * 8.0
    };

    let adjusted_mag = (mag / 64.0).sqrt() * 64.0;

    AdjustedStick {
        x: (trig.sins(intended.yaw - camera_yaw) * adjusted_mag).round(),
        y: (-trig.coss(intended.yaw - camera_yaw) * adjusted_mag).round(),
        mag: adjusted_mag,
    }
}

/// Return a raw stick value whose adjusted stick is approximately equal to
/// `adjusted`.
///
/// Inverts only the dead-zone correction, so it is valid when the magnitude
/// never hit the 64 clamp; calling it on a saturated adjusted stick yields
/// an unspecified (but in-range) raw value.
pub fn stick_adjusted_to_raw_approx(adjusted: AdjustedStick) -> RawStick {
    let mut raw_stick_x = 0;
    let mut raw_stick_y = 0;

    if adjusted.x <= -2.0 {
        raw_stick_x = (adjusted.x - 6.0) as i8;
    }
    if adjusted.x >= 2.0 {
        raw_stick_x = (adjusted.x + 6.0) as i8;
    }
    if adjusted.y <= -2.0 {
        raw_stick_y = (adjusted.y - 6.0) as i8;
    }
    if adjusted.y >= 2.0 {
        raw_stick_y = (adjusted.y + 6.0) as i8;
    }

    RawStick::new(raw_stick_x, raw_stick_y)
}

/// Return the raw stick value whose adjusted stick is closest to the given
/// adjusted inputs, based on Euclidean distance.
pub fn stick_adjusted_to_raw_euclidean(target_x: f32, target_y: f32) -> RawStick {
    raw_joystick_min(|raw| {
        let adjusted = raw.adjusted();
        let dx = adjusted.x - target_x;
        let dy = adjusted.y - target_y;
        dx * dx + dy * dy
    })
}

/// Dead-zone inverse followed by a local Euclidean refinement around the
/// seed, for adjusted targets that may not sit exactly on the inverse's
/// assumptions.
pub fn stick_adjusted_to_raw_refined(adjusted: AdjustedStick) -> RawStick {
    let seed = stick_adjusted_to_raw_approx(adjusted);
    raw_joystick_min_bounded(
        i16::from(seed.x) - 2,
        i16::from(seed.x) + 2,
        i16::from(seed.y) - 2,
        i16::from(seed.y) + 2,
        |raw| {
            let candidate = raw.adjusted();
            let dx = candidate.x - adjusted.x;
            let dy = candidate.y - adjusted.y;
            dx * dx + dy * dy
        },
    )
}

/// Inversion façade owning the trig capability and the adjusted-yaw table.
///
/// Construction is the subsystem's one initialization step: it builds the
/// 65536-slot table from the forward model, after which every method is a
/// pure read. Share by reference.
#[derive(Debug, Clone)]
pub struct StickSolver<T: Trig = TableTrig> {
    trig: T,
    table: AdjustedYawTable,
}

impl StickSolver<TableTrig> {
    /// Solver over synthesized simulation tables.
    pub fn with_generated_tables() -> Self {
        Self::new(TableTrig::generate())
    }
}

impl<T: Trig> StickSolver<T> {
    /// Build a solver, constructing the adjusted-yaw table from `trig`.
    pub fn new(trig: T) -> Self {
        let table = AdjustedYawTable::build(&trig);
        Self { trig, table }
    }

    /// The injected trig capability.
    pub fn trig(&self) -> &T {
        &self.trig
    }

    /// The precomputed adjusted-yaw table.
    pub fn table(&self) -> &AdjustedYawTable {
        &self.table
    }

    /// Forward model: the intended motion a raw stick produces.
    pub fn raw_to_intended(
        &self,
        raw: RawStick,
        face_yaw: Angle,
        camera_yaw: Angle,
        squished: bool,
    ) -> IntendedStick {
        stick_adjusted_to_intended(&self.trig, raw.adjusted(), face_yaw, camera_yaw, squished)
    }

    /// Find a raw stick with maximum adjusted magnitude in the nearest HAU
    /// to `target_yaw` (HAUs aligned relative to `relative_to`), in
    /// adjusted space.
    pub fn adjusted_yaw_to_raw(&self, target_yaw: Angle, relative_to: Angle) -> RawStick {
        self.table.adjusted_yaw_to_raw(target_yaw, relative_to)
    }

    /// Exact inversion by exhaustive search.
    ///
    /// Minimizes, in priority order, the HAU distance between achieved and
    /// target intended yaw (both taken relative to `relative_to`), then the
    /// absolute intended-magnitude difference. The result is a true
    /// preimage up to those criteria, not necessarily the unique one.
    pub fn intended_to_raw_exact(
        &self,
        target: IntendedStick,
        face_yaw: Angle,
        camera_yaw: Angle,
        squished: bool,
        relative_to: Angle,
    ) -> RawStick {
        raw_joystick_min(|raw| {
            let intended =
                stick_adjusted_to_intended(&self.trig, raw.adjusted(), face_yaw, camera_yaw, squished);
            (
                hau_distance(target.yaw, intended.yaw, relative_to),
                (target.mag - intended.mag).abs(),
            )
        })
    }

    /// Exhaustive inversion minimizing on-screen difference.
    ///
    /// Measures candidates against the target in the intended sine/cosine
    /// plane, so the result is the visually closest motion rather than the
    /// closest HAU; useful when displayed direction matters more than the
    /// simulation's bucketed yaw.
    pub fn intended_to_raw_visual(
        &self,
        target: IntendedStick,
        face_yaw: Angle,
        camera_yaw: Angle,
        squished: bool,
    ) -> RawStick {
        let target_s = target.mag * self.trig.sins(target.yaw);
        let target_c = target.mag * self.trig.coss(target.yaw);

        raw_joystick_min(|raw| {
            let intended =
                stick_adjusted_to_intended(&self.trig, raw.adjusted(), face_yaw, camera_yaw, squished);
            let s = intended.mag * self.trig.sins(intended.yaw);
            let c = intended.mag * self.trig.coss(intended.yaw);

            let ds = s - target_s;
            let dc = c - target_c;
            ds * ds + dc * dc
        })
    }

    /// Find a raw joystick value that approximately maps to the given
    /// intended inputs.
    ///
    /// If the approximated input has maximum magnitude, produce a raw input
    /// in a nearby HAU of the intended yaw (relative to `relative_to`) via
    /// the table, shifting both yaws by `-camera_yaw` since the table lives
    /// in adjusted space. Otherwise return a raw joystick that maps to a
    /// nearby adjusted input, without worrying about exact angle or
    /// magnitude.
    pub fn intended_to_raw(
        &self,
        intended: IntendedStick,
        face_yaw: Angle,
        camera_yaw: Angle,
        squished: bool,
        relative_to: Angle,
    ) -> RawStick {
        let adjusted =
            stick_intended_to_adjusted_approx(&self.trig, intended, face_yaw, camera_yaw, squished);

        if adjusted.mag >= MAX_ADJUSTED_MAG {
            debug!(yaw = intended.yaw.0, "saturated target, using table path");
            self.table
                .adjusted_yaw_to_raw(intended.yaw - camera_yaw, relative_to - camera_yaw)
        } else {
            stick_adjusted_to_raw_approx(adjusted)
        }
    }
}
