//! Trigonometry matching the simulation's fixed-point conventions.
//!
//! The forward model and the inversions never call `f32::atan2` or
//! `f32::sin` directly: the simulation computes angles through a baked
//! arctangent table and reads sines out of a 4096-entry table (with the
//! cosine aliased 0x400 entries further in). Which convention is in effect
//! is a capability injected at construction, so hosts that dump the tables
//! straight out of the simulation binary get bit-exact angles, while
//! everything else can fall back to continuous float math.

use std::num::Wrapping;

use thiserror::Error;

use crate::angle::Angle;

/// Number of `f32` entries in the combined sine/cosine table.
///
/// 4096 sine entries for the full circle, plus the 1024-entry tail that the
/// cosine alias at offset [`COSINE_OFFSET`] reads into.
pub const SINE_TABLE_LEN: usize = 0x1400;

/// Offset of the cosine alias within the sine table.
pub const COSINE_OFFSET: usize = 0x400;

/// Number of entries in the arctangent table (inputs 0/1024 ..= 1024/1024).
pub const ARCTAN_TABLE_LEN: usize = 0x401;

/// Trigonometry capability in the simulation's conventions.
///
/// `atan2s(x, y)` returns the 16-bit angle of the point `(x, y)`;
/// `sins`/`coss` evaluate the simulation's sine and cosine for a 16-bit
/// angle. All angle wraparound is the caller's concern.
pub trait Trig {
    /// 16-bit angle of the point `(x, y)`.
    fn atan2s(&self, x: f32, y: f32) -> Angle;

    /// Sine of a 16-bit angle.
    fn sins(&self, angle: Angle) -> f32;

    /// Cosine of a 16-bit angle.
    fn coss(&self, angle: Angle) -> f32;
}

/// Continuous floating-point approximation of the simulation's trig.
///
/// Close to [`TableTrig`] everywhere (within one angle unit for `atan2s`,
/// within table-step resolution for `sins`/`coss`) but not bit-exact; use it
/// when a dumped table is unavailable and exactness does not matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatTrig;

impl Trig for FloatTrig {
    fn atan2s(&self, x: f32, y: f32) -> Angle {
        Wrapping(((y.atan2(x) / std::f32::consts::PI) * 0x8000 as f32) as i16)
    }

    fn sins(&self, angle: Angle) -> f32 {
        (angle.0 as f32 / 0x8000 as f32 * std::f32::consts::PI).sin()
    }

    fn coss(&self, angle: Angle) -> f32 {
        (angle.0 as f32 / 0x8000 as f32 * std::f32::consts::PI).cos()
    }
}

/// Error validating injected trig tables.
#[derive(Debug, Error)]
pub enum TrigTableError {
    /// The sine table must hold [`SINE_TABLE_LEN`] entries.
    #[error("sine table holds {0} entries, expected {SINE_TABLE_LEN}")]
    SineTableLen(usize),

    /// The arctangent table must hold [`ARCTAN_TABLE_LEN`] entries.
    #[error("arctangent table holds {0} entries, expected {ARCTAN_TABLE_LEN}")]
    ArctanTableLen(usize),
}

/// Table-backed trig reproducing the simulation's fixed-point results.
///
/// Sine and cosine are read out of the combined table exactly the way the
/// simulation indexes it (`table[(u16 angle) >> 4]`, cosine at `+0x400`);
/// `atan2s` runs the same eight-octant reduction over the arctangent table.
#[derive(Debug, Clone)]
pub struct TableTrig {
    sine: Box<[f32]>,
    arctan: Box<[u16]>,
}

impl TableTrig {
    /// Synthesize both tables from the formulas the baked tables were
    /// generated with.
    ///
    /// Entry `i` of the sine table is `sin(i * 2pi / 4096)` (the tail past
    /// 4096 repeats the first quarter, which is what the cosine alias
    /// reads); entry `i` of the arctangent table is
    /// `round(atan(i / 1024) / pi * 0x8000)`.
    pub fn generate() -> Self {
        let sine = (0..SINE_TABLE_LEN)
            .map(|i| (i as f64 * std::f64::consts::TAU / 4096.0).sin() as f32)
            .collect();
        let arctan = (0..ARCTAN_TABLE_LEN)
            .map(|i| {
                ((i as f64 / 1024.0).atan() / std::f64::consts::PI * 0x8000 as f64).round() as u16
            })
            .collect();
        Self { sine, arctan }
    }

    /// Build from tables dumped out of the simulation binary.
    ///
    /// `sine` is the combined sine/cosine table ([`SINE_TABLE_LEN`] floats
    /// starting at the sine table's base address); `arctan` is the
    /// [`ARCTAN_TABLE_LEN`]-entry arctangent table. Lengths are validated so
    /// a bad dump fails here rather than producing silently wrong angles.
    pub fn from_parts(sine: Vec<f32>, arctan: Vec<u16>) -> Result<Self, TrigTableError> {
        if sine.len() != SINE_TABLE_LEN {
            return Err(TrigTableError::SineTableLen(sine.len()));
        }
        if arctan.len() != ARCTAN_TABLE_LEN {
            return Err(TrigTableError::ArctanTableLen(arctan.len()));
        }
        Ok(Self {
            sine: sine.into_boxed_slice(),
            arctan: arctan.into_boxed_slice(),
        })
    }

    /// `atan(n / d)` through the table, for `0 <= n <= d`.
    ///
    /// A zero divisor short-circuits to the first table entry, mirroring the
    /// simulation's own guard.
    fn atan_lookup(&self, n: f32, d: f32) -> u16 {
        if d == 0.0 {
            self.arctan[0]
        } else {
            self.arctan[(n / d * 1024.0 + 0.5) as i32 as usize]
        }
    }
}

impl Trig for TableTrig {
    fn atan2s(&self, x: f32, y: f32) -> Angle {
        // Octant reduction over the point (x, y): each branch reduces to an
        // arctangent of a ratio in [0, 1].
        let ret: u16 = if y >= 0.0 {
            if x >= 0.0 {
                if x >= y {
                    self.atan_lookup(y, x)
                } else {
                    0x4000 - self.atan_lookup(x, y)
                }
            } else {
                let x = -x;
                if x < y {
                    0x4000 + self.atan_lookup(x, y)
                } else {
                    0x8000u16.wrapping_sub(self.atan_lookup(y, x))
                }
            }
        } else {
            let y = -y;
            if x < 0.0 {
                let x = -x;
                if x >= y {
                    0x8000u16.wrapping_add(self.atan_lookup(y, x))
                } else {
                    0xC000 - self.atan_lookup(x, y)
                }
            } else if x < y {
                0xC000 + self.atan_lookup(x, y)
            } else {
                self.atan_lookup(y, x).wrapping_neg()
            }
        };
        Wrapping(ret as i16)
    }

    fn sins(&self, angle: Angle) -> f32 {
        self.sine[((angle.0 as u16) >> 4) as usize]
    }

    fn coss(&self, angle: Angle) -> f32 {
        self.sine[COSINE_OFFSET + ((angle.0 as u16) >> 4) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::angle;

    fn wrapping_diff(a: Angle, b: Angle) -> i16 {
        (a - b).0
    }

    #[test]
    fn test_table_atan2s_cardinals() {
        let trig = TableTrig::generate();
        assert_eq!(trig.atan2s(64.0, 0.0), angle(0));
        assert_eq!(trig.atan2s(0.0, 64.0), angle(0x4000));
        assert_eq!(trig.atan2s(-64.0, 0.0), angle(i16::MIN)); // 0x8000
        assert_eq!(trig.atan2s(0.0, -64.0), angle(-0x4000)); // 0xC000
    }

    #[test]
    fn test_table_atan2s_diagonals() {
        let trig = TableTrig::generate();
        assert_eq!(trig.atan2s(64.0, 64.0), angle(0x2000));
        assert_eq!(trig.atan2s(-64.0, 64.0), angle(0x6000));
        assert_eq!(trig.atan2s(-64.0, -64.0), angle(-0x6000)); // 0xA000
        assert_eq!(trig.atan2s(64.0, -64.0), angle(-0x2000)); // 0xE000
    }

    #[test]
    fn test_table_sins_coss_quadrature() {
        let trig = TableTrig::generate();
        assert_eq!(trig.sins(angle(0)), 0.0);
        assert_eq!(trig.sins(angle(0x4000)), 1.0);
        assert_eq!(trig.coss(angle(0)), 1.0);
        // coss reads the aliased tail of the table
        assert!((trig.coss(angle(0x4000))).abs() < 1e-6);
        assert!((trig.coss(angle(i16::MIN)) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_float_and_table_agree() {
        let table = TableTrig::generate();
        let float = FloatTrig;
        for i in 0..256 {
            let yaw = angle((i * 257) as u16 as i16);
            assert!(
                (table.sins(yaw) - float.sins(yaw)).abs() < 0.03,
                "sins mismatch at {:?}",
                yaw
            );
            assert!(
                (table.coss(yaw) - float.coss(yaw)).abs() < 0.03,
                "coss mismatch at {:?}",
                yaw
            );
        }
        for &(x, y) in &[
            (64.0f32, 0.0f32),
            (0.0, 64.0),
            (-3.0, 59.0),
            (40.0, -40.0),
            (-17.0, -55.0),
            (1.0, 2.0),
        ] {
            let diff = wrapping_diff(table.atan2s(x, y), float.atan2s(x, y));
            assert!(diff.abs() <= 16, "atan2s mismatch at ({x}, {y}): {diff}");
        }
    }

    #[test]
    fn test_from_parts_validates_lengths() {
        assert!(matches!(
            TableTrig::from_parts(vec![0.0; 10], vec![0; ARCTAN_TABLE_LEN]),
            Err(TrigTableError::SineTableLen(10))
        ));
        assert!(matches!(
            TableTrig::from_parts(vec![0.0; SINE_TABLE_LEN], vec![0; 3]),
            Err(TrigTableError::ArctanTableLen(3))
        ));
        let generated = TableTrig::generate();
        let rebuilt =
            TableTrig::from_parts(generated.sine.to_vec(), generated.arctan.to_vec()).unwrap();
        assert_eq!(rebuilt.atan2s(12.0, 51.0), generated.atan2s(12.0, 51.0));
    }
}
