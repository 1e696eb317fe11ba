//! 16-bit wrapping angle arithmetic and HAU bucketing.
//!
//! Every yaw in the simulation is an unsigned 16-bit value that wraps modulo
//! 65536. Differences must be computed with two's-complement subtraction and
//! reinterpreted as unsigned where an index is needed; `Wrapping<i16>` makes
//! that the only arithmetic available.

use std::num::Wrapping;

/// A wrapping 16-bit integer representing an angle.
pub type Angle = Wrapping<i16>;

/// Width of a HAU bucket in angle units.
///
/// The simulation quantizes movement yaws to 16-unit buckets ("hundredths of
/// an angle unit" in community terminology), so two yaws in the same bucket
/// are indistinguishable to movement code.
pub const HAU_WIDTH: i16 = 16;

/// Construct an [`Angle`] from a plain `i16`.
pub fn angle(value: i16) -> Angle {
    Wrapping(value)
}

/// The HAU bucket index of `angle`, in `[0, 4096)`.
pub fn hau_index(angle: Angle) -> u16 {
    (angle.0 as u16) >> 4
}

/// Return the start yaw of the HAU bucket containing `angle`, relative to 0.
pub fn truncate_to_hau(angle: Angle) -> Angle {
    let hau = (angle.0 as u16) >> 4;
    Wrapping((hau << 4) as i16)
}

/// Absolute difference between the HAU buckets of `a` and `b`, both measured
/// relative to `relative_to`.
///
/// This is an index difference, not a wrapping angular distance: buckets are
/// first re-based onto `relative_to` (with wraparound), then compared as plain
/// indices in `[0, 4096)`. Matches the cost used by the exact inversion.
pub fn hau_distance(a: Angle, b: Angle, relative_to: Angle) -> u16 {
    hau_index(a - relative_to).abs_diff(hau_index(b - relative_to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_hau() {
        assert_eq!(truncate_to_hau(angle(0)), angle(0));
        assert_eq!(truncate_to_hau(angle(15)), angle(0));
        assert_eq!(truncate_to_hau(angle(16)), angle(16));
        assert_eq!(truncate_to_hau(angle(0x4007)), angle(0x4000));
        // Negative yaws reinterpret as large unsigned values before bucketing
        assert_eq!(truncate_to_hau(angle(-1)), angle(-16));
    }

    #[test]
    fn test_hau_index_wraps() {
        assert_eq!(hau_index(angle(-1)), 0xFFF);
        assert_eq!(hau_index(angle(i16::MIN)), 0x800);
        assert_eq!(hau_index(angle(0x4000)), 0x400);
    }

    #[test]
    fn test_hau_distance_rebases_on_relative_to() {
        // 0xFFF8 and 0x0008 straddle the wrap point: far apart as raw
        // indices, adjacent once re-based near the wrap.
        assert_eq!(hau_distance(angle(-8), angle(8), angle(0)), 0xFFF);
        assert_eq!(hau_distance(angle(-8), angle(8), angle(-8)), 1);
    }

    #[test]
    fn test_wrapping_subtraction() {
        let a = angle(i16::MIN);
        let b = angle(i16::MAX);
        assert_eq!((a - b).0, 1);
        assert_eq!((b - a).0, -1);
    }
}
