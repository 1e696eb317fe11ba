//! Brute-force search primitives over the raw stick domain.
//!
//! The stick-to-intention transform has no closed-form inverse, so the
//! authoritative inversions exhaustively scan all 65536 raw pairs. That is a
//! deliberate offline/tooling trade-off; nothing here belongs on a per-frame
//! hot path.

use crate::forward::RawStick;

/// Exhaustively minimize `cost` over the full raw stick domain.
///
/// Scans in raster order (x outer ascending, y inner ascending) and keeps
/// the first strict minimum, so ties resolve to the earliest candidate. The
/// cost may be any `PartialOrd` value; lexicographic tuples work for
/// prioritized criteria.
pub fn raw_joystick_min<C, F>(cost: F) -> RawStick
where
    C: PartialOrd,
    F: FnMut(RawStick) -> C,
{
    raw_joystick_min_bounded(i8::MIN.into(), i8::MAX.into(), i8::MIN.into(), i8::MAX.into(), cost)
}

/// [`raw_joystick_min`] restricted to a rectangular sub-region.
///
/// Bounds are inclusive and clamped to the valid `i8` domain, so callers can
/// pass a window centered near the domain edge without fuss. Useful when an
/// approximate solution is already known and only local refinement is
/// needed.
pub fn raw_joystick_min_bounded<C, F>(
    x_min: i16,
    x_max: i16,
    y_min: i16,
    y_max: i16,
    mut cost: F,
) -> RawStick
where
    C: PartialOrd,
    F: FnMut(RawStick) -> C,
{
    let x_min = x_min.clamp(i8::MIN.into(), i8::MAX.into()) as i8;
    let x_max = x_max.clamp(i8::MIN.into(), i8::MAX.into()) as i8;
    let y_min = y_min.clamp(i8::MIN.into(), i8::MAX.into()) as i8;
    let y_max = y_max.clamp(i8::MIN.into(), i8::MAX.into()) as i8;

    let mut best = RawStick::new(x_min, y_min);
    let mut best_cost = cost(best);

    for x in x_min..=x_max {
        for y in y_min..=y_max {
            let candidate = RawStick::new(x, y);
            let value = cost(candidate);
            if value < best_cost {
                best = candidate;
                best_cost = value;
            }
        }
    }

    best
}

/// Offsets in nearest-first order with negative offsets before their
/// positive mirrors: `0, -1, +1, -2, +2, ...`
///
/// The tie-break direction is load-bearing for the table-based inversion:
/// when two buckets are equidistant from the target, the lower one wins.
pub fn expanding_offsets() -> impl Iterator<Item = i32> {
    (0i32..)
        .flat_map(|d| if d == 0 { [Some(0), None] } else { [Some(-d), Some(d)] })
        .flatten()
}
