//! Inverse-solve N64-style analog stick inputs from intended movement.
//!
//! The simulation turns a raw two-byte joystick reading into an "intended"
//! movement yaw and magnitude through a dead zone, a magnitude clamp, a
//! squaring curve, and fixed-point trig. That transform has no closed-form
//! inverse, so this crate reimplements it exactly ([`forward`]) and layers
//! inversions on top: exhaustive search ([`search`]), a precomputed
//! saturated-yaw table ([`table`]), closed-form approximation, and a hybrid
//! of the three ([`solver`]).
//!
//! The trig convention is injected (see [`trig`]): supply the simulation's
//! own dumped tables for bit-exact angles or fall back to float math.

pub mod angle;
pub mod batch;
pub mod forward;
pub mod search;
pub mod solver;
pub mod table;
pub mod trig;

pub use angle::{angle, hau_distance, hau_index, truncate_to_hau, Angle, HAU_WIDTH};
pub use batch::{run_batch, solve_one, SolveMode, SolveRequest, SolveResult};
pub use forward::{
    stick_adjusted_to_intended, stick_raw_to_adjusted, AdjustedStick, IntendedStick, RawStick,
    MAX_ADJUSTED_MAG,
};
pub use search::{expanding_offsets, raw_joystick_min, raw_joystick_min_bounded};
pub use solver::{
    stick_adjusted_to_raw_approx, stick_adjusted_to_raw_euclidean, stick_adjusted_to_raw_refined,
    stick_intended_to_adjusted_approx, StickSolver,
};
pub use table::AdjustedYawTable;
pub use trig::{FloatTrig, TableTrig, Trig, TrigTableError};
