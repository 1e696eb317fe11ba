//! Batch solving for input-replay generation.
//!
//! Requests arrive as JSON lines (one intended motion per line), results
//! leave the same way, so a TAS pipeline can pipe a whole movement segment
//! through the solver and splat the raw pairs into its replay file.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::angle::{angle, Angle};
use crate::forward::IntendedStick;
use crate::solver::StickSolver;
use crate::trig::Trig;

/// Which inversion a request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMode {
    /// Hybrid table/closed-form inversion (fast, the default).
    #[default]
    Heuristic,
    /// Exhaustive HAU-exact search.
    Exact,
    /// Exhaustive search in the on-screen sine/cosine plane.
    Visual,
}

/// One intended motion to invert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Target intended yaw.
    pub intended_yaw: i16,
    /// Target intended magnitude; clamped into `[0, 32]`.
    pub intended_mag: f32,
    /// Facing yaw at the start of the frame.
    pub face_yaw: i16,
    /// Camera yaw for the frame.
    pub camera_yaw: i16,
    /// Whether the squished sensitivity scaling applies.
    #[serde(default)]
    pub squished: bool,
    /// HAU alignment reference; defaults to `face_yaw`.
    #[serde(default)]
    pub relative_to: Option<i16>,
    /// Inversion to use.
    #[serde(default)]
    pub mode: SolveMode,
}

/// A solved raw stick pair plus what it actually achieves through the
/// forward model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    /// Raw stick x to feed the replay.
    pub raw_x: i8,
    /// Raw stick y to feed the replay.
    pub raw_y: i8,
    /// Intended yaw the raw pair produces.
    pub achieved_yaw: i16,
    /// Intended magnitude the raw pair produces.
    pub achieved_mag: f32,
}

/// Solve a single request.
pub fn solve_one<T: Trig>(solver: &StickSolver<T>, request: &SolveRequest) -> SolveResult {
    let face_yaw = angle(request.face_yaw);
    let camera_yaw = angle(request.camera_yaw);
    let relative_to: Angle = angle(request.relative_to.unwrap_or(request.face_yaw));
    let target = IntendedStick {
        yaw: angle(request.intended_yaw),
        mag: request.intended_mag.clamp(0.0, 32.0),
    };

    let raw = match request.mode {
        SolveMode::Heuristic => {
            solver.intended_to_raw(target, face_yaw, camera_yaw, request.squished, relative_to)
        }
        SolveMode::Exact => solver.intended_to_raw_exact(
            target,
            face_yaw,
            camera_yaw,
            request.squished,
            relative_to,
        ),
        SolveMode::Visual => {
            solver.intended_to_raw_visual(target, face_yaw, camera_yaw, request.squished)
        }
    };

    let achieved = solver.raw_to_intended(raw, face_yaw, camera_yaw, request.squished);
    SolveResult {
        raw_x: raw.x,
        raw_y: raw.y,
        achieved_yaw: achieved.yaw.0,
        achieved_mag: achieved.mag,
    }
}

/// Run a JSON-lines batch: one [`SolveRequest`] per input line, one
/// [`SolveResult`] per output line. Blank lines are skipped. Returns the
/// number of requests solved.
pub fn run_batch<T: Trig>(
    solver: &StickSolver<T>,
    reader: impl BufRead,
    mut writer: impl Write,
) -> Result<usize> {
    let mut solved = 0;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_number + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let request: SolveRequest = serde_json::from_str(&line)
            .with_context(|| format!("Invalid solve request on line {}", line_number + 1))?;
        let result = solve_one(solver, &request);

        serde_json::to_writer(&mut writer, &result)
            .with_context(|| format!("Failed to write result for line {}", line_number + 1))?;
        writeln!(writer)?;
        solved += 1;
    }

    debug!(solved, "batch complete");
    Ok(solved)
}
