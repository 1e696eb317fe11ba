//! stick-solver - Rust implementation
//!
//! Solve N64-style raw analog stick inputs from intended movement yaw and
//! magnitude, for TAS input-replay tooling.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use stick_solver::{
    angle, FloatTrig, IntendedStick, RawStick, SolveMode, SolveRequest, StickSolver, Trig,
};

/// Stick Solver - invert the simulation's stick-to-intention transform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Use continuous float trig instead of the simulation's tables
    #[arg(long)]
    float_trig: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a raw stick through the forward model
    Forward {
        /// Raw stick x, [-128, 127]
        #[arg(allow_negative_numbers = true)]
        raw_x: i8,
        /// Raw stick y, [-128, 127]
        #[arg(allow_negative_numbers = true)]
        raw_y: i8,
        /// Facing yaw
        #[arg(long, default_value = "0", value_parser = cli::parse_yaw)]
        face_yaw: i16,
        /// Camera yaw
        #[arg(long, default_value = "0", value_parser = cli::parse_yaw)]
        camera_yaw: i16,
        /// Apply squished sensitivity scaling
        #[arg(long)]
        squished: bool,
    },

    /// Solve a raw stick for an intended yaw and magnitude
    Solve {
        /// Target intended yaw (decimal or 0x hex)
        #[arg(value_parser = cli::parse_yaw, allow_negative_numbers = true)]
        yaw: i16,
        /// Target intended magnitude, [0, 32]
        #[arg(allow_negative_numbers = true)]
        mag: f32,
        /// Facing yaw
        #[arg(long, default_value = "0", value_parser = cli::parse_yaw)]
        face_yaw: i16,
        /// Camera yaw
        #[arg(long, default_value = "0", value_parser = cli::parse_yaw)]
        camera_yaw: i16,
        /// Apply squished sensitivity scaling
        #[arg(long)]
        squished: bool,
        /// HAU alignment reference (defaults to the facing yaw)
        #[arg(long, value_parser = cli::parse_yaw)]
        relative_to: Option<i16>,
        /// Exhaustive HAU-exact search instead of the heuristic
        #[arg(long, conflicts_with = "visual")]
        exact: bool,
        /// Exhaustive on-screen-distance search instead of the heuristic
        #[arg(long)]
        visual: bool,
    },

    /// Export the adjusted-yaw table as CSV
    DumpTable {
        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve a JSON-lines stream of requests
    Batch {
        /// Input path (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive solving session
    Repl,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    if args.float_trig {
        run(StickSolver::new(FloatTrig), args.command)
    } else {
        run(StickSolver::with_generated_tables(), args.command)
    }
}

fn run<T: Trig>(solver: StickSolver<T>, command: Command) -> Result<()> {
    match command {
        Command::Forward {
            raw_x,
            raw_y,
            face_yaw,
            camera_yaw,
            squished,
        } => {
            let raw = RawStick::new(raw_x, raw_y);
            let adjusted = raw.adjusted();
            let intended =
                solver.raw_to_intended(raw, angle(face_yaw), angle(camera_yaw), squished);
            println!("{}", "=== Forward Model ===".bold().cyan());
            println!(
                "  adjusted:     ({:.4}, {:.4}), mag {:.4}",
                adjusted.x, adjusted.y, adjusted.mag
            );
            cli::print_result(raw, intended);
        }

        Command::Solve {
            yaw,
            mag,
            face_yaw,
            camera_yaw,
            squished,
            relative_to,
            exact,
            visual,
        } => {
            let request = SolveRequest {
                intended_yaw: yaw,
                intended_mag: mag,
                face_yaw,
                camera_yaw,
                squished,
                relative_to,
                mode: if exact {
                    SolveMode::Exact
                } else if visual {
                    SolveMode::Visual
                } else {
                    SolveMode::Heuristic
                },
            };
            let result = stick_solver::solve_one(&solver, &request);
            println!("{}", "=== Solved ===".bold().cyan());
            cli::print_result(
                RawStick::new(result.raw_x, result.raw_y),
                IntendedStick {
                    yaw: angle(result.achieved_yaw),
                    mag: result.achieved_mag,
                },
            );
        }

        Command::DumpTable { output } => {
            let rows = match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let rows = solver.table().write_csv(BufWriter::new(file))?;
                    info!("Wrote {} rows to {}", rows, path.display());
                    rows
                }
                None => solver.table().write_csv(io::stdout().lock())?,
            };
            eprintln!("{} saturated yaw entries", rows);
        }

        Command::Batch { input, output } => {
            let reader: Box<dyn BufRead> = match input {
                Some(path) => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                )),
                None => Box::new(io::stdin().lock()),
            };
            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };
            let solved = stick_solver::run_batch(&solver, reader, writer)?;
            info!("Solved {} requests", solved);
        }

        Command::Repl => cli::run_repl(&solver)?,
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
