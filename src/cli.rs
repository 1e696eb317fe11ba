//! Command-line interface and REPL

use anyhow::{anyhow, Result};
use colored::*;
use rustyline::DefaultEditor;

use stick_solver::{
    angle, hau_index, IntendedStick, RawStick, SolveMode, SolveRequest, StickSolver, Trig,
};

/// Parse a 16-bit yaw from decimal or `0x` hex, wrapping out-of-range
/// values modulo 65536 so `49152`, `-16384`, and `0xC000` all mean the same
/// angle.
pub fn parse_yaw(s: &str) -> Result<i16, String> {
    let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex yaw '{}': {}", s, e))?
    } else {
        s.parse::<i64>()
            .map_err(|e| format!("Invalid yaw '{}': {}", s, e))?
    };
    Ok(value as i16)
}

/// Print a solved raw pair and what it achieves.
pub fn print_result(raw: RawStick, achieved: IntendedStick) {
    println!(
        "  raw stick:    {}",
        format!("({}, {})", raw.x, raw.y).bold().green()
    );
    println!(
        "  achieves:     yaw {:#06X} (HAU {:#05X}), mag {:.4}",
        achieved.yaw.0 as u16,
        hau_index(achieved.yaw),
        achieved.mag
    );
}

pub fn run_repl<T: Trig>(solver: &StickSolver<T>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("{}", "stick-solver REPL - 'help' lists commands".bold());

    loop {
        let readline = rl.readline("stick> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                rl.add_history_entry(line).ok();
                if let Err(e) = dispatch(solver, line) {
                    println!("  {}", e.to_string().red());
                }
            }
            Err(_) => break,
        }
    }

    Ok(())
}

fn dispatch<T: Trig>(solver: &StickSolver<T>, line: &str) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts[0] {
        "help" => {
            println!("  forward X Y [FACE CAMERA [squished]]  raw stick -> adjusted + intended");
            println!("  solve YAW MAG [FACE CAMERA]           intended -> raw (heuristic)");
            println!("  exact YAW MAG [FACE CAMERA]           intended -> raw (exhaustive)");
            println!("  visual YAW MAG [FACE CAMERA]          intended -> raw (on-screen)");
            println!("  table YAW                             saturated raw stick near yaw");
            println!("  exit | quit");
        }
        "forward" => {
            let (x, y) = (parse_i8(&parts, 1)?, parse_i8(&parts, 2)?);
            let face = opt_yaw(&parts, 3)?;
            let camera = opt_yaw(&parts, 4)?;
            let squished = parts.get(5) == Some(&"squished");
            let raw = RawStick::new(x, y);
            let adjusted = raw.adjusted();
            let intended = solver.raw_to_intended(raw, face, camera, squished);
            println!(
                "  adjusted:     ({:.4}, {:.4}), mag {:.4}",
                adjusted.x, adjusted.y, adjusted.mag
            );
            println!(
                "  intended:     yaw {:#06X} (HAU {:#05X}), mag {:.4}",
                intended.yaw.0 as u16,
                hau_index(intended.yaw),
                intended.mag
            );
        }
        "solve" | "exact" | "visual" => {
            let request = SolveRequest {
                intended_yaw: parse_arg_yaw(&parts, 1)?,
                intended_mag: parse_f32(&parts, 2)?,
                face_yaw: opt_yaw(&parts, 3)?.0,
                camera_yaw: opt_yaw(&parts, 4)?.0,
                squished: false,
                relative_to: None,
                mode: match parts[0] {
                    "exact" => SolveMode::Exact,
                    "visual" => SolveMode::Visual,
                    _ => SolveMode::Heuristic,
                },
            };
            let result = stick_solver::solve_one(solver, &request);
            print_result(
                RawStick::new(result.raw_x, result.raw_y),
                IntendedStick {
                    yaw: angle(result.achieved_yaw),
                    mag: result.achieved_mag,
                },
            );
        }
        "table" => {
            let yaw = parse_arg_yaw(&parts, 1)?;
            let raw = solver.adjusted_yaw_to_raw(angle(yaw), angle(0));
            let adjusted = raw.adjusted();
            println!(
                "  raw stick:    {}  (adjusted ({:.4}, {:.4}))",
                format!("({}, {})", raw.x, raw.y).bold().green(),
                adjusted.x,
                adjusted.y
            );
        }
        other => return Err(anyhow!("Unknown command '{}', try 'help'", other)),
    }

    Ok(())
}

fn arg<'a>(parts: &[&'a str], index: usize) -> Result<&'a str> {
    parts
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("Missing argument {} - try 'help'", index))
}

fn parse_i8(parts: &[&str], index: usize) -> Result<i8> {
    let s = arg(parts, index)?;
    s.parse()
        .map_err(|e| anyhow!("Invalid stick coordinate '{}': {}", s, e))
}

fn parse_f32(parts: &[&str], index: usize) -> Result<f32> {
    let s = arg(parts, index)?;
    s.parse()
        .map_err(|e| anyhow!("Invalid magnitude '{}': {}", s, e))
}

fn parse_arg_yaw(parts: &[&str], index: usize) -> Result<i16> {
    parse_yaw(arg(parts, index)?).map_err(|e| anyhow!(e))
}

fn opt_yaw(parts: &[&str], index: usize) -> Result<stick_solver::Angle> {
    match parts.get(index) {
        Some(s) => Ok(angle(parse_yaw(s).map_err(|e| anyhow!(e))?)),
        None => Ok(angle(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaw_formats() {
        assert_eq!(parse_yaw("16384"), Ok(0x4000));
        assert_eq!(parse_yaw("0x4000"), Ok(0x4000));
        assert_eq!(parse_yaw("-16384"), Ok(-16384));
        // Out-of-range values wrap modulo 65536
        assert_eq!(parse_yaw("49152"), Ok(-16384));
        assert_eq!(parse_yaw("0xC000"), Ok(-16384));
        assert!(parse_yaw("zzz").is_err());
    }
}
