//! `ratsimplex` binary: runs a benchmark file of (formula, expected-result)
//! line pairs through the solver and reports pass/fail.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "ratsimplex")]
#[command(about = "Two-phase simplex solver for conjunctions of linear rational (in)equalities")]
#[command(version)]
struct Cli {
    /// Benchmark file: alternating (formula, expected-result) lines. Blank
    /// lines and lines starting with `%` are skipped.
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let contents = match fs::read_to_string(&cli.file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("error reading {}: {e}", cli.file.display());
            return ExitCode::SUCCESS;
        }
    };

    let lines: Vec<&str> = contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('%'))
        .collect();

    let mut pairs = lines.chunks_exact(2);
    for pair in &mut pairs {
        let formula_text = pair[0];
        let expected = pair[1].trim();

        println!("{formula_text}");
        match ratsimplex::solve(formula_text) {
            Ok(actual) => {
                println!("{actual}");
                if actual == expected {
                    println!("Passed");
                } else {
                    println!("Failed. Expected: {expected}");
                }
            }
            Err(e) => {
                println!("{e}");
                println!("Failed. Expected: {expected}");
            }
        }
    }

    ExitCode::SUCCESS
}
