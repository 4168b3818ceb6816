//! Headless QA driver: seeded random-walk playthroughs over a quest file,
//! with invariant, replay and round-trip checks on every step.

mod walk;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use questline_game::Quest;
use walk::{WalkConfig, check_replay, run_walk};

#[derive(Debug, Parser)]
#[command(name = "questline-tester", version)]
#[command(about = "Automated QA for the Questline engine - seeded random-walk playthroughs")]
struct Args {
    /// Quest definition to play (JSON); defaults to the bundled demo quest
    #[arg(long)]
    quest: Option<PathBuf>,

    /// Seeds to walk (comma-separated)
    #[arg(long, default_value = "alpha,beta,gamma,delta")]
    seeds: String,

    /// Maximum transitions per walk before giving up
    #[arg(long, default_value_t = 500)]
    max_steps: usize,

    /// Log every choice taken
    #[arg(short, long)]
    verbose: bool,
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn load_quest(path: Option<&PathBuf>) -> Result<Quest> {
    let json = match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => include_str!("../fixtures/demo-quest.json").to_string(),
    };
    Quest::from_json(&json).context("parsing quest definition")
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(failures) if failures == 0 => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{}", format!("{failures} walk(s) failed").red().bold());
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<usize> {
    let quest = load_quest(args.quest.as_ref())?;
    let config = WalkConfig {
        max_steps: args.max_steps,
        verbose: args.verbose,
    };

    let seeds = split_csv(&args.seeds);
    let mut failures = 0;
    for seed in &seeds {
        let result = run_walk(&quest, seed, &config).and_then(|report| {
            check_replay(&quest, seed, &config)?;
            Ok(report)
        });
        match result {
            Ok(report) => {
                let status = if report.finished {
                    format!("{:?}", report.outcome).green()
                } else {
                    "step budget exhausted".yellow()
                };
                println!(
                    "seed {:<12} {:>4} steps  {}",
                    report.seed.bold(),
                    report.steps,
                    status
                );
            }
            Err(error) => {
                failures += 1;
                println!("seed {:<12} {}", seed.bold(), format!("{error:#}").red());
            }
        }
    }
    println!(
        "{} of {} walks passed",
        seeds.len() - failures,
        seeds.len()
    );
    Ok(failures)
}
