//! Headless Forage Runner
//!
//! Plays one seeded arena game with the forager agent and prints the result.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use threat_forager::agent::{AgentStats, ForagerAgent};
use threat_forager::arena::{Arena, ArenaConfig, Outcome};
use threat_forager::core::{load_config, PlannerConfig, Result};

/// Headless Forage Runner - one agent against one seeded arena
#[derive(Parser, Debug)]
#[command(name = "forage_runner")]
#[command(about = "Run the forager agent against a seeded arena and report the outcome")]
struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = 32)]
    width: i32,

    /// Board height in cells
    #[arg(long, default_value_t = 32)]
    height: i32,

    /// Hidden threats on the board
    #[arg(long, default_value_t = 8)]
    threats: u32,

    /// Workers at the start
    #[arg(long, default_value_t = 2)]
    workers: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before timeout
    #[arg(long, default_value_t = 2000)]
    max_ticks: u64,

    /// Planner config TOML (defaults are used when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the final belief map and the true threat positions
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    outcome: String,
    ticks: u64,
    gold_delivered: u32,
    stock: u32,
    workers_alive: usize,
    workers_lost: u32,
    threats_pinned: usize,
    agent: AgentStats,
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("forage_runner: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);

    let planner_config = match &args.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };

    let mut arena = Arena::new(ArenaConfig {
        width: args.width,
        height: args.height,
        threat_count: args.threats,
        initial_workers: args.workers,
        seed,
        ..ArenaConfig::default()
    })?;
    let mut agent = ForagerAgent::new(planner_config, args.width, args.height)?;

    while !arena.is_over() && arena.current_tick() < args.max_ticks {
        let actions = agent.tick(&arena.snapshot())?;
        let report = arena.step(&actions);
        if args.verbose && (!report.deaths.is_empty() || report.produced.is_some()) {
            eprintln!(
                "Tick {}: deaths={:?} produced={:?} stock={}",
                report.tick,
                report.deaths,
                report.produced,
                arena.stock()
            );
        }
    }

    let outcome = match arena.outcome() {
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
        Outcome::InProgress => "timeout",
    };

    let result = RunResult {
        outcome: outcome.to_string(),
        ticks: arena.current_tick(),
        gold_delivered: arena.delivered(),
        stock: arena.stock(),
        workers_alive: arena.worker_count(),
        workers_lost: arena.workers_lost(),
        threats_pinned: agent.belief().certain_threats().len(),
        agent: agent.stats(),
        seed,
    };

    if args.verbose {
        eprintln!("=== Belief map ===");
        eprintln!("{}", agent.belief().render());
        eprintln!("True threats: {:?}", arena.threat_positions());
    }

    match args.format.as_str() {
        "text" => {
            println!("Forage Result");
            println!("=============");
            println!("Outcome: {}", result.outcome);
            println!("Ticks: {}", result.ticks);
            println!("Gold delivered: {}", result.gold_delivered);
            println!("Workers alive/lost: {}/{}", result.workers_alive, result.workers_lost);
            println!("Threats pinned: {}", result.threats_pinned);
            println!("Seed: {}", result.seed);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
