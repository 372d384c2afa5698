//! Coverage Simulator CLI
//!
//! Run a free coverage session or the built-in scenarios.

use clap::Parser;
use coverage_core::{load_map, Algorithm, AlgorithmParams};
use coverage_sim::scenarios::ScenarioId;
use coverage_sim::{export_heatmap, RunSummary, ScenarioResult, ScenarioRunner, SimConfig, SimResult, SimWorld};
use std::path::PathBuf;
use std::thread;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Multi-agent area coverage simulator
#[derive(Parser, Debug)]
#[command(name = "coverage-sim")]
#[command(about = "Simulate drone swarms covering an obstacle map", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Movement algorithm (bacterial, greedy, bee)
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Number of drones (defaults to the algorithm's population)
    #[arg(short, long)]
    drones: Option<usize>,

    /// Ticks to simulate
    #[arg(short, long, default_value = "600")]
    ticks: u64,

    /// Obstacle map JSON file (25x25 matrix of 0/1)
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Algorithm parameters JSON file
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Sleep one tick period (50ms) between ticks
    #[arg(long)]
    realtime: bool,

    /// Scenario to run instead of a free session (mark_radius, greedy_convergence,
    /// dispersal_separation, wall_sliding, invariant_sweep, all)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Write the final heatmap to a JSON file
    #[arg(long)]
    export_heatmap: Option<PathBuf>,

    /// Write the run summary to a JSON file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Obstacle density of the invariant sweep map (0.0 - 1.0)
    #[arg(long, default_value = "0.15")]
    density: f64,
}

/// Builds the world configuration from the command line.
fn build_config(args: &Args, seed: u64) -> SimResult<SimConfig> {
    let mut params = match &args.algorithm {
        Some(name) => AlgorithmParams::defaults_for(name.parse::<Algorithm>()?),
        None => AlgorithmParams::default(),
    };

    if let Some(path) = &args.params {
        let text = std::fs::read_to_string(path)?;
        let loaded = AlgorithmParams::from_json(&text)?;
        if args.algorithm.is_some() && loaded.algorithm() != params.algorithm() {
            warn!(
                "--algorithm {} overridden by {} in {}",
                params.algorithm(),
                loaded.algorithm(),
                path.display()
            );
        }
        params = loaded;
    }

    let defaults = SimConfig::default();
    let obstacle_map = match &args.map {
        Some(path) => Some(load_map(path, Some(defaults.geometry.map_grid_size()))?),
        None => None,
    };

    Ok(SimConfig {
        seed,
        params,
        drone_count: args.drones,
        max_ticks: args.ticks,
        obstacle_map,
        ..defaults
    })
}

/// Runs a free session and reports its summary.
fn run_session(args: &Args, seed: u64) -> SimResult<()> {
    let config = build_config(args, seed)?;
    let mut world = SimWorld::new(config)?;

    if !args.json {
        info!(
            "Running {} with {} drones for {} ticks (seed={})",
            world.session().params().algorithm(),
            world.session().agents().len(),
            world.config.max_ticks,
            seed
        );
    }

    while !world.is_finished() {
        world.tick();
        if args.realtime {
            thread::sleep(world.tick_period());
        }
    }

    let summary = RunSummary::from_world(&world);

    if let Some(path) = &args.export_heatmap {
        export_heatmap(path, world.heatmap())?;
        if !args.json {
            info!("Exported heatmap to {}", path.display());
        }
    }

    if let Some(path) = &args.summary {
        summary.write_to_file(path)?;
        if !args.json {
            info!("Wrote run summary to {}", path.display());
        }
    }

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!(
            "✅ {:.1}% covered ({} cells) in {:.1}s, {} blocked moves",
            summary.coverage * 100.0,
            summary.visited_cells,
            summary.time_secs,
            summary.blocked_moves
        );
    }

    Ok(())
}

/// Runs the requested scenarios. Returns the number of failures.
fn run_scenarios(args: &Args, name: &str, seed: u64) -> SimResult<usize> {
    let scenarios: Vec<ScenarioId> = if name == "all" {
        ScenarioId::all()
    } else {
        vec![name.parse()?]
    };

    let runner = ScenarioRunner::new(seed, args.drones.unwrap_or(30))
        .with_ticks(args.ticks.min(200))
        .with_obstacle_density(args.density);
    let mut all_results: Vec<ScenarioResult> = Vec::new();

    for scenario in &scenarios {
        let result = runner.run(*scenario);

        if !args.json {
            if result.passed {
                info!("✓ {} (seed={}) PASSED", scenario.name(), seed);
            } else {
                error!(
                    "✗ {} (seed={}) FAILED: {}",
                    scenario.name(),
                    seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }

        all_results.push(result);
    }

    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": total - failed_count,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "ticks": r.total_ticks,
                    "coverage": r.coverage,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);
        }
    }

    Ok(failed_count)
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }

    if !args.json {
        info!("Coverage Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Determine seed
    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let outcome = match &args.scenario {
        Some(name) => run_scenarios(&args, name, seed),
        None => run_session(&args, seed).map(|_| 0),
    };

    // Exit with proper code for CI
    match outcome {
        Ok(0) => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
