//! stage-run: headless driver for the SkyWriters stage simulation.
//!
//! Usage:
//!   stage-run --seconds 120 --dt 0.0333
//!   stage-run --config stage.toml --seed 7 --json > snapshot.json

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use glam::DVec3;
use tracing::info;

use skywriters_core::components::Position;
use skywriters_core::config::StageConfig;
use skywriters_core::constants::DEFAULT_DT;
use skywriters_core::enums::EntityClass;
use skywriters_sim::SimulationEngine;

struct RunArgs {
    config: Option<PathBuf>,
    seconds: f64,
    dt: f64,
    seed: Option<u64>,
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let run = match parse_args(&args) {
        Ok(run) => run,
        Err(err) => {
            eprintln!("Error: {err}");
            print_usage();
            process::exit(1);
        }
    };

    let mut config = match &run.config {
        Some(path) => StageConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StageConfig::default(),
    };
    if let Some(seed) = run.seed {
        config.seed = seed;
    }

    let mut engine = SimulationEngine::new(config).context("building the stage")?;
    let steps = (run.seconds / run.dt).ceil() as u64;
    info!(seconds = run.seconds, dt = run.dt, steps, "running stage");

    let mut next_report = 1.0;
    let mut snapshot = engine.step(0.0);
    for _ in 0..steps {
        drift_with_wind(&mut engine, run.dt);
        snapshot = engine.step(run.dt);

        if snapshot.time.elapsed_secs >= next_report {
            next_report += 1.0;
            let stats = engine.stats();
            info!(
                t = format_args!("{:.1}", snapshot.time.elapsed_secs),
                planes = engine.collection_size(EntityClass::Plane),
                clouds = engine.collection_size(EntityClass::Cloud),
                blimps = engine.collection_size(EntityClass::Blimp),
                wind = format_args!("{:.1}", snapshot.wind.direction),
                spawned = stats.spawned,
                rejected = stats.rejected(),
                respawned = stats.respawned,
                removed = stats.removed,
                "stage"
            );
        }
    }

    if run.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Move every actor along the wind. This is the environment's job, not the
/// stage's.
fn drift_with_wind(engine: &mut SimulationEngine, dt: f64) {
    let offset = engine.wind_velocity() * dt;
    let moves: Vec<(hecs::Entity, DVec3)> = engine
        .world()
        .query::<&Position>()
        .iter()
        .map(|(entity, position)| (entity, position.0 + offset))
        .collect();
    for (entity, position) in moves {
        engine.set_entity_position(entity, position);
    }
}

fn print_usage() {
    eprintln!(
        "stage-run: headless SkyWriters stage simulation\n\
         \n\
           --config <path>    TOML stage configuration (optional)\n\
           --seconds <f64>    Simulated duration (default: 60)\n\
           --dt <f64>         Fixed step in seconds (default: 1/30)\n\
           --seed <u64>       Override the configured RNG seed\n\
           --json             Print the final snapshot as JSON on stdout\n\
         \n\
         Logging follows RUST_LOG, e.g. RUST_LOG=info or RUST_LOG=skywriters_sim=debug\n"
    );
}

fn parse_args(args: &[String]) -> Result<RunArgs> {
    let mut run = RunArgs {
        config: None,
        seconds: 60.0,
        dt: DEFAULT_DT,
        seed: None,
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => run.json = true,
            flag @ ("--config" | "--seconds" | "--dt" | "--seed") => {
                let Some(value) = args.get(i + 1) else {
                    bail!("{flag} needs a value");
                };
                match flag {
                    "--config" => run.config = Some(PathBuf::from(value)),
                    "--seconds" => run.seconds = parse_number(flag, value)?,
                    "--dt" => run.dt = parse_number(flag, value)?,
                    _ => {
                        run.seed = Some(
                            value
                                .parse()
                                .with_context(|| format!("--seed expects an integer, got {value}"))?,
                        )
                    }
                }
                i += 1;
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    if !(run.dt > 0.0) {
        bail!("--dt must be positive");
    }
    if !(run.seconds >= 0.0) {
        bail!("--seconds must not be negative");
    }
    Ok(run)
}

fn parse_number(flag: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .with_context(|| format!("{flag} expects a number, got {value}"))
}
