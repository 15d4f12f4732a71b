#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Tornado Alley headlessly.

mod scenario;

use std::{collections::VecDeque, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tornado_alley_core::{Command, ControlSettings, EfCap, MapMode, SimulationConfig, SpawnKind};
use tornado_alley_rendering::{FrameComposer, RecordingSink, TelemetryPanel};
use tornado_alley_system_outbreak::Outbreak;
use tornado_alley_world::{self as world, query, World};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::scenario::{parse_point, Scenario, ScriptedSpawn};

const DEFAULT_FRAMES: u32 = 3_600;
const DEFAULT_FRAME_MS: u64 = 16;

/// Headless tornado simulation over a procedurally generated map
#[derive(Parser, Debug)]
#[command(name = "tornado-alley")]
#[command(about = "Simulates tornado tracks and city casualties", long_about = None)]
struct Args {
    /// TOML scenario file; flags override its values
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for map generation and tornado randomness
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of frames to simulate
    #[arg(short, long)]
    frames: Option<u32>,

    /// Simulated milliseconds per frame
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Map mode (procedural, static-background, blank)
    #[arg(long)]
    map_mode: Option<String>,

    /// Highest EF tier tornadoes may reach (0-6; anything else means EF6)
    #[arg(long)]
    max_ef: Option<i64>,

    /// Heading wobble multiplier
    #[arg(long)]
    wobble: Option<f32>,

    /// Disable autonomous spawns on reset
    #[arg(short, long)]
    manual: bool,

    /// Spawn a manual tornado at x,y on the first frame (repeatable)
    #[arg(long, value_parser = parse_point)]
    spawn: Vec<Vec2>,

    /// Append a waypoint x,y to the manual path (repeatable)
    #[arg(long, value_parser = parse_point)]
    waypoint: Vec<Vec2>,

    /// Starting wind speed in mph for manual spawns
    #[arg(long)]
    custom_wind: Option<String>,

    /// Track width in miles for manual spawns
    #[arg(long)]
    custom_width: Option<String>,

    /// Print the telemetry panel every N frames (0 = only at the end)
    #[arg(short, long, default_value_t = 0)]
    report_every: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Fully resolved run parameters.
#[derive(Debug)]
struct RunPlan {
    seed: u64,
    frames: u32,
    frame: Duration,
    config: SimulationConfig,
    waypoints: Vec<Vec2>,
    spawns: Vec<ScriptedSpawn>,
    report_every: u32,
}

impl RunPlan {
    fn resolve(args: Args, scenario: Scenario) -> Result<Self> {
        let mut config = scenario.simulation.clone();
        if let Some(mode) = args.map_mode.as_deref() {
            config.map_mode = parse_map_mode(mode)?;
        }
        if let Some(level) = args.max_ef {
            config.controls.ef_cap = EfCap::from_level_or_max(level);
        }
        if let Some(wobble) = args.wobble {
            config.controls.wobble = wobble;
        }
        if args.manual {
            config.controls.manual_mode = true;
        }
        if let Some(wind) = args.custom_wind.as_deref() {
            config.controls.custom_wind = ControlSettings::parse_custom_wind(wind);
        }
        if let Some(width) = args.custom_width.as_deref() {
            config.controls.custom_width_miles = ControlSettings::parse_custom_width(width);
        }

        let mut waypoints: Vec<Vec2> = scenario.waypoints().collect();
        waypoints.extend(args.waypoint);

        let mut spawns = scenario.spawns;
        spawns.extend(args.spawn.into_iter().map(|position| ScriptedSpawn {
            frame: 0,
            position: Some(position.to_array()),
        }));
        spawns.sort_by_key(|spawn| spawn.frame);

        Ok(Self {
            seed: args.seed.or(scenario.seed).unwrap_or_default(),
            frames: args.frames.or(scenario.frames).unwrap_or(DEFAULT_FRAMES),
            frame: Duration::from_millis(
                args.frame_ms
                    .or(scenario.frame_ms)
                    .unwrap_or(DEFAULT_FRAME_MS),
            ),
            config,
            waypoints,
            spawns,
            report_every: args.report_every,
        })
    }
}

fn parse_map_mode(value: &str) -> Result<MapMode> {
    match value.to_lowercase().as_str() {
        "procedural" => Ok(MapMode::Procedural),
        "static-background" | "static_background" | "static" => Ok(MapMode::StaticBackground),
        "blank" | "none" => Ok(MapMode::Blank),
        other => anyhow::bail!("unknown map mode `{other}`"),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Outcome of a headless run.
#[derive(Debug)]
struct RunSummary {
    frames: u32,
    panel: TelemetryPanel,
    draw_commands: usize,
}

fn run(plan: RunPlan, mut report: impl FnMut(u32, &TelemetryPanel)) -> Result<RunSummary> {
    let mut world = World::new(plan.config, plan.seed);
    let mut outbreak = Outbreak::default();
    let mut composer = FrameComposer::default();
    let mut sink = RecordingSink::default();

    let mut queue = VecDeque::new();
    queue.push_back(Command::ResetSimulation);
    queue.extend(
        plan.waypoints
            .iter()
            .map(|&point| Command::AddWaypoint { point }),
    );

    let mut events = Vec::new();
    let mut requested = Vec::new();
    let mut pending = plan.spawns.iter().peekable();
    let mut frame = 0;
    while frame < plan.frames {
        while let Some(spawn) = pending.next_if(|spawn| spawn.frame <= frame) {
            queue.push_back(Command::SpawnTornado {
                kind: SpawnKind::Manual {
                    position: spawn.position(),
                },
            });
        }

        events.clear();
        world::run_frame(&mut world, &mut queue, plan.frame, &mut events);
        composer.observe(&events);
        outbreak.handle(&events, &mut requested);
        queue.extend(requested.drain(..));
        composer
            .compose(&world, &mut sink)
            .with_context(|| format!("failed to compose frame {frame}"))?;
        frame += 1;

        if plan.report_every > 0 && frame % plan.report_every == 0 {
            report(frame, &TelemetryPanel::from_world(&world));
        }

        let idle = !query::is_running(&world) && queue.is_empty();
        if idle && pending.peek().is_none() && !outbreak.is_active() {
            debug!(frame, "nothing left to simulate");
            break;
        }
    }

    info!(
        frames = frame,
        total_casualties = query::total_casualties(&world),
        "run finished"
    );
    Ok(RunSummary {
        frames: frame,
        panel: TelemetryPanel::from_world(&world),
        draw_commands: sink.last_frame().len(),
    })
}

/// Entry point for the Tornado Alley command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    let plan = RunPlan::resolve(args, scenario)?;
    info!(seed = plan.seed, frames = plan.frames, mode = ?plan.config.map_mode, "starting run");

    let summary = run(plan, |frame, panel| {
        println!("--- frame {frame} ---");
        for line in panel.lines() {
            println!("{line}");
        }
    })?;

    println!("=== Tornado Alley ===");
    println!("Frames simulated: {}", summary.frames);
    println!("Draw commands in last frame: {}", summary.draw_commands);
    for line in summary.panel.lines() {
        println!("{line}");
    }
    Ok(())
}
