#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Ore Siege sessions.
//!
//! Boots a world from a run seed, drives the frame loop with optional
//! scripted player input, and prints a JSON summary when the run ends or
//! the frame budget is spent.

mod script;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use ore_siege_core::{Command, Phase, PlayerSnapshot};
use ore_siege_progression::Progression;
use ore_siege_world::{apply, query, World};
use ore_siege_zombie_ai::{Config as AiConfig, ZombieAi};
use serde::Serialize;

use crate::script::Script;

const AI_INTERVAL: Duration = Duration::from_millis(500);
const AI_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Headless Ore Siege session runner.
#[derive(Debug, Parser)]
#[command(name = "ore-siege", version, about)]
struct Args {
    /// Run seed; level terrain and zombie behavior derive from it.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated duration of one frame in milliseconds.
    #[arg(long, default_value_t = 100)]
    frame_ms: u64,

    /// Whitespace-separated input script, one token per frame.
    #[arg(long)]
    script: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    frames_run: u32,
    level: u32,
    phase: Phase,
    zombies_defeated: u32,
    player: PlayerSnapshot,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let script = match args.script.as_deref() {
        Some(text) => Script::parse(text).context("failed to parse input script")?,
        None => Script::default(),
    };

    let summary = run(&args, &script);
    let rendered =
        serde_json::to_string_pretty(&summary).context("failed to render run summary")?;
    println!("{rendered}");
    Ok(())
}

fn run(args: &Args, script: &Script) -> RunSummary {
    let mut world = World::new();
    let progression = Progression::new(args.seed);
    let mut ai = ZombieAi::new(AiConfig::new(AI_INTERVAL, args.seed ^ AI_SEED_SALT));
    let frame_dt = Duration::from_millis(args.frame_ms);

    let mut events = Vec::new();
    apply(&mut world, progression.bootstrap_command(), &mut events);

    let mut frames_run = 0;
    for frame_index in 0..args.frames {
        events.clear();
        if let Some(command) = script.command_for_frame(frame_index) {
            apply(&mut world, command, &mut events);
        }
        apply(&mut world, Command::Tick { dt: frame_dt }, &mut events);

        let mut commands = Vec::new();
        let player = query::player(&world);
        let zombies = query::zombie_view(&world);
        ai.handle(
            &events,
            query::phase(&world),
            query::grid_view(&world),
            &player,
            &zombies,
            &mut commands,
        );
        progression.handle(&events, &mut commands);
        for command in commands {
            apply(&mut world, command, &mut events);
        }

        frames_run = frame_index + 1;
        if query::phase(&world) == Phase::GameOver {
            break;
        }
    }

    RunSummary {
        frames_run,
        level: query::level_number(&world).get(),
        phase: query::phase(&world),
        zombies_defeated: query::zombies_defeated(&world),
        player: query::player(&world),
    }
}
