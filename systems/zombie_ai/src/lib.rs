#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic zombie decision system.
//!
//! Runs on a fixed cadence driven by `TimeAdvanced` events and proposes
//! movement and strike commands for every living, non-shocked zombie. The
//! system never mutates world state directly; the world re-validates every
//! proposal against its authoritative view when the command is applied.

use std::time::Duration;

use ore_siege_core::{
    Command, Direction, Event, GridCoord, GridView, Phase, PlayerSnapshot, ZombieSnapshot,
    ZombieView,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the zombie AI system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    decision_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided decision cadence and
    /// seed.
    #[must_use]
    pub const fn new(decision_interval: Duration, rng_seed: u64) -> Self {
        Self {
            decision_interval,
            rng_seed,
        }
    }
}

/// Pure system that proposes zombie movement and strikes each AI tick.
#[derive(Debug)]
pub struct ZombieAi {
    decision_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl ZombieAi {
    /// Creates a new zombie AI system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            decision_interval: config.decision_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit zombie command batches.
    ///
    /// Elapsed time accumulates across frames; each whole decision interval
    /// produces one decision round over the roster in id order.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: Phase,
        grid: GridView<'_>,
        player: &PlayerSnapshot,
        zombies: &ZombieView,
        out: &mut Vec<Command>,
    ) {
        if phase.is_terminal() {
            self.accumulator = Duration::ZERO;
            return;
        }
        if self.decision_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= self.decision_interval {
            self.accumulator -= self.decision_interval;
            self.decide(grid, player, zombies, out);
        }
    }

    fn decide(
        &mut self,
        grid: GridView<'_>,
        player: &PlayerSnapshot,
        zombies: &ZombieView,
        out: &mut Vec<Command>,
    ) {
        let player_cell = player.cell;
        let blocked = [player_cell];

        for zombie in zombies.iter() {
            if zombie.shocked {
                continue;
            }

            match ore_siege_pathfinding::next_step(
                grid,
                zombie.cell,
                player_cell,
                &blocked,
                &mut self.rng,
            ) {
                // Holding position when the next step is the player's own
                // cell keeps pursuers parked in strike range.
                Some(step) if step == player_cell => {}
                Some(step) => {
                    if let Some(direction) = Direction::between(zombie.cell, step) {
                        out.push(Command::StepZombie {
                            zombie: zombie.id,
                            direction,
                        });
                    }
                }
                None => self.wander(grid, zombie, player_cell, out),
            }

            // Adjacency is resolved against the post-move position when the
            // world applies this batch, so the strike is proposed regardless.
            if zombie.attack_ready {
                out.push(Command::ZombieStrike { zombie: zombie.id });
            }
        }
    }

    /// Fallback for an unreachable player: one shuffled attempt at any
    /// orthogonal neighbor the zombie could occupy. Lava counts; pursuit
    /// never routes through it, but a blind stumble can.
    fn wander(
        &mut self,
        grid: GridView<'_>,
        zombie: &ZombieSnapshot,
        player_cell: GridCoord,
        out: &mut Vec<Command>,
    ) {
        let mut order = Direction::ALL;
        order.shuffle(&mut self.rng);

        for direction in order {
            let Some(target) = zombie.cell.offset(direction) else {
                continue;
            };
            let Some(kind) = grid.kind(target) else {
                continue;
            };
            if (kind.is_walkable() || kind.is_lethal()) && target != player_cell {
                out.push(Command::StepZombie {
                    zombie: zombie.id,
                    direction,
                });
                return;
            }
        }
    }
}
