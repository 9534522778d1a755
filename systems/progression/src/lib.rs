#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level lifecycle system.
//!
//! Watches the event stream for cleared levels and issues the follow-up
//! generation command. Per-level seeds derive from a single run seed, so a
//! whole run replays from one number while levels stay uncorrelated.

use ore_siege_core::{Command, Event, LevelNumber};
use sha2::{Digest, Sha256};

/// Pure system that drives the level sequence from a single run seed.
#[derive(Clone, Copy, Debug)]
pub struct Progression {
    run_seed: u64,
}

impl Progression {
    /// Creates a progression system for the given run seed.
    #[must_use]
    pub const fn new(run_seed: u64) -> Self {
        Self { run_seed }
    }

    /// Command that starts the run by generating level one.
    #[must_use]
    pub fn bootstrap_command(&self) -> Command {
        let level = LevelNumber::new(1);
        Command::GenerateLevel {
            level,
            seed: self.level_seed(level),
        }
    }

    /// Consumes events and emits generation commands for cleared levels.
    ///
    /// `GameOver` is terminal and produces nothing; restarting is the
    /// embedder's call.
    pub fn handle(&self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::LevelCleared { next, .. } = event {
                out.push(Command::GenerateLevel {
                    level: *next,
                    seed: self.level_seed(*next),
                });
            }
        }
    }

    fn level_seed(&self, level: LevelNumber) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.run_seed.to_le_bytes());
        hasher.update(level.get().to_le_bytes());
        let digest = hasher.finalize();
        let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
        u64::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_targets_level_one() {
        let progression = Progression::new(7);
        let Command::GenerateLevel { level, .. } = progression.bootstrap_command() else {
            panic!("bootstrap must be a generation command");
        };
        assert_eq!(level, LevelNumber::new(1));
    }

    #[test]
    fn level_seeds_are_stable_and_uncorrelated() {
        let progression = Progression::new(99);
        let first = progression.level_seed(LevelNumber::new(1));
        assert_eq!(first, progression.level_seed(LevelNumber::new(1)));
        assert_ne!(first, progression.level_seed(LevelNumber::new(2)));
        assert_ne!(first, Progression::new(100).level_seed(LevelNumber::new(1)));
    }

    #[test]
    fn cleared_level_requests_the_next_one() {
        let progression = Progression::new(5);
        let mut out = Vec::new();
        progression.handle(
            &[Event::LevelCleared {
                level: LevelNumber::new(3),
                next: LevelNumber::new(4),
            }],
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::GenerateLevel {
                level: LevelNumber::new(4),
                seed: progression.level_seed(LevelNumber::new(4)),
            }]
        );
    }

    #[test]
    fn unrelated_events_emit_nothing() {
        let progression = Progression::new(5);
        let mut out = Vec::new();
        progression.handle(
            &[
                Event::GameOver {
                    level: LevelNumber::new(2),
                },
                Event::LevelGenerated {
                    level: LevelNumber::new(2),
                },
            ],
            &mut out,
        );
        assert!(out.is_empty());
    }
}
