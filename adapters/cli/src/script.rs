//! Frame-indexed input scripts for headless runs.
//!
//! A script is a whitespace-separated token list; each token supplies the
//! player command for one frame. `w` holds still for a frame, so timing
//! against the AI cadence can be expressed precisely.

use ore_siege_core::{Command, Direction};
use thiserror::Error;

/// Error raised when a script contains a token the runner does not know.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The token matched no known input mnemonic.
    #[error("unknown script token {0:?}")]
    UnknownToken(String),
}

/// Parsed input script, one optional command per frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    frames: Vec<Option<Command>>,
}

impl Script {
    /// Parses a token list.
    ///
    /// Tokens: `up`/`down`/`left`/`right` move, `iu`/`id`/`il`/`ir`
    /// interact in a direction, `p` places material, `o` places green ore,
    /// `w` waits a frame.
    pub(crate) fn parse(text: &str) -> Result<Self, ScriptError> {
        let frames = text
            .split_whitespace()
            .map(|token| match token {
                "up" => Ok(Some(Command::MovePlayer {
                    direction: Direction::North,
                })),
                "down" => Ok(Some(Command::MovePlayer {
                    direction: Direction::South,
                })),
                "left" => Ok(Some(Command::MovePlayer {
                    direction: Direction::West,
                })),
                "right" => Ok(Some(Command::MovePlayer {
                    direction: Direction::East,
                })),
                "iu" => Ok(Some(Command::Interact {
                    direction: Direction::North,
                })),
                "id" => Ok(Some(Command::Interact {
                    direction: Direction::South,
                })),
                "il" => Ok(Some(Command::Interact {
                    direction: Direction::West,
                })),
                "ir" => Ok(Some(Command::Interact {
                    direction: Direction::East,
                })),
                "p" => Ok(Some(Command::PlaceMaterial)),
                "o" => Ok(Some(Command::PlaceGreenOre)),
                "w" => Ok(None),
                other => Err(ScriptError::UnknownToken(other.to_owned())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }

    /// Command scheduled for the frame, if any. Frames past the end of the
    /// script are idle.
    pub(crate) fn command_for_frame(&self, frame: u32) -> Option<Command> {
        usize::try_from(frame)
            .ok()
            .and_then(|index| self.frames.get(index).cloned())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movement_interaction_and_placement_tokens() {
        let script = Script::parse("right w id p o").expect("script parses");

        assert_eq!(
            script.command_for_frame(0),
            Some(Command::MovePlayer {
                direction: Direction::East
            })
        );
        assert_eq!(script.command_for_frame(1), None);
        assert_eq!(
            script.command_for_frame(2),
            Some(Command::Interact {
                direction: Direction::South
            })
        );
        assert_eq!(script.command_for_frame(3), Some(Command::PlaceMaterial));
        assert_eq!(script.command_for_frame(4), Some(Command::PlaceGreenOre));
        assert_eq!(script.command_for_frame(5), None);
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            Script::parse("right jump"),
            Err(ScriptError::UnknownToken("jump".to_owned()))
        );
    }

    #[test]
    fn empty_script_is_all_idle_frames() {
        let script = Script::default();
        assert_eq!(script.command_for_frame(0), None);
    }
}
