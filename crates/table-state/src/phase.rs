use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the tracked seat is in the hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandPhase {
    #[default]
    SittingOut,
    Playing,
}

impl fmt::Display for HandPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            HandPhase::SittingOut => "sitting out",
            HandPhase::Playing => "playing",
        };
        write!(f, "{repr}")
    }
}

/// Progress of the community board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardPhase {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
}

impl fmt::Display for BoardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            BoardPhase::Preflop => "preflop",
            BoardPhase::Flop => "flop",
            BoardPhase::Turn => "turn",
            BoardPhase::River => "river",
        };
        write!(f, "{repr}")
    }
}
