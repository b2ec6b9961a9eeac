use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    ScoreTarget,
    MovesExhausted,
    TimeExpired,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ScoreTarget => "target score reached",
            Self::MovesExhausted => "out of moves",
            Self::TimeExpired => "out of time",
        })
    }
}

/// Entry of the results log, appended once per finished level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: u32,
    pub score: u32,
}

impl fmt::Display for LevelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}: {} points", self.level, self.score)
    }
}

/// Notifications for the presentation layer, drained with [`Session::take_events`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GameEvent {
    MatchResolved { matched: u8, score_delta: u32 },
    RoundMissed { selected: u8 },
    BombDetonated { index: CellIndex },
    BombExpired { index: CellIndex },
    BonusActivated,
    LevelEnded { level: u32, score: u32, reason: EndReason },
    LevelAdvanced { level: u32 },
}
