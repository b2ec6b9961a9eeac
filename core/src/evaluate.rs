use serde::{Deserialize, Serialize};

use crate::*;

/// Upper bound of the bonus meter.
pub const BONUS_CAP: u8 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEffect {
    None,
    /// Advances the bonus meter and makes the bonus action available.
    Bonus,
    /// Stamps the matched cells with bomb markers.
    Bomb,
}

/// Verdict on a selection of at least two cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    Match { count: u8, effect: MatchEffect },
    Mismatch { count: u8 },
}

impl Evaluation {
    pub const fn score_delta(self) -> u32 {
        match self {
            Self::Match { count, .. } => count as u32,
            Self::Mismatch { .. } => 0,
        }
    }

    pub const fn effect(self) -> MatchEffect {
        match self {
            Self::Match { effect, .. } => effect,
            Self::Mismatch { .. } => MatchEffect::None,
        }
    }
}

/// Evaluates the picked symbols, `None` until at least two cells are picked.
pub fn evaluate(picks: &[Pick], config: &GameConfig) -> Option<Evaluation> {
    let (first, rest) = picks.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let count = picks.len().try_into().unwrap_or(u8::MAX);
    if rest.iter().any(|pick| pick.symbol != first.symbol) {
        return Some(Evaluation::Mismatch { count });
    }

    let effect = if count == config.bonus_match_size {
        MatchEffect::Bonus
    } else if count == config.bomb_match_size {
        MatchEffect::Bomb
    } else {
        MatchEffect::None
    };
    Some(Evaluation::Match { count, effect })
}

/// The per-level counters a round can change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub score: u32,
    pub moves: u32,
    pub bonus_progress: u8,
    pub bonus_available: bool,
}

impl Tally {
    /// Counters after crediting `evaluation` on top of `self`.
    pub fn credit(self, evaluation: Evaluation, config: &GameConfig) -> Self {
        let Evaluation::Match { effect, .. } = evaluation else {
            return self;
        };

        let mut next = Self {
            score: self.score.saturating_add(evaluation.score_delta()),
            moves: self.moves.saturating_add(1),
            ..self
        };
        if effect == MatchEffect::Bonus {
            next.bonus_progress = self
                .bonus_progress
                .saturating_add(config.bonus_increment)
                .min(BONUS_CAP);
            next.bonus_available = true;
        }
        next
    }
}
