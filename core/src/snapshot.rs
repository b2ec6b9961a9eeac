use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only copy of everything a front end renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub score: u32,
    pub target_score: u32,
    pub moves: u32,
    pub max_moves: u32,
    pub time_remaining: u32,
    pub bonus_progress: u8,
    pub bonus_available: bool,
    pub pending_bomb: Option<CellIndex>,
    pub phase: Phase,
    pub side: Coord,
    /// Row-major cell contents.
    pub cells: Vec<Symbol>,
    pub selection: Vec<CellIndex>,
    pub results: Vec<LevelResult>,
}

impl Snapshot {
    pub fn from_session<S: SymbolSource>(session: &Session<S>) -> Self {
        let config = session.config();
        Self {
            level: session.level(),
            score: session.score(),
            target_score: config.target_score,
            moves: session.moves(),
            max_moves: config.max_moves,
            time_remaining: session.time_remaining(),
            bonus_progress: session.bonus_progress(),
            bonus_available: session.bonus_available(),
            pending_bomb: session.pending_bomb(),
            phase: session.phase(),
            side: session.board().side(),
            cells: session.board().iter().collect(),
            selection: session.selection().iter().map(|pick| pick.index).collect(),
            results: session.results().to_vec(),
        }
    }

    pub fn symbol_at(&self, index: CellIndex) -> Option<Symbol> {
        self.cells.get(usize::from(index)).copied()
    }

    pub fn is_selected(&self, index: CellIndex) -> bool {
        self.selection.contains(&index)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cells.len() != usize::from(mult(self.side, self.side)) {
            return Err(GameError::InvalidBoardShape);
        }
        if self.selection.iter().any(|&index| index >= mult(self.side, self.side)) {
            return Err(GameError::InvalidIndex);
        }
        Ok(())
    }
}
