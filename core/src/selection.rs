use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A chosen cell together with the symbol it showed when it was chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub index: CellIndex,
    pub symbol: Symbol,
}

/// Cells flipped during the round in progress, in pick order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    picks: SmallVec<[Pick; 5]>,
    cap: u8,
}

impl Selection {
    pub fn with_cap(cap: u8) -> Self {
        Self {
            picks: SmallVec::new(),
            cap,
        }
    }

    /// Adds `index` unless the selection is full, already holds it, or the cell is a bomb.
    pub fn select(&mut self, index: CellIndex, board: &Board) -> bool {
        if self.is_full() || self.contains(index) {
            return false;
        }
        let symbol = board.symbol_at(index);
        if symbol.is_bomb() {
            return false;
        }
        log::trace!("pick {} ({:?}), {} picked", index, symbol, self.picks.len() + 1);
        self.picks.push(Pick { index, symbol });
        true
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    pub fn cap(&self) -> u8 {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.picks.len() >= usize::from(self.cap)
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        self.picks.iter().any(|pick| pick.index == index)
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.picks.iter().map(|pick| pick.index)
    }
}
