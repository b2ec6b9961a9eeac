use smallvec::SmallVec;

use crate::timer::Deadline;
use crate::*;

/// Bomb markers stamped by a qualifying match, waiting to be activated or to expire.
#[derive(Clone, Debug, PartialEq)]
pub struct ArmedBomb {
    cells: SmallVec<[CellIndex; 5]>,
    expires: Deadline,
}

impl ArmedBomb {
    /// Stamps the picked cells with bomb markers.
    pub fn arm(board: &mut Board, picks: &[Pick], lifetime_ms: u32) -> Self {
        let cells: SmallVec<_> = picks.iter().map(|pick| pick.index).collect();
        board.set_cells(cells.iter().copied(), Symbol::Bomb);
        log::debug!("bombs placed at {:?}", cells);
        Self {
            cells,
            expires: Deadline::after(lifetime_ms),
        }
    }

    /// The cell reported as the pending bomb, the first one picked.
    pub fn trigger(&self) -> Option<CellIndex> {
        self.cells.first().copied()
    }

    pub fn covers(&self, index: CellIndex) -> bool {
        self.cells.contains(&index)
    }

    pub fn expires_in_ms(&self) -> u32 {
        self.expires.remaining_ms()
    }

    pub fn elapse(&mut self, ms: u32) {
        self.expires.elapse(ms);
    }

    /// Puts the picked symbols back where markers are still showing.
    pub fn disarm(self, board: &mut Board, picks: &[Pick]) {
        for pick in picks.iter().filter(|pick| self.covers(pick.index)) {
            if board.contains_bomb(pick.index) {
                board.set_cell(pick.index, pick.symbol);
            }
        }
        log::debug!("bombs at {:?} disarmed", self.cells);
    }

    /// Redraws the markers still on the board, returning the cells that held one.
    pub fn expire(
        self,
        board: &mut Board,
        source: &mut impl SymbolSource,
    ) -> SmallVec<[CellIndex; 5]> {
        let live: SmallVec<[CellIndex; 5]> = self
            .cells
            .into_iter()
            .filter(|&index| board.contains_bomb(index))
            .collect();
        board.refill_cells(live.iter().copied(), source);
        log::debug!("bombs at {:?} expired", live);
        live
    }
}

/// Clears the row and column through a bomb cell. Returns `false`, changing nothing, when `index` is not a bomb.
pub fn detonate(board: &mut Board, index: CellIndex, source: &mut impl SymbolSource) -> bool {
    if !board.contains_bomb(index) {
        return false;
    }
    board.clear_row_and_column(index, source);
    log::debug!("bomb detonated at {:?}", board.coords_of(index));
    true
}
