use core::ops::Index;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Square grid of symbols, addressed by row-major [`CellIndex`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Symbol>,
    generation: u32,
}

impl Board {
    /// Fresh board with every cell drawn from `source`.
    pub fn random(side: Coord, source: &mut impl SymbolSource) -> Self {
        let side = side.max(1);
        let dim = (usize::from(side), usize::from(side));
        let cells = Array2::from_shape_fn(dim, |_| source.next_symbol());
        Self {
            cells,
            generation: 0,
        }
    }

    /// Board with explicit contents given in row-major order.
    pub fn from_symbols(side: Coord, symbols: &[Symbol]) -> Result<Self> {
        if side == 0 || symbols.len() != usize::from(mult(side, side)) {
            return Err(GameError::InvalidBoardShape);
        }
        let dim = (usize::from(side), usize::from(side));
        let cells = Array2::from_shape_vec(dim, symbols.to_vec())
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self {
            cells,
            generation: 0,
        })
    }

    pub fn side(&self) -> Coord {
        self.cells.dim().0.try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellIndex {
        mult(self.side(), self.side())
    }

    /// Bumped by every [`Board::fill`], so deferred work can tell boards apart.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.total_cells() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub fn coords_of(&self, index: CellIndex) -> Coord2 {
        split_index(index, self.side())
    }

    pub fn symbol_at(&self, index: CellIndex) -> Symbol {
        self[index]
    }

    pub fn contains_bomb(&self, index: CellIndex) -> bool {
        self[index].is_bomb()
    }

    pub fn bomb_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_bomb()).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Symbol>> {
        self.cells.axis_iter(Axis(0))
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.cells.iter().copied()
    }

    /// Redraws every cell and starts a new generation.
    pub fn fill(&mut self, source: &mut impl SymbolSource) {
        self.cells.map_inplace(|cell| *cell = source.next_symbol());
        self.generation = self.generation.wrapping_add(1);
        log::debug!("board filled, generation {}", self.generation);
    }

    pub fn refill_cells(
        &mut self,
        indices: impl IntoIterator<Item = CellIndex>,
        source: &mut impl SymbolSource,
    ) {
        for index in indices {
            let symbol = source.next_symbol();
            log::trace!("refill cell {} with {:?}", index, symbol);
            *self.cell_mut(index) = symbol;
        }
    }

    /// Redraws the whole row and column through `index`.
    pub fn clear_row_and_column(&mut self, index: CellIndex, source: &mut impl SymbolSource) {
        let side = self.side();
        log::trace!("clear cross at {:?}", self.coords_of(index));
        self.refill_cells(CrossIter::new(index, side), source);
    }

    pub fn set_cells(&mut self, indices: impl IntoIterator<Item = CellIndex>, symbol: Symbol) {
        for index in indices {
            *self.cell_mut(index) = symbol;
        }
    }

    pub(crate) fn set_cell(&mut self, index: CellIndex, symbol: Symbol) {
        *self.cell_mut(index) = symbol;
    }

    fn cell_mut(&mut self, index: CellIndex) -> &mut Symbol {
        let coords = self.coords_of(index);
        &mut self.cells[coords.to_nd_index()]
    }
}

impl Index<CellIndex> for Board {
    type Output = Symbol;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.cells[self.coords_of(index).to_nd_index()]
    }
}
