/// Single coordinate axis used for the grid side, rows and columns.
pub type Coord = u8;

/// Linear, row-major cell index: `row * side + col`.
pub type CellIndex = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellIndex {
    let a = a as CellIndex;
    let b = b as CellIndex;
    a.saturating_mul(b)
}

/// Splits a linear index into `(row, col)` on a square grid of `side` cells.
pub const fn split_index(index: CellIndex, side: Coord) -> Coord2 {
    let side = side as CellIndex;
    ((index / side) as Coord, (index % side) as Coord)
}

pub const fn join_coords((row, col): Coord2, side: Coord) -> CellIndex {
    (row as CellIndex) * (side as CellIndex) + (col as CellIndex)
}

/// Yields every cell of the row and of the column through `index`, the intersection only once.
#[derive(Debug)]
pub struct CrossIter {
    center: Coord2,
    side: Coord,
    step: u16,
}

impl CrossIter {
    pub fn new(index: CellIndex, side: Coord) -> Self {
        Self {
            center: split_index(index, side),
            side,
            step: 0,
        }
    }
}

impl Iterator for CrossIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let side = u16::from(self.side);
        let (row, col) = self.center;
        loop {
            if self.step >= side * 2 {
                return None;
            }

            let step = self.step;
            self.step += 1;

            if step < side {
                return Some(join_coords((row, step as Coord), self.side));
            }

            let other_row = (step - side) as Coord;
            if other_row != row {
                return Some(join_coords((other_row, col), self.side));
            }
        }
    }
}
