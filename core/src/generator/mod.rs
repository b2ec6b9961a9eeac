use crate::*;
pub use random::*;

mod random;

/// Supplies symbols whenever a cell has to be (re)populated.
///
/// Implementations must never yield [`Symbol::Bomb`].
pub trait SymbolSource {
    fn next_symbol(&mut self) -> Symbol;
}

impl<S: SymbolSource + ?Sized> SymbolSource for &mut S {
    fn next_symbol(&mut self) -> Symbol {
        (**self).next_symbol()
    }
}
