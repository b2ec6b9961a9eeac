use alloc::vec::Vec;
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;

use super::*;

/// Uniform draw over [`Symbol::ORDINARY`], reproducible from its seed.
#[derive(Clone, Debug)]
pub struct RandomSymbols {
    rng: SmallRng,
}

impl RandomSymbols {
    pub fn new(seed: u64) -> Self {
        log::debug!("symbol source seeded with {}", seed);
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl SymbolSource for RandomSymbols {
    fn next_symbol(&mut self) -> Symbol {
        Symbol::ORDINARY[self.rng.random_range(0..Symbol::ORDINARY.len())]
    }
}

/// Replays a fixed sequence of symbols forever, used to script boards.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleSymbols {
    symbols: Vec<Symbol>,
    next: usize,
}

impl CycleSymbols {
    /// Bomb markers in `symbols` are skipped; an empty or bomb-only sequence falls back to the first ordinary symbol.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut symbols: Vec<_> = symbols.into_iter().filter(|s| !s.is_bomb()).collect();
        if symbols.is_empty() {
            log::warn!("Empty symbol cycle, falling back to a single symbol");
            symbols.push(Symbol::ORDINARY[0]);
        }
        Self { symbols, next: 0 }
    }
}

impl SymbolSource for CycleSymbols {
    fn next_symbol(&mut self) -> Symbol {
        let symbol = self.symbols[self.next];
        self.next = (self.next + 1) % self.symbols.len();
        symbol
    }
}
