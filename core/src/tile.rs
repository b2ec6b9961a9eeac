use serde::{Deserialize, Serialize};

/// Value held by a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Apple,
    Banana,
    Cherry,
    Grape,
    Watermelon,
    Pineapple,
    Kiwi,
    Strawberry,
    /// Reserved marker for an activatable clearing tile, never drawn at random.
    Bomb,
}

impl Symbol {
    /// The alphabet the symbol source draws from.
    pub const ORDINARY: [Symbol; 8] = [
        Symbol::Apple,
        Symbol::Banana,
        Symbol::Cherry,
        Symbol::Grape,
        Symbol::Watermelon,
        Symbol::Pineapple,
        Symbol::Kiwi,
        Symbol::Strawberry,
    ];

    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }

    pub const fn glyph(self) -> &'static str {
        use Symbol::*;
        match self {
            Apple => "🍎",
            Banana => "🍌",
            Cherry => "🍒",
            Grape => "🍇",
            Watermelon => "🍉",
            Pineapple => "🍍",
            Kiwi => "🥝",
            Strawberry => "🍓",
            Bomb => "💣",
        }
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.glyph())
    }
}
