#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use bomb::*;
pub use error::*;
pub use evaluate::*;
pub use event::*;
pub use generator::*;
pub use selection::*;
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod board;
mod bomb;
mod error;
mod evaluate;
mod event;
mod generator;
mod selection;
mod session;
mod snapshot;
mod tile;
pub mod timer;
mod types;

/// Static suggestion offered when the player asks for a hint.
pub const HINT: &str = "Try matching three symbols at the top right!";

/// Whether the bonus action stays unlocked when a level ends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusCarryOver {
    #[default]
    Persist,
    Reset,
}

/// What happens after a level ends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelAdvance {
    /// Start the next level right away.
    #[default]
    Automatic,
    /// Wait for [`Session::confirm_next_level`].
    OnConfirm,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square board.
    pub grid_size: Coord,
    pub target_score: u32,
    pub max_moves: u32,
    pub time_limit_secs: u32,
    /// Most cells a single round may pick.
    pub selection_cap: u8,
    /// Pause between a round's evaluation and its refill.
    pub settle_delay_ms: u32,
    pub bonus_increment: u8,
    pub bonus_match_size: u8,
    pub bomb_match_size: u8,
    /// How long unactivated bomb markers stay on the board.
    pub bomb_lifetime_ms: u32,
    pub bonus_carry_over: BonusCarryOver,
    pub level_advance: LevelAdvance,
}

impl GameConfig {
    pub const MAX_GRID_SIZE: Coord = 64;

    pub const fn total_cells(&self) -> CellIndex {
        mult(self.grid_size, self.grid_size)
    }

    pub fn validate(&self) -> Result<()> {
        use GameError::InvalidConfig;

        if self.grid_size == 0 || self.grid_size > Self::MAX_GRID_SIZE {
            return Err(InvalidConfig("grid size must be between 1 and 64"));
        }
        if self.selection_cap == 0 || CellIndex::from(self.selection_cap) > self.total_cells() {
            return Err(InvalidConfig("selection cap must fit on the board"));
        }
        if self.target_score == 0 || self.max_moves == 0 || self.time_limit_secs == 0 {
            return Err(InvalidConfig("level limits must be positive"));
        }
        if self.bonus_increment > BONUS_CAP {
            return Err(InvalidConfig("bonus increment cannot exceed 100"));
        }
        if self.bonus_match_size < 2 || self.bomb_match_size < 2 {
            return Err(InvalidConfig("match sizes start at 2"));
        }
        if self.bonus_match_size > self.selection_cap || self.bomb_match_size > self.selection_cap {
            return Err(InvalidConfig("match sizes must fit the selection cap"));
        }
        if self.bonus_match_size == self.bomb_match_size {
            return Err(InvalidConfig("bonus and bomb need different match sizes"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            target_score: 100,
            max_moves: 7,
            time_limit_secs: 120,
            selection_cap: 5,
            settle_delay_ms: 1000,
            bonus_increment: 20,
            bonus_match_size: 3,
            bomb_match_size: 4,
            bomb_lifetime_ms: 1000,
            bonus_carry_over: BonusCarryOver::Persist,
            level_advance: LevelAdvance::Automatic,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    /// Picked, but not enough cells to evaluate yet.
    Selected,
    Matched(u8),
    Mismatched(u8),
    /// The cell was a bomb and got activated instead.
    Detonated,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    NoChange,
    Changed,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}
