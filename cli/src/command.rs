use anyhow::{Context, Result, bail};
use matchmaster_core::{CellIndex, Coord, Coord2, join_coords};
use std::str::FromStr;

/// A cell named either by linear index or by `row col`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellRef {
    Index(CellIndex),
    Coords(Coord2),
}

impl CellRef {
    pub fn resolve(self, side: Coord) -> Result<CellIndex> {
        match self {
            Self::Index(index) => Ok(index),
            Self::Coords((row, col)) if row < side && col < side => {
                Ok(join_coords((row, col), side))
            }
            Self::Coords((row, col)) => bail!("({row}, {col}) is outside the {side}x{side} board"),
        }
    }

    fn parse_args(args: &[&str]) -> Result<Self> {
        match args {
            [index] => Ok(Self::Index(
                index.parse().with_context(|| format!("bad cell index {index:?}"))?,
            )),
            [row, col] => Ok(Self::Coords((
                row.parse().with_context(|| format!("bad row {row:?}"))?,
                col.parse().with_context(|| format!("bad column {col:?}"))?,
            ))),
            _ => bail!("expected a cell index or a row and column"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Pick(CellRef),
    Bomb(CellRef),
    Bonus,
    Next,
    Tick,
    Wait(u32),
    Hint,
    Results,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<_> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            bail!("empty command");
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "pick" | "p" => Self::Pick(CellRef::parse_args(args)?),
            "bomb" | "b" => Self::Bomb(CellRef::parse_args(args)?),
            "star" | "bonus" => Self::Bonus,
            "next" | "n" => Self::Next,
            "tick" => Self::Tick,
            "wait" | "w" => match args {
                [ms] => Self::Wait(ms.parse().with_context(|| format!("bad duration {ms:?}"))?),
                _ => bail!("usage: wait <milliseconds>"),
            },
            "hint" => Self::Hint,
            "results" | "r" => Self::Results,
            "show" | "s" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ if head.starts_with(|c: char| c.is_ascii_digit()) => {
                Self::Pick(CellRef::parse_args(&words)?)
            }
            other => bail!("unknown command {other:?}, try `help`"),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
commands:
  pick <i> | pick <row> <col> | <i> | <row> <col>   flip a tile (a bomb tile detonates)
  bomb <i> | bomb <row> <col>                       detonate a bomb tile
  star                                              use the bonus: new board, score lost
  next                                              start the next level once one ended
  tick                                              count down one second
  wait <ms>                                         let time pass
  hint | results | show | help | quit";
