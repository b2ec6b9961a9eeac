use anyhow::{Context, Result};
use matchmaster_core::{GameEvent, LevelResult, Phase, Snapshot, Symbol};
use std::fmt::Write as _;
use std::io::Write;

/// Writes what the session shows, either for people or as JSON lines.
#[derive(Copy, Clone, Debug)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn snapshot(&self, out: &mut impl Write, snapshot: &Snapshot) -> Result<()> {
        snapshot.validate().context("Session produced an inconsistent snapshot")?;
        if self.json {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
        } else {
            write!(out, "{}", status_line(snapshot))?;
            write!(out, "{}", grid(snapshot))?;
        }
        Ok(())
    }

    pub fn events(&self, out: &mut impl Write, events: &[GameEvent]) -> Result<()> {
        for event in events {
            if self.json {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", describe(event))?;
            }
        }
        Ok(())
    }

    pub fn results(&self, out: &mut impl Write, results: &[LevelResult]) -> Result<()> {
        if self.json {
            serde_json::to_writer(&mut *out, results)?;
            writeln!(out)?;
        } else if results.is_empty() {
            writeln!(out, "No finished levels yet")?;
        } else {
            let list: Vec<_> = results.iter().map(ToString::to_string).collect();
            writeln!(out, "Results: {}", list.join(", "))?;
        }
        Ok(())
    }

    pub fn message(&self, out: &mut impl Write, message: &str) -> Result<()> {
        if self.json {
            serde_json::to_writer(&mut *out, &serde_json::json!({ "message": message }))?;
            writeln!(out)?;
        } else {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }
}

pub fn status_line(snapshot: &Snapshot) -> String {
    let mut line = format!(
        "Level {}  Score: {}/{}  Moves: {}/{}  Time: {}s  Bonus: {}% Complete",
        snapshot.level,
        snapshot.score,
        snapshot.target_score,
        snapshot.moves,
        snapshot.max_moves,
        snapshot.time_remaining,
        snapshot.bonus_progress,
    );
    if snapshot.bonus_available {
        line.push_str("  ⭐ Star available");
    }
    if let Phase::LevelEnded(reason) = snapshot.phase {
        let _ = write!(line, "  [level over: {reason}, type `next`]");
    }
    line.push('\n');
    line
}

/// The board with column numbers on top and row numbers on the left; picked cells are bracketed.
pub fn grid(snapshot: &Snapshot) -> String {
    let side = usize::from(snapshot.side);
    let mut text = String::from("   ");
    for col in 0..side {
        let _ = write!(text, " {col:^3}");
    }
    text.push('\n');

    for (row, cells) in snapshot.cells.chunks(side.max(1)).enumerate() {
        let _ = write!(text, "{row:>2} ");
        for (col, symbol) in cells.iter().enumerate() {
            let index = (row * side + col) as u16;
            if snapshot.is_selected(index) {
                let _ = write!(text, "[{}]", symbol.glyph());
            } else {
                let _ = write!(text, " {} ", symbol.glyph());
            }
            text.push(' ');
        }
        text.push('\n');
    }
    text
}

pub fn describe(event: &GameEvent) -> String {
    use GameEvent::*;
    match *event {
        MatchResolved {
            matched,
            score_delta,
        } => format!("Matched {matched} tiles, +{score_delta} points"),
        RoundMissed { selected } => format!("No match among {selected} tiles"),
        BombDetonated { index } => format!("{} Bomb at {index} cleared its row and column", Symbol::Bomb),
        BombExpired { index } => format!("Bombs from {index} fizzled out"),
        BonusActivated => "⭐ Board reset, score forfeited".to_string(),
        LevelEnded {
            level,
            score,
            reason,
        } => format!("Game over! Level {level} ended ({reason}) with {score} points"),
        LevelAdvanced { level } => format!("Level {level} begins"),
    }
}
