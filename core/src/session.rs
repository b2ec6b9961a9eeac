use alloc::vec::Vec;
use core::mem;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::timer::{Deadline, Interval};
use crate::*;

/// Period of the level countdown.
pub const TICK_MS: u32 = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "reason", rename_all = "kebab-case")]
pub enum Phase {
    Playing,
    /// Only observable with [`LevelAdvance::OnConfirm`].
    LevelEnded(EndReason),
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// One selection from its first pick until it settles.
#[derive(Clone, Debug, PartialEq)]
struct Round {
    selection: Selection,
    /// Counters before this round credited anything.
    baseline: Tally,
    applied: Option<Evaluation>,
    settle: Option<Deadline>,
    generation: u32,
    /// The armed bomb was stamped by this round.
    owns_bomb: bool,
}

impl Round {
    fn new(cap: u8, baseline: Tally, generation: u32) -> Self {
        Self {
            selection: Selection::with_cap(cap),
            baseline,
            applied: None,
            settle: None,
            generation,
            owns_bomb: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Timer {
    Settle,
    BombExpiry,
    Tick,
}

/// Owns the whole game: board, counters, timers and the results log.
#[derive(Clone, Debug)]
pub struct Session<S = RandomSymbols> {
    config: GameConfig,
    source: S,
    board: Board,
    level: u32,
    tally: Tally,
    time_remaining: u32,
    pending_bomb: Option<CellIndex>,
    phase: Phase,
    round: Option<Round>,
    armed: Option<ArmedBomb>,
    ticker: Option<Interval>,
    results: Vec<LevelResult>,
    events: Vec<GameEvent>,
}

impl Session<RandomSymbols> {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_source(config, RandomSymbols::new(seed))
    }
}

impl<S: SymbolSource> Session<S> {
    pub fn with_source(config: GameConfig, mut source: S) -> Result<Self> {
        config.validate()?;
        let board = Board::random(config.grid_size, &mut source);
        Self::with_board(config, board, source)
    }

    /// Starts level 1 on a prepared board.
    pub fn with_board(config: GameConfig, board: Board, source: S) -> Result<Self> {
        config.validate()?;
        if board.side() != config.grid_size {
            return Err(GameError::InvalidBoardShape);
        }
        log::debug!("session started with {:?}", config);
        Ok(Self {
            config,
            source,
            board,
            level: 1,
            tally: Tally::default(),
            time_remaining: config.time_limit_secs,
            pending_bomb: None,
            phase: Phase::Playing,
            round: None,
            armed: None,
            ticker: Some(Interval::new(TICK_MS)),
            results: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> &[Pick] {
        self.round
            .as_ref()
            .map(|round| round.selection.picks())
            .unwrap_or_default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn score(&self) -> u32 {
        self.tally.score
    }

    pub fn moves(&self) -> u32 {
        self.tally.moves
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn bonus_progress(&self) -> u8 {
        self.tally.bonus_progress
    }

    pub fn bonus_available(&self) -> bool {
        self.tally.bonus_available
    }

    pub fn pending_bomb(&self) -> Option<CellIndex> {
        self.pending_bomb
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn results(&self) -> &[LevelResult] {
        &self.results
    }

    /// Whether the countdown is running.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Milliseconds until the current round settles, if it has been evaluated.
    pub fn settles_in_ms(&self) -> Option<u32> {
        self.round
            .as_ref()
            .and_then(|round| round.settle)
            .map(|settle| settle.remaining_ms())
    }

    pub fn hint(&self) -> &'static str {
        HINT
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Picks a cell for the current round, or activates it when it holds a bomb.
    pub fn select_cell(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        let index = self.board.validate_index(index)?;
        if !self.phase.is_playing() {
            return Ok(SelectOutcome::NoChange);
        }

        if self.board.contains_bomb(index) {
            return Ok(match self.activate_bomb(index)? {
                ActionOutcome::Changed => SelectOutcome::Detonated,
                ActionOutcome::NoChange => SelectOutcome::NoChange,
            });
        }

        let Self {
            config,
            board,
            tally,
            round,
            ..
        } = self;
        let round = round
            .get_or_insert_with(|| Round::new(config.selection_cap, *tally, board.generation()));
        if !round.selection.select(index, board) {
            return Ok(SelectOutcome::NoChange);
        }

        let outcome = self.evaluate_round();
        self.check_level_end();
        Ok(outcome)
    }

    /// Clears the row and column through a bomb cell. Any other cell is ignored.
    pub fn activate_bomb(&mut self, index: CellIndex) -> Result<ActionOutcome> {
        let index = self.board.validate_index(index)?;
        if !self.phase.is_playing() || !detonate(&mut self.board, index, &mut self.source) {
            return Ok(ActionOutcome::NoChange);
        }

        self.pending_bomb = None;
        self.events.push(GameEvent::BombDetonated { index });
        self.check_level_end();
        Ok(ActionOutcome::Changed)
    }

    /// Redraws the whole board at the cost of the current score.
    pub fn activate_bonus(&mut self) -> ActionOutcome {
        if !self.phase.is_playing() || !self.tally.bonus_available {
            return ActionOutcome::NoChange;
        }

        self.round = None;
        self.armed = None;
        self.pending_bomb = None;
        self.board.fill(&mut self.source);
        self.tally.bonus_available = false;
        self.tally.score = 0;
        log::debug!("bonus activated on level {}", self.level);

        self.events.push(GameEvent::BonusActivated);
        self.check_level_end();
        ActionOutcome::Changed
    }

    /// Leaves a finished level. Does nothing while a level is being played.
    pub fn confirm_next_level(&mut self) -> ActionOutcome {
        if self.phase.is_playing() {
            return ActionOutcome::NoChange;
        }
        self.start_next_level();
        ActionOutcome::Changed
    }

    /// One second of the level countdown.
    pub fn tick(&mut self) -> ActionOutcome {
        let counting = self.phase.is_playing()
            && self.time_remaining > 0
            && self.tally.score < self.config.target_score
            && self.tally.moves < self.config.max_moves;
        if !counting {
            return ActionOutcome::NoChange;
        }

        self.time_remaining -= 1;
        log::trace!("{}s left", self.time_remaining);
        self.check_level_end();
        ActionOutcome::Changed
    }

    /// Lets `elapsed_ms` of game time pass, firing due timers in order.
    pub fn advance(&mut self, elapsed_ms: u32) {
        let mut left = elapsed_ms;
        while let Some((due, timer)) = self.next_timer() {
            if due > left {
                self.elapse_timers(left);
                return;
            }
            self.elapse_timers(due);
            left -= due;

            match timer {
                Timer::Settle => self.settle_round(),
                Timer::BombExpiry => self.expire_bomb(),
                Timer::Tick => {
                    if let Some(ticker) = self.ticker.as_mut() {
                        ticker.take_due();
                    }
                    self.tick();
                }
            }
        }
    }

    /// Earliest pending timer; ties go to the settle, then the bomb, then the tick.
    fn next_timer(&self) -> Option<(u32, Timer)> {
        let settle = self.settles_in_ms().map(|ms| (ms, Timer::Settle));
        let bomb = self
            .armed
            .as_ref()
            .map(|bomb| (bomb.expires_in_ms(), Timer::BombExpiry));
        let tick = self
            .ticker
            .as_ref()
            .map(|ticker| (ticker.until_next_ms(), Timer::Tick));

        [settle, bomb, tick]
            .into_iter()
            .flatten()
            .reduce(|best, next| if next.0 < best.0 { next } else { best })
    }

    fn elapse_timers(&mut self, ms: u32) {
        if let Some(settle) = self.round.as_mut().and_then(|round| round.settle.as_mut()) {
            settle.elapse(ms);
        }
        if let Some(bomb) = self.armed.as_mut() {
            bomb.elapse(ms);
        }
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.elapse(ms);
        }
    }

    /// Re-evaluates the round after a pick so that it carries exactly one outcome.
    fn evaluate_round(&mut self) -> SelectOutcome {
        let Self {
            config,
            source,
            board,
            tally,
            pending_bomb,
            round,
            armed,
            events,
            ..
        } = self;
        let Some(round) = round.as_mut() else {
            return SelectOutcome::NoChange;
        };
        let picks = round.selection.picks();
        let Some(evaluation) = evaluate(picks, config) else {
            return SelectOutcome::Selected;
        };

        let places_bomb = evaluation.effect() == MatchEffect::Bomb;
        if round.owns_bomb && !places_bomb {
            if let Some(bomb) = armed.take() {
                bomb.disarm(board, picks);
            }
            *pending_bomb = None;
            round.owns_bomb = false;
        }
        if places_bomb && !round.owns_bomb {
            if let Some(old) = armed.take() {
                if let Some(&index) = old.expire(board, source).first() {
                    events.push(GameEvent::BombExpired { index });
                }
            }
            let bomb = ArmedBomb::arm(board, picks, config.bomb_lifetime_ms);
            *pending_bomb = bomb.trigger();
            *armed = Some(bomb);
            round.owns_bomb = true;
        }

        round.applied = Some(evaluation);
        round.settle = Some(Deadline::after(config.settle_delay_ms));
        *tally = round.baseline.credit(evaluation, config);
        log::debug!("round evaluated as {:?}, tally {:?}", evaluation, tally);

        match evaluation {
            Evaluation::Match { count, .. } => SelectOutcome::Matched(count),
            Evaluation::Mismatch { count } => SelectOutcome::Mismatched(count),
        }
    }

    /// Refills the round's cells and forgets its selection.
    fn settle_round(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        if round.generation != self.board.generation() {
            log::warn!("discarding round from board generation {}", round.generation);
            return;
        }

        let board = &self.board;
        let armed = self.armed.as_ref();
        let cells: SmallVec<[CellIndex; 5]> = round
            .selection
            .indices()
            .filter(|&index| {
                !(board.contains_bomb(index) && armed.is_some_and(|bomb| bomb.covers(index)))
            })
            .collect();
        self.board.refill_cells(cells, &mut self.source);

        match round.applied {
            Some(evaluation @ Evaluation::Match { count, .. }) => {
                log::debug!("round settled, {} matched", count);
                self.events.push(GameEvent::MatchResolved {
                    matched: count,
                    score_delta: evaluation.score_delta(),
                });
            }
            Some(Evaluation::Mismatch { count }) => {
                log::debug!("round settled, {} picked without a match", count);
                self.events.push(GameEvent::RoundMissed { selected: count });
            }
            None => {}
        }
        self.check_level_end();
    }

    fn expire_bomb(&mut self) {
        let Some(bomb) = self.armed.take() else {
            return;
        };
        let trigger = bomb.trigger();
        let expired = bomb.expire(&mut self.board, &mut self.source);

        if self.pending_bomb.is_some() && self.pending_bomb == trigger {
            self.pending_bomb = None;
        }
        if let Some(round) = self.round.as_mut() {
            round.owns_bomb = false;
        }
        if let Some(&index) = expired.first() {
            self.events.push(GameEvent::BombExpired { index });
        }
    }

    fn end_reason(&self) -> Option<EndReason> {
        if self.tally.score >= self.config.target_score {
            Some(EndReason::ScoreTarget)
        } else if self.tally.moves >= self.config.max_moves {
            Some(EndReason::MovesExhausted)
        } else if self.time_remaining == 0 {
            Some(EndReason::TimeExpired)
        } else {
            None
        }
    }

    /// Runs once after every command: records a finished level and moves on.
    fn check_level_end(&mut self) {
        if !self.phase.is_playing() {
            return;
        }
        let Some(reason) = self.end_reason() else {
            return;
        };

        let result = LevelResult {
            level: self.level,
            score: self.tally.score,
        };
        log::debug!("level {} ended ({}) with {} points", result.level, reason, result.score);
        self.results.push(result);
        self.events.push(GameEvent::LevelEnded {
            level: result.level,
            score: result.score,
            reason,
        });

        self.ticker = None;
        self.round = None;
        self.armed = None;
        self.pending_bomb = None;
        self.phase = Phase::LevelEnded(reason);

        if self.config.level_advance == LevelAdvance::Automatic {
            self.start_next_level();
        }
    }

    fn start_next_level(&mut self) {
        let bonus_available = match self.config.bonus_carry_over {
            BonusCarryOver::Persist => self.tally.bonus_available,
            BonusCarryOver::Reset => false,
        };

        self.level += 1;
        self.board.fill(&mut self.source);
        self.tally = Tally {
            bonus_available,
            ..Tally::default()
        };
        self.time_remaining = self.config.time_limit_secs;
        self.round = None;
        self.armed = None;
        self.pending_bomb = None;
        self.ticker = Some(Interval::new(TICK_MS));
        self.phase = Phase::Playing;

        log::debug!("level {} started", self.level);
        self.events.push(GameEvent::LevelAdvanced { level: self.level });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::vec;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use Symbol::{Cherry, Grape, Kiwi, Strawberry};

    /// Row-major board cycling through the alphabet, so neighbours never match by accident.
    fn board(cells: &[(CellIndex, Symbol)]) -> Board {
        let mut symbols: Vec<_> = (0..64).map(|i| Symbol::ORDINARY[i % 8]).collect();
        for &(index, symbol) in cells {
            symbols[usize::from(index)] = symbol;
        }
        Board::from_symbols(8, &symbols).unwrap()
    }

    fn session_with(config: GameConfig, cells: &[(CellIndex, Symbol)]) -> Session<CycleSymbols> {
        Session::with_board(config, board(cells), CycleSymbols::new([Strawberry])).unwrap()
    }

    fn session(cells: &[(CellIndex, Symbol)]) -> Session<CycleSymbols> {
        session_with(GameConfig::default(), cells)
    }

    fn pick_all(session: &mut Session<CycleSymbols>, indices: &[CellIndex]) -> SelectOutcome {
        indices
            .iter()
            .map(|&index| session.select_cell(index).unwrap())
            .last()
            .unwrap()
    }

    #[test]
    fn new_session_starts_level_one() {
        let session = Session::new(GameConfig::default(), 1).unwrap();

        assert_eq!(session.level(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.time_remaining(), 120);
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.is_ticking());
        assert!(session.selection().is_empty());
        assert_eq!(session.board().bomb_count(), 0);
        assert_eq!(session.hint(), HINT);
    }

    #[test]
    fn rejects_invalid_config_and_board() {
        let config = GameConfig {
            selection_cap: 0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config, 1),
            Err(GameError::InvalidConfig(_))
        ));

        let small = Board::from_symbols(2, &[Kiwi; 4]).unwrap();
        let source = CycleSymbols::new([Kiwi]);
        assert!(matches!(
            Session::with_board(GameConfig::default(), small, source),
            Err(GameError::InvalidBoardShape)
        ));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut session = session(&[]);
        assert_eq!(session.select_cell(64), Err(GameError::InvalidIndex));
        assert_eq!(session.activate_bomb(400), Err(GameError::InvalidIndex));
    }

    #[test]
    fn three_of_a_kind_scores_and_unlocks_bonus() {
        let mut session = session(&[(0, Cherry), (1, Cherry), (2, Cherry)]);

        assert_eq!(session.select_cell(0).unwrap(), SelectOutcome::Selected);
        assert_eq!(pick_all(&mut session, &[1, 2]), SelectOutcome::Matched(3));

        assert_eq!(session.score(), 3);
        assert_eq!(session.moves(), 1);
        assert_eq!(session.bonus_progress(), 20);
        assert!(session.bonus_available());
        assert_eq!(session.selection().len(), 3);
        assert!(session.take_events().is_empty());

        session.advance(999);
        assert_eq!(session.selection().len(), 3);
        assert_eq!(session.board()[0], Cherry);

        session.advance(1);
        assert!(session.selection().is_empty());
        assert!((0..3).all(|i| session.board()[i] == Strawberry));
        assert_eq!(
            session.take_events(),
            [GameEvent::MatchResolved {
                matched: 3,
                score_delta: 3
            }]
        );
    }

    #[test]
    fn growing_round_replaces_its_outcome() {
        let mut session = session(&[(0, Kiwi), (9, Kiwi), (18, Kiwi)]);

        assert_eq!(pick_all(&mut session, &[0, 9]), SelectOutcome::Matched(2));
        assert_eq!((session.score(), session.moves()), (2, 1));
        assert!(!session.bonus_available());

        assert_eq!(session.select_cell(18).unwrap(), SelectOutcome::Matched(3));
        assert_eq!((session.score(), session.moves()), (3, 1));
        assert!(session.bonus_available());
    }

    #[test]
    fn mismatch_reverts_round_and_still_refills() {
        let mut session = session(&[(0, Kiwi), (9, Kiwi), (18, Grape)]);
        pick_all(&mut session, &[0, 9]);

        assert_eq!(session.select_cell(18).unwrap(), SelectOutcome::Mismatched(3));
        assert_eq!((session.score(), session.moves()), (0, 0));

        session.advance(1000);
        assert!(session.selection().is_empty());
        assert!([0, 9, 18].iter().all(|&i| session.board()[i] == Strawberry));
        assert_eq!(
            session.take_events(),
            [GameEvent::RoundMissed { selected: 3 }]
        );
    }

    #[test]
    fn single_pick_waits_for_a_partner() {
        let mut session = session(&[]);
        session.select_cell(5).unwrap();

        assert_eq!(session.settles_in_ms(), None);
        session.advance(5000);
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn duplicate_pick_and_full_selection_are_ignored() {
        let cells: Vec<(CellIndex, Symbol)> =
            [0, 9, 18, 27, 36, 45].iter().map(|&i| (i, Grape)).collect();
        let mut session = session(&cells);

        session.select_cell(0).unwrap();
        assert_eq!(session.select_cell(0).unwrap(), SelectOutcome::NoChange);
        pick_all(&mut session, &[9, 18, 27, 36]);
        assert_eq!(session.select_cell(45).unwrap(), SelectOutcome::NoChange);
        assert_eq!(session.selection().len(), 5);
    }

    #[test]
    fn four_of_a_kind_places_bombs() {
        let cells = [(0, Grape), (9, Grape), (18, Grape), (27, Grape)];
        let mut session = session(&cells);

        assert_eq!(pick_all(&mut session, &[18, 0, 9, 27]), SelectOutcome::Matched(4));

        assert_eq!(session.pending_bomb(), Some(18));
        assert_eq!(session.board().bomb_count(), 4);
        assert!(cells.iter().all(|&(i, _)| session.board().contains_bomb(i)));
        assert_eq!((session.score(), session.moves()), (4, 1));
    }

    #[test]
    fn selecting_a_bomb_detonates_its_cross() {
        let cells = [(0, Grape), (9, Grape), (18, Grape), (27, Grape)];
        let mut session = session(&cells);
        pick_all(&mut session, &[18, 0, 9, 27]);

        assert_eq!(session.select_cell(9).unwrap(), SelectOutcome::Detonated);

        let board = session.board();
        assert!(!board.contains_bomb(9));
        assert!((8..16).all(|i| board[i] == Strawberry));
        assert!((1..64).step_by(8).all(|i| board[i] == Strawberry));
        assert_eq!(board.bomb_count(), 3);
        assert_eq!(session.pending_bomb(), None);
        assert_eq!((session.score(), session.moves()), (4, 1));
        assert_eq!(session.selection().len(), 4);
        assert_eq!(
            session.take_events(),
            [GameEvent::BombDetonated { index: 9 }]
        );

        session.advance(1000);
        assert_eq!(session.board().bomb_count(), 0);
        assert_eq!(
            session.take_events(),
            [
                GameEvent::MatchResolved {
                    matched: 4,
                    score_delta: 4
                },
                GameEvent::BombExpired { index: 18 },
            ]
        );
    }

    #[test]
    fn expiry_names_a_cell_still_holding_a_marker() {
        let mut session = session(&[(0, Grape), (9, Grape), (18, Grape), (27, Grape)]);
        pick_all(&mut session, &[0, 9, 18, 27]);
        session.activate_bomb(0).unwrap();
        session.take_events();

        session.advance(1000);

        assert_eq!(
            session.take_events(),
            [
                GameEvent::MatchResolved {
                    matched: 4,
                    score_delta: 4
                },
                GameEvent::BombExpired { index: 9 },
            ]
        );
    }

    #[test]
    fn new_bombs_replace_a_partly_detonated_set() {
        let config = GameConfig {
            bomb_lifetime_ms: 3000,
            ..Default::default()
        };
        let first: [CellIndex; 4] = [0, 9, 18, 27];
        let second: [CellIndex; 4] = [36, 45, 54, 63];
        let cells: Vec<_> = first
            .iter()
            .map(|&i| (i, Grape))
            .chain(second.iter().map(|&i| (i, Kiwi)))
            .collect();
        let mut session = session_with(config, &cells);

        pick_all(&mut session, &first);
        session.advance(1000);
        assert_eq!(session.select_cell(0).unwrap(), SelectOutcome::Detonated);
        session.take_events();

        assert_eq!(pick_all(&mut session, &second), SelectOutcome::Matched(4));

        assert_eq!(session.take_events(), [GameEvent::BombExpired { index: 9 }]);
        assert_eq!(session.pending_bomb(), Some(36));
        assert_eq!(session.board().bomb_count(), 4);
        assert!(second.iter().all(|&i| session.board().contains_bomb(i)));
    }

    #[test]
    fn unactivated_bombs_expire_with_the_round() {
        let mut session = session(&[(0, Grape), (9, Grape), (18, Grape), (27, Grape)]);
        pick_all(&mut session, &[0, 9, 18, 27]);

        session.advance(1000);

        assert_eq!(session.board().bomb_count(), 0);
        assert_eq!(session.pending_bomb(), None);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn bomb_lifetime_can_outlast_the_round() {
        let config = GameConfig {
            bomb_lifetime_ms: 3000,
            ..Default::default()
        };
        let mut session = session_with(config, &[(0, Grape), (9, Grape), (18, Grape), (27, Grape)]);
        pick_all(&mut session, &[0, 9, 18, 27]);

        session.advance(1000);
        assert!(session.selection().is_empty());
        assert_eq!(session.board().bomb_count(), 4);
        assert_eq!(session.pending_bomb(), Some(0));

        session.advance(1999);
        assert_eq!(session.board().bomb_count(), 4);
        session.advance(1);
        assert_eq!(session.board().bomb_count(), 0);
        assert_eq!(session.pending_bomb(), None);
    }

    #[test]
    fn fifth_pick_disarms_bombs() {
        let cells = [(0, Grape), (9, Grape), (18, Grape), (27, Grape), (36, Grape)];
        let mut session = session(&cells);
        pick_all(&mut session, &[0, 9, 18, 27]);

        assert_eq!(session.select_cell(36).unwrap(), SelectOutcome::Matched(5));

        assert_eq!(session.board().bomb_count(), 0);
        assert!(cells.iter().all(|&(i, s)| session.board()[i] == s));
        assert_eq!(session.pending_bomb(), None);
        assert_eq!((session.score(), session.moves()), (5, 1));
    }

    #[test]
    fn precondition_violations_are_ignored() {
        let mut session = session(&[]);

        assert_eq!(session.activate_bomb(3).unwrap(), ActionOutcome::NoChange);
        assert_eq!(session.activate_bonus(), ActionOutcome::NoChange);
        assert_eq!(session.confirm_next_level(), ActionOutcome::NoChange);
        assert_eq!(session.level(), 1);
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn bonus_resets_board_and_score() {
        let mut session = session(&[(0, Cherry), (9, Cherry), (18, Cherry)]);
        pick_all(&mut session, &[0, 9, 18]);
        let generation = session.board().generation();

        assert_eq!(session.activate_bonus(), ActionOutcome::Changed);

        assert_eq!(session.board().generation(), generation + 1);
        assert!(session.board().iter().all(|s| s == Strawberry));
        assert_eq!(session.score(), 0);
        assert_eq!(session.moves(), 1);
        assert_eq!(session.bonus_progress(), 20);
        assert!(!session.bonus_available());
        assert!(session.selection().is_empty());
        assert_eq!(session.settles_in_ms(), None);
        assert_eq!(session.take_events(), [GameEvent::BonusActivated]);
        assert_eq!(session.activate_bonus(), ActionOutcome::NoChange);
    }

    #[test]
    fn bonus_progress_stops_at_cap() {
        let config = GameConfig {
            bonus_increment: 30,
            ..Default::default()
        };
        let triples: [[CellIndex; 3]; 4] = [[0, 1, 2], [8, 9, 10], [16, 17, 18], [24, 25, 26]];
        let cells: Vec<_> = triples.iter().flatten().map(|&i| (i, Cherry)).collect();
        let mut session = session_with(config, &cells);

        let mut progress = vec![];
        for triple in triples {
            pick_all(&mut session, &triple);
            progress.push(session.bonus_progress());
            session.advance(1000);
        }

        assert_eq!(progress, [30, 60, 90, 100]);
        assert!(session.bonus_available());
    }

    #[test]
    fn reaching_target_score_ends_level() {
        let config = GameConfig {
            target_score: 10,
            ..Default::default()
        };
        let first: [CellIndex; 5] = [0, 9, 18, 27, 36];
        let second: [CellIndex; 5] = [1, 10, 19, 28, 37];
        let cells: Vec<_> = first
            .iter()
            .map(|&i| (i, Grape))
            .chain(second.iter().map(|&i| (i, Kiwi)))
            .collect();
        let mut session = session_with(config, &cells);

        pick_all(&mut session, &first);
        session.advance(40_000);
        assert_eq!(session.time_remaining(), 80);
        pick_all(&mut session, &second);

        assert_eq!(session.results(), [LevelResult { level: 1, score: 10 }]);
        assert_eq!(session.level(), 2);
        let ended = session
            .take_events()
            .into_iter()
            .find(|event| matches!(event, GameEvent::LevelEnded { .. }));
        assert_eq!(
            ended,
            Some(GameEvent::LevelEnded {
                level: 1,
                score: 10,
                reason: EndReason::ScoreTarget
            })
        );
    }

    #[test]
    fn running_out_of_moves_ends_level_and_resets() {
        let config = GameConfig {
            max_moves: 2,
            ..Default::default()
        };
        let mut session = session_with(config, &[(0, Grape), (9, Grape), (1, Kiwi), (10, Kiwi)]);

        pick_all(&mut session, &[0, 9]);
        session.advance(1000);
        pick_all(&mut session, &[1, 10]);

        assert_eq!(session.results().last(), Some(&LevelResult { level: 1, score: 4 }));
        assert_eq!(session.level(), 2);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!((session.score(), session.moves()), (0, 0));
        assert_eq!(session.time_remaining(), 120);
        assert_eq!(session.bonus_progress(), 0);
        assert!(session.selection().is_empty());
        assert_eq!(session.settles_in_ms(), None);
        assert_eq!(
            session.take_events(),
            [
                GameEvent::MatchResolved {
                    matched: 2,
                    score_delta: 2
                },
                GameEvent::LevelEnded {
                    level: 1,
                    score: 4,
                    reason: EndReason::MovesExhausted
                },
                GameEvent::LevelAdvanced { level: 2 },
            ]
        );
    }

    #[test]
    fn default_target_ends_level_with_moves_and_time_left() {
        let mut session = session(&[(0, Grape), (9, Grape)]);
        session.tally = Tally {
            score: 98,
            moves: 2,
            ..Tally::default()
        };
        session.time_remaining = 80;

        pick_all(&mut session, &[0, 9]);

        assert_eq!(session.results(), [LevelResult { level: 1, score: 100 }]);
        let ended = session
            .take_events()
            .into_iter()
            .find(|event| matches!(event, GameEvent::LevelEnded { .. }));
        assert_eq!(
            ended,
            Some(GameEvent::LevelEnded {
                level: 1,
                score: 100,
                reason: EndReason::ScoreTarget
            })
        );
        assert_eq!(session.level(), 2);
        assert_eq!((session.score(), session.moves()), (0, 0));
        assert_eq!(session.time_remaining(), 120);
    }

    #[test]
    fn default_move_budget_ends_level_at_seven() {
        let mut session = session(&[(0, Grape), (9, Grape)]);
        session.tally = Tally {
            score: 8,
            moves: 6,
            ..Tally::default()
        };

        pick_all(&mut session, &[0, 9]);

        assert_eq!(session.results(), [LevelResult { level: 1, score: 10 }]);
        let ended = session
            .take_events()
            .into_iter()
            .find(|event| matches!(event, GameEvent::LevelEnded { .. }));
        assert_eq!(
            ended,
            Some(GameEvent::LevelEnded {
                level: 1,
                score: 10,
                reason: EndReason::MovesExhausted
            })
        );
        assert_eq!(session.level(), 2);
        assert_eq!(session.bonus_progress(), 0);
    }

    #[test]
    fn countdown_expiry_ends_level() {
        let mut session = session(&[]);

        session.advance(60_000);
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.tick(), ActionOutcome::Changed);
        assert_eq!(session.time_remaining(), 59);

        session.advance(59_000);

        assert_eq!(session.results(), [LevelResult { level: 1, score: 0 }]);
        assert_eq!(session.level(), 2);
        assert_eq!(session.time_remaining(), 120);
        assert!(session.is_ticking());
        assert_eq!(
            session.take_events(),
            [
                GameEvent::LevelEnded {
                    level: 1,
                    score: 0,
                    reason: EndReason::TimeExpired
                },
                GameEvent::LevelAdvanced { level: 2 },
            ]
        );
    }

    #[test]
    fn on_confirm_suspends_the_level() {
        let config = GameConfig {
            max_moves: 1,
            level_advance: LevelAdvance::OnConfirm,
            ..Default::default()
        };
        let mut session = session_with(config, &[(0, Grape), (9, Grape)]);
        pick_all(&mut session, &[0, 9]);

        assert_eq!(
            session.phase(),
            Phase::LevelEnded(EndReason::MovesExhausted)
        );
        assert!(!session.is_ticking());
        session.advance(10_000);
        assert_eq!(session.time_remaining(), 120);
        assert_eq!(session.tick(), ActionOutcome::NoChange);
        assert_eq!(session.select_cell(5).unwrap(), SelectOutcome::NoChange);
        assert_eq!(session.results().len(), 1);

        assert_eq!(session.confirm_next_level(), ActionOutcome::Changed);
        assert_eq!(session.level(), 2);
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.is_ticking());
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn bonus_availability_follows_carry_over_policy() {
        for (policy, expected) in [
            (BonusCarryOver::Persist, true),
            (BonusCarryOver::Reset, false),
        ] {
            let config = GameConfig {
                max_moves: 1,
                bonus_match_size: 2,
                bomb_match_size: 4,
                bonus_carry_over: policy,
                ..Default::default()
            };
            let mut session = session_with(config, &[(0, Cherry), (9, Cherry)]);
            pick_all(&mut session, &[0, 9]);
            assert_eq!(session.level(), 2);
            assert_eq!(session.bonus_progress(), 0);
            assert_eq!(session.bonus_available(), expected, "{:?}", policy);
        }
    }

    #[test]
    fn random_play_keeps_invariants() {
        let config = GameConfig::default();
        let mut session = Session::new(config, 11).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);

        for _ in 0..5000 {
            match rng.random_range(0..20) {
                0..=15 => {
                    session.select_cell(rng.random_range(0..64)).unwrap();
                }
                16 | 17 => session.advance(rng.random_range(0..1500)),
                18 => {
                    session.activate_bonus();
                }
                _ => {
                    session.activate_bomb(rng.random_range(0..64)).unwrap();
                }
            }

            let picks = session.selection();
            let unique: BTreeSet<_> = picks.iter().map(|pick| pick.index).collect();
            assert!(picks.len() <= usize::from(config.selection_cap));
            assert_eq!(unique.len(), picks.len());
            assert!(picks.iter().all(|pick| !pick.symbol.is_bomb()));
            assert!(session.bonus_progress() <= BONUS_CAP);
            assert!(session.time_remaining() <= config.time_limit_secs);
            if let Some(index) = session.pending_bomb() {
                assert!(session.board().contains_bomb(index));
            }
        }

        let levels: Vec<_> = session.results().iter().map(|r| r.level).collect();
        assert!(levels.iter().copied().eq(1..=levels.len() as u32));
        assert_eq!(session.level() as usize, levels.len() + 1);
    }
}
