//! Search module implementing negamax alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening under a time budget past a guaranteed baseline depth
//! - Reverse futility pruning near the horizon
//! - Transposition table cutoffs and move hints
//! - Null move pruning (opt-in per search)
//! - Late move reductions with re-search
//! - Quiescence search with delta and SEE pruning and a quiet-check extension
//! - Move ordering (TT move, SEE, killers, counter moves, piece class)

mod constants;
mod line;
mod log;
mod move_order;
mod negamax;
mod params;

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use ::log::info;

use super::error::PositionError;
use super::{Move, Position, MAX_PLY};
use crate::eval::Evaluator;
use crate::tt::TranspositionTable;

pub use self::log::IterationInfo;
pub use constants::{INFINITY, MATE_SCORE, MATE_THRESHOLD};
pub use line::{LineTag, SearchLine};
pub use params::{NullMove, SearchParams};

use negamax::Searcher;

/// Two killer slots per remaining depth.
///
/// Quiescence plies index with negative depths, which wrap to the far end
/// of the table.
#[derive(Clone, Debug)]
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    fn index(remaining: i32) -> usize {
        remaining.rem_euclid(MAX_PLY as i32) as usize
    }

    #[must_use]
    pub fn get(&self, remaining: i32) -> [Option<Move>; 2] {
        self.slots[Self::index(remaining)]
    }

    /// Record a cutoff move; the previous first killer moves to the
    /// second slot.
    pub fn update(&mut self, remaining: i32, mv: Move) {
        let row = &mut self.slots[Self::index(remaining)];
        if row[0] != Some(mv) {
            row[1] = row[0];
            row[0] = Some(mv);
        }
    }

    pub fn reset(&mut self) {
        for row in &mut self.slots {
            *row = [None; 2];
        }
    }
}

/// Refutations indexed by the source and destination of the move they
/// answered.
#[derive(Clone, Debug)]
pub struct CounterMoveTable {
    entries: Box<[[Option<Move>; 64]; 64]>,
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterMoveTable {
    #[must_use]
    pub fn new() -> Self {
        CounterMoveTable {
            entries: Box::new([[None; 64]; 64]),
        }
    }

    #[must_use]
    pub fn get(&self, prev: Move) -> Option<Move> {
        self.entries[prev.from().index()][prev.to().index()]
    }

    pub fn set(&mut self, prev: Move, mv: Move) {
        self.entries[prev.from().index()][prev.to().index()] = Some(mv);
    }

    pub fn reset(&mut self) {
        for counters in self.entries.iter_mut() {
            *counters = [None; 64];
        }
    }
}

/// Heuristic tables owned by one search.
#[derive(Clone, Debug, Default)]
pub struct SearchTables {
    pub killers: KillerTable,
    pub counters: CounterMoveTable,
}

impl SearchTables {
    pub fn reset(&mut self) {
        self.killers.reset();
        self.counters.reset();
    }

    /// Remember `mv` as the refutation at this node.
    ///
    /// Killers only take quiet non-promotions that do not give check; the
    /// counter table takes any non-capture answering a real move.
    pub(crate) fn record_cutoff(&mut self, remaining: i32, mv: Move, gives_check: bool, prev: Option<Move>) {
        if mv.is_quiet() && !mv.is_promotion() && !gives_check {
            self.killers.update(remaining, mv);
        }
        if let Some(prev) = prev {
            if !mv.is_capture() {
                self.counters.set(prev, mv);
            }
        }
    }
}

/// Node counters for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Negamax nodes above the horizon
    pub inner_nodes: u64,
    /// Negamax nodes handed to quiescence
    pub leaf_nodes: u64,
    pub q_nodes: u64,
    pub tt_hits: u64,
    pub tt_stores: u64,
}

impl SearchStats {
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.inner_nodes + self.leaf_nodes + self.q_nodes
    }
}

/// What a completed search settled on.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub best_move: Move,
    /// Side-to-move relative centipawns of the last completed iteration
    pub score: i32,
    /// Depth of the last completed iteration; 0 if none completed
    pub depth: u32,
    /// The clock or the stop flag cut an iteration short
    pub interrupted: bool,
    pub line: SearchLine,
    pub stats: SearchStats,
    pub elapsed: Duration,
    pub iterations: Vec<IterationInfo>,
}

/// Result of a top-level search.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    BestMove(SearchReport),
    /// The side to move has no legal moves and is in check
    Checkmated,
    /// The side to move has no legal moves and is not in check
    Stalemate,
}

impl SearchOutcome {
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        match self {
            SearchOutcome::BestMove(report) => Some(report.best_move),
            SearchOutcome::Checkmated | SearchOutcome::Stalemate => None,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            SearchOutcome::BestMove(report) => Some(report),
            SearchOutcome::Checkmated | SearchOutcome::Stalemate => None,
        }
    }
}

/// Pick a move for the side to move in `pos`.
///
/// `tt` must be keyed with the same Zobrist keys as `pos`. The position is
/// restored before returning. Setting `stop` ends the search at the next
/// node; the best move of the last completed iteration is kept.
pub fn search(
    pos: &mut Position,
    tt: &mut TranspositionTable,
    evaluator: &dyn Evaluator,
    params: &SearchParams,
    stop: &AtomicBool,
) -> Result<SearchOutcome, PositionError> {
    let Some(fallback) = pos.legal_moves().first() else {
        return Ok(if pos.is_in_check() {
            SearchOutcome::Checkmated
        } else {
            SearchOutcome::Stalemate
        });
    };

    let mut searcher = Searcher::new(pos, tt, evaluator, params, stop);
    let report = searcher.iterative_deepening(fallback)?;
    info!(
        "search done: {} depth {} score {} nodes {} in {} ms{}",
        report.best_move,
        report.depth,
        report.score,
        report.stats.nodes(),
        report.elapsed.as_millis(),
        if report.interrupted { " (interrupted)" } else { "" }
    );
    Ok(SearchOutcome::BestMove(report))
}
