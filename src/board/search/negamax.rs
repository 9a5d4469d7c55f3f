//! Core search implementation.
//!
//! This module implements:
//! - Iterative deepening under a time budget
//! - Negamax alpha-beta with a fail-soft best score
//! - Reverse futility pruning
//! - Null move pruning
//! - Late move reductions (LMR) with full-depth re-search
//! - Quiescence search with delta and SEE pruning and quiet checks
//! - Move ordering (TT move, SEE, killers, counter moves)

mod iterative;
mod pruning;
mod quiescence;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use super::constants::{INFINITY, MATE_SCORE};
use super::line::{LineTag, SearchLine};
use super::move_order::{order_moves, OrderingHints};
use super::params::SearchParams;
use super::{SearchStats, SearchTables};
use crate::board::error::PositionError;
use crate::board::{Move, Position, MAX_PLY};
use crate::eval::Evaluator;
use crate::tt::{BoundType, TranspositionTable};

/// State of one top-level search.
pub(super) struct Searcher<'a> {
    pos: &'a mut Position,
    tt: &'a mut TranspositionTable,
    evaluator: &'a dyn Evaluator,
    params: &'a SearchParams,
    stop: &'a AtomicBool,
    tables: SearchTables,
    start: Instant,
    /// Depth of the iteration in progress
    iteration_depth: u32,
    /// Set once the clock or the stop flag ends the search
    cancelled: bool,
    /// Best root move of the iteration in progress
    root_best: Option<Move>,
    stats: SearchStats,
}

/// Where a node sits in the tree.
#[derive(Clone, Copy, Debug)]
pub(super) struct Node {
    ply: usize,
    /// Move that led here; `None` at the root and right after a null move
    prev: Option<Move>,
    /// Somewhere below a null move
    in_null: bool,
}

impl Node {
    fn root() -> Self {
        Node {
            ply: 0,
            prev: None,
            in_null: false,
        }
    }

    fn child(self, mv: Move) -> Self {
        Node {
            ply: self.ply + 1,
            prev: Some(mv),
            in_null: self.in_null,
        }
    }

    fn null_child(self) -> Self {
        Node {
            ply: self.ply + 1,
            prev: None,
            in_null: true,
        }
    }

    fn mated_score(self) -> i32 {
        -MATE_SCORE + self.ply as i32
    }
}

impl<'a> Searcher<'a> {
    pub(super) fn new(
        pos: &'a mut Position,
        tt: &'a mut TranspositionTable,
        evaluator: &'a dyn Evaluator,
        params: &'a SearchParams,
        stop: &'a AtomicBool,
    ) -> Self {
        Searcher {
            pos,
            tt,
            evaluator,
            params,
            stop,
            tables: SearchTables::default(),
            start: Instant::now(),
            iteration_depth: 0,
            cancelled: false,
            root_best: None,
            stats: SearchStats::default(),
        }
    }

    /// Poll the stop flag, and the clock once past the baseline depth.
    ///
    /// Latches `cancelled`; the clock is read every 1024 nodes.
    fn should_stop(&mut self) -> bool {
        if self.cancelled {
            return true;
        }
        if self.stop.load(Ordering::Relaxed) {
            self.cancelled = true;
        } else if self.past_baseline()
            && self.stats.nodes() & 1023 == 0
            && self.start.elapsed() >= self.params.time_budget
        {
            self.cancelled = true;
        }
        self.cancelled
    }

    fn past_baseline(&self) -> bool {
        self.params.iterative && self.iteration_depth > self.params.baseline_depth
    }

    /// Evaluate position from side-to-move's perspective
    #[inline]
    fn static_eval(&self) -> i32 {
        self.evaluator
            .evaluate(self.pos)
            .relative_to(self.pos.side_to_move())
    }

    /// Alpha-beta negamax over `remaining` plies.
    ///
    /// Returns 0 once cancelled; callers check `cancelled` before trusting
    /// any score.
    pub(super) fn negamax(
        &mut self,
        remaining: i32,
        mut alpha: i32,
        beta: i32,
        node: Node,
        line: &mut SearchLine,
    ) -> Result<i32, PositionError> {
        let us = self.pos.side_to_move();
        if self.pos.king_square(us).is_none() {
            return Ok(-MATE_SCORE);
        }
        if self.pos.king_square(us.opponent()).is_none() {
            return Ok(MATE_SCORE);
        }
        if self.should_stop() {
            return Ok(0);
        }

        let moves = self.pos.legal_moves();
        let in_check = self.pos.is_in_check();
        if moves.is_empty() {
            return Ok(if in_check { node.mated_score() } else { 0 });
        }

        if remaining <= 0 || node.ply >= MAX_PLY {
            self.stats.leaf_nodes += 1;
            return self.quiesce(alpha, beta, 0, node, line);
        }
        self.stats.inner_nodes += 1;

        if let Some(score) = self.reverse_futility(remaining, beta, in_check, node, line) {
            return Ok(score);
        }

        let mut tt_move = None;
        if !node.in_null {
            if let Some(entry) = self.tt.probe(self.pos.hash()).copied() {
                self.stats.tt_hits += 1;
                if node.ply > 0 && entry.depth() >= remaining {
                    let score = entry.score();
                    let tag = match entry.bound_type() {
                        BoundType::Exact => Some(LineTag::TtExact),
                        BoundType::UpperBound if score <= alpha => Some(LineTag::TtUpper),
                        BoundType::LowerBound if score >= beta => Some(LineTag::TtLower),
                        _ => None,
                    };
                    if let Some(tag) = tag {
                        line.mark(tag);
                        return Ok(score);
                    }
                }
                tt_move = entry.best_move();
            }
        }

        if let Some(score) = self.try_null_move(remaining, beta, in_check, node, line)? {
            return Ok(score);
        }

        let hints = OrderingHints {
            tt_move,
            killers: self.tables.killers.get(remaining),
            counter: node.prev.and_then(|prev| self.tables.counters.get(prev)),
            endgame: self.evaluator.is_endgame(self.pos),
        };
        let ordered = order_moves(self.pos, moves.iter(), &hints);

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;
        let mut best_from_reduction = false;
        let mut moves_searched = 0u32;

        for scored in ordered.iter() {
            let mv = scored.mv;
            let gives_check = self.pos.gives_check(mv);
            let reduction = self.late_move_reduction(mv, remaining, in_check, gives_check, moves_searched);

            let mut child_line = SearchLine::new();
            let undo = self.pos.apply(mv)?;
            let result = self.search_child(remaining, reduction, alpha, beta, node.child(mv), &mut child_line);
            self.pos.undo(undo);
            let (score, reduced) = result?;

            if self.cancelled {
                return Ok(0);
            }
            moves_searched += 1;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                best_from_reduction = reduced;
                line.set(mv, child_line);
                if node.ply == 0 {
                    self.root_best = Some(mv);
                }
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.tables.record_cutoff(remaining, mv, gives_check, node.prev);
                break;
            }
        }

        if !node.in_null && !best_from_reduction {
            let bound = if best_score <= original_alpha {
                BoundType::UpperBound
            } else if best_score >= beta {
                BoundType::LowerBound
            } else {
                BoundType::Exact
            };
            let outcome = self
                .tt
                .store(self.pos.hash(), remaining, best_score, bound, best_move);
            if outcome.accepted() {
                self.stats.tt_stores += 1;
            }
        }

        Ok(best_score)
    }

    /// Search one child, reduced first when `reduction` is non-zero.
    ///
    /// A reduced score at or below alpha is kept; the flag in the result
    /// says so. Anything better is verified at full depth.
    fn search_child(
        &mut self,
        remaining: i32,
        reduction: i32,
        alpha: i32,
        beta: i32,
        child: Node,
        line: &mut SearchLine,
    ) -> Result<(i32, bool), PositionError> {
        if reduction > 0 {
            let score = -self.negamax(remaining - 1 - reduction, -beta, -alpha, child, line)?;
            if score <= alpha || self.cancelled {
                return Ok((score, true));
            }
            *line = SearchLine::new();
        }
        let score = -self.negamax(remaining - 1, -beta, -alpha, child, line)?;
        Ok((score, false))
    }
}
