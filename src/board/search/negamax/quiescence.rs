use super::super::constants::{INFINITY, QUIESCENCE_CHECK_PLIES, QUIESCENCE_CHECK_RAISE_LIMIT};
use super::super::line::SearchLine;
use super::super::move_order::{order_moves, OrderingHints};
use super::{Node, Searcher};
use crate::board::error::PositionError;
use crate::board::{Move, MAX_PLY};

/// How a quiescence move turned out relative to the window.
enum Step {
    Cutoff(i32),
    Raised,
    Kept,
}

impl Searcher<'_> {
    /// Quiescence search for tactical stability with delta and SEE pruning.
    ///
    /// `qdepth` counts plies below the horizon; killer slots for these
    /// plies are indexed by `-qdepth`.
    pub(super) fn quiesce(
        &mut self,
        mut alpha: i32,
        beta: i32,
        qdepth: u32,
        node: Node,
        line: &mut SearchLine,
    ) -> Result<i32, PositionError> {
        self.stats.q_nodes += 1;
        if self.should_stop() {
            return Ok(0);
        }
        if node.ply >= MAX_PLY {
            return Ok(self.static_eval());
        }

        let in_check = self.pos.is_in_check();
        let endgame = self.evaluator.is_endgame(self.pos);
        let slot = -(qdepth as i32);

        let mut best_score = -INFINITY;
        let mut stand_pat = 0;
        let moves = if in_check {
            let moves = self.pos.legal_moves();
            if moves.is_empty() {
                return Ok(node.mated_score());
            }
            moves
        } else {
            stand_pat = self.static_eval();
            if stand_pat >= beta {
                return Ok(stand_pat);
            }
            if !endgame && stand_pat + self.params.big_delta < alpha {
                return Ok(stand_pat);
            }
            best_score = stand_pat;
            alpha = alpha.max(stand_pat);
            self.pos.captures()
        };

        let hints = OrderingHints {
            killers: self.tables.killers.get(slot),
            counter: node.prev.and_then(|prev| self.tables.counters.get(prev)),
            endgame,
            ..OrderingHints::default()
        };
        let ordered = order_moves(self.pos, moves.iter(), &hints);

        let mut raised = 0u32;
        for scored in ordered.iter() {
            let mv = scored.mv;
            if !in_check {
                let see = self.pos.see(mv);
                if see < 0 || stand_pat + see + self.params.move_delta < alpha {
                    continue;
                }
            }
            match self.q_step(mv, &mut alpha, beta, &mut best_score, qdepth, node, line)? {
                Step::Cutoff(score) => return Ok(score),
                Step::Raised => raised += 1,
                Step::Kept => {}
            }
            if self.cancelled {
                return Ok(0);
            }
        }

        if self.params.quiescence_checks
            && !in_check
            && raised < QUIESCENCE_CHECK_RAISE_LIMIT
            && qdepth <= QUIESCENCE_CHECK_PLIES
        {
            let checks = self.pos.checks();
            for &mv in checks.iter().filter(|m| m.is_quiet()) {
                if let Step::Cutoff(score) =
                    self.q_step(mv, &mut alpha, beta, &mut best_score, qdepth, node, line)?
                {
                    return Ok(score);
                }
                if self.cancelled {
                    return Ok(0);
                }
            }
        }

        Ok(best_score)
    }

    #[allow(clippy::too_many_arguments)]
    fn q_step(
        &mut self,
        mv: Move,
        alpha: &mut i32,
        beta: i32,
        best_score: &mut i32,
        qdepth: u32,
        node: Node,
        line: &mut SearchLine,
    ) -> Result<Step, PositionError> {
        let mut child_line = SearchLine::new();
        let undo = self.pos.apply(mv)?;
        let result = self.quiesce(-beta, -*alpha, qdepth + 1, node.child(mv), &mut child_line);
        self.pos.undo(undo);
        let score = -result?;

        if self.cancelled {
            return Ok(Step::Kept);
        }
        if score > *best_score {
            *best_score = score;
            line.set(mv, child_line);
        }
        if score >= beta {
            let gives_check = self.pos.gives_check(mv);
            self.tables
                .record_cutoff(-(qdepth as i32), mv, gives_check, node.prev);
            return Ok(Step::Cutoff(score));
        }
        if score > *alpha {
            *alpha = score;
            return Ok(Step::Raised);
        }
        Ok(Step::Kept)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::super::super::params::{NullMove, SearchParams};
    use super::*;
    use crate::board::Position;
    use crate::eval::MaterialEvaluator;
    use crate::tt::TranspositionTable;

    fn quiesce_fen(fen: &str, params: &SearchParams) -> i32 {
        let mut pos: Position = fen.parse().expect("valid fen");
        let mut tt = TranspositionTable::new(1024, 2);
        let stop = AtomicBool::new(false);
        let mut searcher = Searcher::new(&mut pos, &mut tt, &MaterialEvaluator, params, &stop);
        let mut line = SearchLine::new();
        searcher
            .quiesce(-INFINITY, INFINITY, 0, Node::root(), &mut line)
            .expect("no contract errors")
    }

    #[test]
    fn stand_pat_without_captures() {
        let params = SearchParams::fixed_depth(1, NullMove::Disabled).quiescence_checks(false);
        assert_eq!(quiesce_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &params), 500);
    }

    #[test]
    fn wins_a_hanging_piece() {
        let params = SearchParams::fixed_depth(1, NullMove::Disabled).quiescence_checks(false);
        // Qxd7 wins the undefended rook
        assert_eq!(quiesce_fen("7k/3r4/8/8/8/8/8/3QK3 w - - 0 1", &params), 900);
    }

    #[test]
    fn skips_losing_captures() {
        let params = SearchParams::fixed_depth(1, NullMove::Disabled).quiescence_checks(false);
        // Qxd5 loses the queen to cxd5; standing pat keeps the queen
        assert_eq!(quiesce_fen("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1", &params), 700);
    }

    #[test]
    fn mated_in_check_without_moves() {
        let params = SearchParams::fixed_depth(1, NullMove::Disabled);
        let score = quiesce_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", &params);
        assert_eq!(score, -super::super::super::constants::MATE_SCORE);
    }
}
