use super::super::constants::MATE_THRESHOLD;
use super::super::line::{LineTag, SearchLine};
use super::{Node, Searcher};
use crate::board::error::PositionError;
use crate::board::Move;

impl Searcher<'_> {
    /// Reverse futility: near the horizon, a static eval far enough above
    /// beta is trusted without searching.
    pub(super) fn reverse_futility(
        &self,
        remaining: i32,
        beta: i32,
        in_check: bool,
        node: Node,
        line: &mut SearchLine,
    ) -> Option<i32> {
        if node.ply == 0 || in_check || beta.abs() >= MATE_THRESHOLD {
            return None;
        }
        let margin = self.params.rfp_margin(u32::try_from(remaining).ok()?)?;
        let eval = self.static_eval();
        if eval - margin >= beta {
            line.mark(LineTag::ReverseFutility);
            Some(eval)
        } else {
            None
        }
    }

    /// Try null move pruning.
    ///
    /// Not at the root, not in check, never twice in a row, and only with
    /// enough pieces on the board that zugzwang is unlikely.
    pub(super) fn try_null_move(
        &mut self,
        remaining: i32,
        beta: i32,
        in_check: bool,
        node: Node,
        line: &mut SearchLine,
    ) -> Result<Option<i32>, PositionError> {
        let us = self.pos.side_to_move();
        if !self.params.null_move_enabled()
            || node.ply == 0
            || remaining <= 1
            || in_check
            || node.prev.is_none()
            || self.pos.non_pawn_count(us) <= self.params.null_min_officers
        {
            return Ok(None);
        }

        let r = match remaining {
            ..=3 => 1,
            4..=6 => 3,
            _ => 4,
        };

        let mut child_line = SearchLine::new();
        let undo = self.pos.make_null_move();
        let result = self.negamax(remaining - r, -beta, -beta + 1, node.null_child(), &mut child_line);
        self.pos.unmake_null_move(undo);
        let score = -result?;

        if self.cancelled {
            return Ok(None);
        }
        if score >= beta {
            line.mark(LineTag::NullMove);
            return Ok(Some(beta));
        }
        Ok(None)
    }

    /// Late move reduction for `mv`, or 0 to search it at full depth.
    pub(super) fn late_move_reduction(
        &self,
        mv: Move,
        remaining: i32,
        in_check: bool,
        gives_check: bool,
        moves_searched: u32,
    ) -> i32 {
        if !mv.is_quiet()
            || in_check
            || gives_check
            || remaining < self.params.lmr_min_depth as i32
            || moves_searched < self.params.lmr_min_moves
        {
            return 0;
        }
        if moves_searched <= 6 {
            1
        } else {
            (remaining + 1) / 3
        }
    }
}
