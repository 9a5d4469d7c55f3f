//! Move ordering utilities for search.

use super::super::{Move, Piece, Position, ScoredMoveList};
use super::constants::{
    BAD_CAPTURE_SCORE, COUNTER_SCORE, ENDGAME_KING_QUIET_SCORE, GOOD_CAPTURE_SCORE, KILLER1_SCORE,
    KILLER2_SCORE, MINOR_QUIET_SCORE, PAWN_QUIET_SCORE, QUEEN_QUIET_SCORE, TT_MOVE_SCORE,
};
use crate::tt::PackedMove;

/// Everything the ordering needs to know about the node.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct OrderingHints {
    pub tt_move: Option<PackedMove>,
    pub killers: [Option<Move>; 2],
    pub counter: Option<Move>,
    pub endgame: bool,
}

/// Ordering class of a quiet move by the piece that makes it.
///
/// Middlegame: knights, bishops and rooks (most valuable first), then the
/// queen, then pawns, king last. Endgame: king first, then the same order.
#[must_use]
pub(crate) fn quiet_score(piece: Piece, endgame: bool) -> i32 {
    match piece {
        Piece::Knight | Piece::Bishop | Piece::Rook => MINOR_QUIET_SCORE + piece.value() / 10,
        Piece::Queen => QUEEN_QUIET_SCORE,
        Piece::Pawn => PAWN_QUIET_SCORE,
        Piece::King if endgame => ENDGAME_KING_QUIET_SCORE,
        Piece::King => 0,
    }
}

#[must_use]
pub(crate) fn score_move(pos: &Position, mv: Move, hints: &OrderingHints) -> i32 {
    if hints.tt_move.is_some_and(|tt| tt.matches(mv)) {
        return TT_MOVE_SCORE;
    }
    if mv.is_capture() || mv.is_promotion() {
        let see = pos.see(mv);
        return if see >= 0 {
            GOOD_CAPTURE_SCORE + see
        } else {
            BAD_CAPTURE_SCORE + see
        };
    }
    if hints.killers[0] == Some(mv) {
        KILLER1_SCORE
    } else if hints.killers[1] == Some(mv) {
        KILLER2_SCORE
    } else if hints.counter == Some(mv) {
        COUNTER_SCORE
    } else {
        quiet_score(mv.piece(), hints.endgame)
    }
}

/// Score and sort `moves`, best first; ties keep generation order.
pub(crate) fn order_moves<'a>(
    pos: &Position,
    moves: impl IntoIterator<Item = &'a Move>,
    hints: &OrderingHints,
) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for mv in moves {
        scored.push(*mv, score_move(pos, *mv, hints));
    }
    scored.sort_by_score_desc();
    scored
}
