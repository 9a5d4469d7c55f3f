//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on one square, least valuable attacker
//! first, and minimaxes the material balance. Works on an occupancy copy;
//! the position itself is never touched.

use super::{Bitboard, Color, Move, Piece, Position, Square};

/// Maximum exchange length (32 pieces on the board)
const MAX_EXCHANGE: usize = 32;

fn promotion_delta(promo: Piece) -> i32 {
    promo.value() - Piece::Pawn.value()
}

impl Position {
    /// Material outcome of `mv` followed by the best recapture sequence on
    /// its destination, from the mover's point of view.
    ///
    /// Non-captures that are not promotions score 0. A promotion adds the
    /// promotion delta to the first gain.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        let target = mv.to();
        let mut gain = [0i32; MAX_EXCHANGE];
        gain[0] = mv.captured().map_or(0, Piece::value)
            + mv.promotion_piece().map_or(0, promotion_delta);
        if mv.castle_side().is_some() || !(mv.is_capture() || mv.is_promotion()) {
            return gain[0];
        }

        let mut occupied = self.occupied();
        let mut attackers = self.attackers_to(target, Color::White, occupied)
            | self.attackers_to(target, Color::Black, occupied);

        let mut on_target = mv.landing_piece();
        let mut side = self.side_to_move;
        let mut from = mv.from();
        let mut capturer = mv.piece();
        let mut depth = 0;

        loop {
            occupied = occupied.without(from);
            attackers = attackers.without(from);
            if capturer != Piece::Knight {
                if let Some(revealed) = self.revealed_slider(target, from, occupied) {
                    attackers = attackers.with(revealed);
                }
            }

            side = side.opponent();
            let ours = attackers & self.color_bb(side) & occupied;
            let Some((piece, sq)) = self.least_valuable(ours) else {
                break;
            };
            if piece == Piece::King && (attackers & self.color_bb(side.opponent()) & occupied).any() {
                break;
            }

            depth += 1;
            if depth >= MAX_EXCHANGE {
                break;
            }
            gain[depth] = on_target.value() - gain[depth - 1];
            on_target = piece;
            if piece == Piece::Pawn && target.rank() == side.pawn_promotion_rank() {
                gain[depth] += promotion_delta(Piece::Queen);
                on_target = Piece::Queen;
            }
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            from = sq;
            capturer = piece;
        }

        while depth > 0 {
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
            depth -= 1;
        }
        gain[0]
    }

    /// First piece behind `vacated` on the ray leading away from `target`,
    /// if it is a slider that moves along that ray.
    fn revealed_slider(&self, target: Square, vacated: Square, occupied: Bitboard) -> Option<Square> {
        let dr = (vacated.rank() as i8 - target.rank() as i8).signum();
        let df = (vacated.file() as i8 - target.file() as i8).signum();
        let dist_r = (vacated.rank() as i8 - target.rank() as i8).abs();
        let dist_f = (vacated.file() as i8 - target.file() as i8).abs();
        if dist_r != 0 && dist_f != 0 && dist_r != dist_f {
            return None;
        }
        let diagonal = dr != 0 && df != 0;

        let mut sq = vacated;
        while let Some(next) = sq.offset(dr, df) {
            sq = next;
            if !occupied.contains(sq) {
                continue;
            }
            let piece = self.piece_on(sq)?;
            let matches = if diagonal {
                piece.attacks_diagonally()
            } else {
                piece.attacks_straight()
            };
            return matches.then_some(sq);
        }
        None
    }

    fn least_valuable(&self, candidates: Bitboard) -> Option<(Piece, Square)> {
        Piece::ALL.into_iter().find_map(|piece| {
            (candidates & self.piece_bb(piece)).lsb().map(|sq| (piece, sq))
        })
    }

    /// True if `mv` does not lose material by exchange.
    #[inline]
    #[must_use]
    pub fn see_ge_zero(&self, mv: Move) -> bool {
        self.see(mv) >= 0
    }
}
