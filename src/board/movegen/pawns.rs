use super::super::attack_tables::tables;
use super::super::{Color, Move, MoveList, Piece, Position, Square, PROMOTION_PIECES};
use super::{Constraints, GenMode};

impl Position {
    pub(crate) fn generate_pawn_moves(
        &self,
        us: Color,
        c: &Constraints,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        let t = tables();
        let empty = !self.occupied();
        let enemy = self.color_bb(us.opponent());

        for from in self.pieces_of(Piece::Pawn, us) {
            let allowed = c.allowed(from);

            if let Some(one) = (t.pawn_push(us, from) & empty).lsb() {
                if allowed.contains(one) {
                    self.push_pawn_move(us, from, one, None, c, mode, moves);
                }
                if from.rank() == us.pawn_start_rank() {
                    if let Some(two) = (t.pawn_push(us, one) & empty).lsb() {
                        if allowed.contains(two) {
                            self.push_pawn_move(us, from, two, None, c, mode, moves);
                        }
                    }
                }
            }

            for to in t.pawn_attacks(us, from) & enemy & allowed {
                self.push_pawn_move(us, from, to, self.piece_on(to), c, mode, moves);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_pawn_move(
        &self,
        us: Color,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        c: &Constraints,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        if to.rank() == us.pawn_promotion_rank() {
            for promo in PROMOTION_PIECES {
                let keep = match mode {
                    GenMode::All | GenMode::Captures => true,
                    GenMode::Checks => c.check_masks[promo.index()].contains(to),
                };
                if keep {
                    moves.push(Move::promotion(from, to, captured, promo));
                }
            }
            return;
        }

        let keep = match mode {
            GenMode::All => true,
            GenMode::Captures => captured.is_some(),
            GenMode::Checks => c.check_masks[Piece::Pawn.index()].contains(to),
        };
        if keep {
            moves.push(Move::new(Piece::Pawn, from, to, captured));
        }
    }
}
