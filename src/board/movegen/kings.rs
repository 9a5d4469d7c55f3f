use super::super::attack_tables::tables;
use super::super::make_unmake::{castle_king_walk, castle_path};
use super::super::{CastleSide, Color, Move, MoveList, Piece, Position};
use super::{Constraints, GenMode};

impl Position {
    pub(crate) fn generate_king_moves(
        &self,
        us: Color,
        c: &Constraints,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        if mode == GenMode::Checks {
            return;
        }
        let Some(from) = self.king_square(us) else {
            return;
        };
        let mut targets = tables().king(from) & !self.color_bb(us) & !c.king_danger;
        if mode == GenMode::Captures {
            targets &= self.color_bb(us.opponent());
        }
        self.push_targets(Piece::King, from, targets, moves);
    }

    /// Castles need both pieces unmoved, an empty path, no check and no
    /// attacked square on the king's walk; the final king square is then
    /// verified against the post-castle occupancy.
    pub(crate) fn generate_castles(&self, us: Color, c: &Constraints, moves: &mut MoveList) {
        if c.checkers.any() {
            return;
        }
        let rights = self.castling_rights();
        let them = us.opponent();
        let occupied = self.occupied();

        for side in CastleSide::BOTH {
            if !rights.has(us, side) {
                continue;
            }
            if (castle_path(us, side) & occupied).any() {
                continue;
            }
            if (castle_king_walk(us, side) & self.attacked_by(them)).any() {
                continue;
            }
            let king_to = side.king_to(us);
            let after = occupied
                .without(CastleSide::king_from(us))
                .without(side.rook_from(us))
                .with(king_to)
                .with(side.rook_to(us));
            if self.attackers_to(king_to, them, after).any() {
                continue;
            }
            moves.push(Move::castle(us, side));
        }
    }
}
