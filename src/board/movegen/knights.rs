use super::super::attack_tables::tables;
use super::super::{Color, MoveList, Piece, Position};
use super::{Constraints, GenMode};

impl Position {
    pub(crate) fn generate_knight_moves(
        &self,
        us: Color,
        c: &Constraints,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        let t = tables();
        let mask = self.mode_mask(us, Piece::Knight, c, mode);
        for from in self.pieces_of(Piece::Knight, us) {
            let targets = t.knight(from) & mask & c.allowed(from);
            self.push_targets(Piece::Knight, from, targets, moves);
        }
    }
}
