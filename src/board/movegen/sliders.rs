use super::super::attack_tables::tables;
use super::super::{Color, MoveList, Piece, Position};
use super::{Constraints, GenMode};

impl Position {
    /// Bishop, rook or queen moves via the magic lookups.
    pub(crate) fn generate_slider_moves(
        &self,
        us: Color,
        slider: Piece,
        c: &Constraints,
        mode: GenMode,
        moves: &mut MoveList,
    ) {
        let t = tables();
        let occupied = self.occupied();
        let mask = self.mode_mask(us, slider, c, mode);
        for from in self.pieces_of(slider, us) {
            let attacks = match slider {
                Piece::Bishop => t.bishop(from, occupied),
                Piece::Rook => t.rook(from, occupied),
                _ => t.queen(from, occupied),
            };
            let targets = attacks & mask & c.allowed(from);
            self.push_targets(slider, from, targets, moves);
        }
    }
}
