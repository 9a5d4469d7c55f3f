//! Legal move generation.
//!
//! Pseudo-legal destinations come from the attack tables; legality is
//! enforced by masking every destination with the check-resolution target
//! and the mover's pin ray (see [`legality`]). King moves avoid the squares
//! the opponent attacks with our king lifted off the board.

mod kings;
mod knights;
mod legality;
mod pawns;
mod sliders;

pub(crate) use legality::Constraints;

use super::attack_tables::tables;
use super::{Bitboard, Color, Move, MoveKind, MoveList, Piece, Position, Square};

/// Which subset of legal moves to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    All,
    /// Captures and promotions
    Captures,
    /// Moves that give direct check (no king moves, no castles)
    Checks,
}

impl Position {
    /// All legal moves for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.generate(GenMode::All)
    }

    /// Legal captures and promotions.
    #[must_use]
    pub fn captures(&self) -> MoveList {
        self.generate(GenMode::Captures)
    }

    /// Legal moves landing on a square that attacks the enemy king.
    #[must_use]
    pub fn checks(&self) -> MoveList {
        self.generate(GenMode::Checks)
    }

    #[must_use]
    pub fn generate(&self, mode: GenMode) -> MoveList {
        let us = self.side_to_move;
        let constraints = self.constraints(us);
        let mut moves = MoveList::new();

        if !constraints.double_check() {
            self.generate_pawn_moves(us, &constraints, mode, &mut moves);
            self.generate_knight_moves(us, &constraints, mode, &mut moves);
            for slider in [Piece::Bishop, Piece::Rook, Piece::Queen] {
                self.generate_slider_moves(us, slider, &constraints, mode, &mut moves);
            }
        }
        self.generate_king_moves(us, &constraints, mode, &mut moves);
        if mode == GenMode::All {
            self.generate_castles(us, &constraints, &mut moves);
        }
        moves
    }

    /// Piece type standing on `sq`, ignoring color
    #[inline]
    pub(crate) fn piece_on(&self, sq: Square) -> Option<Piece> {
        if !self.occupied().contains(sq) {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[p.index()].contains(sq))
    }

    /// Push moves for `piece` from `from` to every square of `targets`.
    pub(crate) fn push_targets(
        &self,
        piece: Piece,
        from: Square,
        targets: Bitboard,
        moves: &mut MoveList,
    ) {
        for to in targets {
            moves.push(Move::new(piece, from, to, self.piece_on(to)));
        }
    }

    /// Destination filter for a non-pawn, non-king piece.
    pub(crate) fn mode_mask(&self, us: Color, piece: Piece, c: &Constraints, mode: GenMode) -> Bitboard {
        match mode {
            GenMode::All => !self.color_bb(us),
            GenMode::Captures => self.color_bb(us.opponent()),
            GenMode::Checks => c.check_masks[piece.index()] & !self.color_bb(us),
        }
    }

    /// Whether `mv` (legal for the side to move) attacks the enemy king
    /// afterwards, directly or by discovery.
    #[must_use]
    pub fn gives_check(&self, mv: Move) -> bool {
        let t = tables();
        let us = self.side_to_move;
        let Some(enemy_king) = self.king_square(us.opponent()) else {
            return false;
        };

        let mut occupied = self.occupied().without(mv.from()).with(mv.to());
        let mut direct = t
            .piece_attacks(mv.landing_piece(), us, mv.to(), occupied)
            .contains(enemy_king);
        let mut vacated = Bitboard::EMPTY.with(mv.from());
        if let MoveKind::Castle(side) = mv.kind() {
            let (rook_from, rook_to) = (side.rook_from(us), side.rook_to(us));
            occupied = occupied.without(rook_from).with(rook_to);
            vacated = vacated.with(rook_from);
            direct |= t.rook(rook_to, occupied).contains(enemy_king);
        }
        if direct {
            return true;
        }

        let diagonal = (self.pieces_of(Piece::Bishop, us) | self.pieces_of(Piece::Queen, us)) & !vacated;
        let straight = (self.pieces_of(Piece::Rook, us) | self.pieces_of(Piece::Queen, us)) & !vacated;
        (t.bishop(enemy_king, occupied) & diagonal).any()
            || (t.rook(enemy_king, occupied) & straight).any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_position(fen: &str) -> Position {
        fen.parse().expect("valid fen")
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let pos = Position::new();
        assert_eq!(pos.legal_moves().len(), 20);
        assert!(pos.captures().is_empty());
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        // rook e8 and bishop b4 both check the king on e1
        let pos = make_position("4r1k1/8/8/8/1b6/8/8/R3K3 w - - 0 1");
        assert_eq!(pos.checkers().popcount(), 2);
        assert!(pos.legal_moves().iter().all(|m| m.piece() == Piece::King));
    }

    #[test]
    fn pinned_piece_stays_on_ray() {
        // bishop d2 pinned by queen a5 against king e1
        let pos = make_position("4k3/8/8/q7/8/8/3B4/4K3 w - - 0 1");
        let bishop_moves: Vec<String> = pos
            .legal_moves()
            .iter()
            .filter(|m| m.piece() == Piece::Bishop)
            .map(ToString::to_string)
            .collect();
        assert_eq!(bishop_moves.len(), 3);
        for mv in ["d2c3", "d2b4", "d2a5"] {
            assert!(bishop_moves.iter().any(|m| m == mv), "missing {mv}");
        }
    }

    #[test]
    fn checks_mode_finds_direct_checks() {
        let pos = make_position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let checks = pos.checks();
        assert!(checks.iter().all(|m| pos.gives_check(*m)));
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].to_string(), "a1a8");
    }

    #[test]
    fn gives_check_sees_discoveries() {
        // knight on e4 blocks the rook on e1 from the king on e8
        let pos = make_position("4k3/8/8/8/4N3/8/8/K3R3 w - - 0 1");
        let knight_move = pos
            .legal_moves()
            .iter()
            .copied()
            .find(|m| m.to_string() == "e4c5")
            .expect("knight move");
        assert!(pos.gives_check(knight_move));
    }
}
