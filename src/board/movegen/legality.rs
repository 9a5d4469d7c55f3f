//! King danger, check resolution and pin rays, computed once per generation
//! call, plus the attack queries the search and SEE rely on.

use super::super::attack_tables::{tables, KING_DELTAS};
use super::super::{Bitboard, Color, Piece, Position, Square};

/// Legality restrictions for the side to move.
pub(crate) struct Constraints {
    /// Squares the opponent attacks once our king is lifted off the board
    pub king_danger: Bitboard,
    pub checkers: Bitboard,
    /// Allowed destinations for non-king moves
    pub target: Bitboard,
    pub pinned: Bitboard,
    /// For a pinned square: the king-pinner ray plus the pinner
    pub pin_rays: [Bitboard; 64],
    /// Destinations from which a piece of each type checks the enemy king
    pub check_masks: [Bitboard; 6],
}

impl Constraints {
    /// Destinations a piece on `from` may use after check and pin filtering
    #[inline]
    pub fn allowed(&self, from: Square) -> Bitboard {
        if self.pinned.contains(from) {
            self.target & self.pin_rays[from.index()]
        } else {
            self.target
        }
    }

    #[inline]
    pub fn double_check(&self) -> bool {
        self.checkers.popcount() >= 2
    }
}

impl Position {
    pub(crate) fn constraints(&self, us: Color) -> Constraints {
        let t = tables();
        let them = us.opponent();
        let occupied = self.occupied();

        let mut c = Constraints {
            king_danger: Bitboard::EMPTY,
            checkers: Bitboard::EMPTY,
            target: Bitboard::ALL,
            pinned: Bitboard::EMPTY,
            pin_rays: [Bitboard::EMPTY; 64],
            check_masks: [Bitboard::EMPTY; 6],
        };

        if let Some(enemy_king) = self.king_square(them) {
            c.check_masks = [
                t.pawn_attacks(them, enemy_king),
                t.knight(enemy_king),
                t.bishop(enemy_king, occupied),
                t.rook(enemy_king, occupied),
                t.queen(enemy_king, occupied),
                Bitboard::EMPTY,
            ];
        }

        let Some(king) = self.king_square(us) else {
            return c;
        };

        c.king_danger = self.attack_set(them, occupied.without(king));
        c.checkers = self.attackers_to(king, them, occupied);

        c.target = match c.checkers.popcount() {
            0 => Bitboard::ALL,
            1 => match c.checkers.lsb() {
                Some(checker)
                    if self
                        .piece_at(checker)
                        .is_some_and(|(_, piece)| piece.is_slider()) =>
                {
                    c.checkers | t.between(king, checker)
                }
                _ => c.checkers,
            },
            _ => Bitboard::EMPTY,
        };

        let own = self.color_bb(us);
        let enemy = self.color_bb(them);
        for &(dr, df) in &KING_DELTAS {
            let diagonal = dr != 0 && df != 0;
            let mut blocker: Option<Square> = None;
            let mut cur = king.offset(dr, df);
            while let Some(sq) = cur {
                if own.contains(sq) {
                    if blocker.is_some() {
                        break;
                    }
                    blocker = Some(sq);
                } else if enemy.contains(sq) {
                    if let Some(pinned) = blocker {
                        let pinner_matches = self.piece_at(sq).is_some_and(|(_, piece)| {
                            if diagonal {
                                piece.attacks_diagonally()
                            } else {
                                piece.attacks_straight()
                            }
                        });
                        if pinner_matches {
                            c.pinned = c.pinned.with(pinned);
                            c.pin_rays[pinned.index()] = t.between(king, sq).with(sq);
                        }
                    }
                    break;
                }
                cur = sq.offset(dr, df);
            }
        }

        c
    }

    /// Pieces of color `by` that attack `sq` given `occupied`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, by: Color, occupied: Bitboard) -> Bitboard {
        let t = tables();
        let diagonal = self.pieces_of(Piece::Bishop, by) | self.pieces_of(Piece::Queen, by);
        let straight = self.pieces_of(Piece::Rook, by) | self.pieces_of(Piece::Queen, by);
        (t.pawn_attacks(by.opponent(), sq) & self.pieces_of(Piece::Pawn, by))
            | (t.knight(sq) & self.pieces_of(Piece::Knight, by))
            | (t.king(sq) & self.pieces_of(Piece::King, by))
            | (t.bishop(sq, occupied) & diagonal)
            | (t.rook(sq, occupied) & straight)
    }

    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_to(sq, by, self.occupied()).any()
    }

    /// True if `color`'s king is attacked. A missing king is never in check.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opponent()))
    }

    /// True if the side to move is in check
    #[must_use]
    pub fn is_in_check(&self) -> bool {
        self.in_check(self.side_to_move)
    }

    /// Enemy pieces giving check to the side to move
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.king_square(us).map_or(Bitboard::EMPTY, |king| {
            self.attackers_to(king, us.opponent(), self.occupied())
        })
    }
}
