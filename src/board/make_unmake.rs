//! Position mutation: checked primitives, move application and undo.

use super::error::PositionError;
use super::state::{NullUndo, Undo};
use super::{Bitboard, CastleSide, Color, Move, MoveKind, Piece, Position, Square};

impl Position {
    /// Put `piece` of `color` on an empty square.
    ///
    /// # Errors
    /// [`PositionError::SquareOccupied`] if anything stands on `sq`.
    pub fn place(&mut self, piece: Piece, color: Color, sq: Square) -> Result<(), PositionError> {
        if self.occupied().contains(sq) {
            return Err(PositionError::SquareOccupied {
                piece,
                color,
                square: sq,
            });
        }
        let before = self.castling_rights();
        self.toggle(piece, color, sq);
        self.rehash_castling(before);
        Ok(())
    }

    /// Take `piece` of `color` off `sq`.
    ///
    /// # Errors
    /// [`PositionError::PieceMissing`] if that exact piece is not on `sq`.
    pub fn remove(&mut self, piece: Piece, color: Color, sq: Square) -> Result<(), PositionError> {
        if !self.pieces_of(piece, color).contains(sq) {
            return Err(PositionError::PieceMissing {
                piece,
                color,
                square: sq,
            });
        }
        let before = self.castling_rights();
        self.toggle(piece, color, sq);
        self.unmoved = self.unmoved.without(sq);
        self.rehash_castling(before);
        Ok(())
    }

    /// Move whatever stands on `from` to `to`, capturing an opposing piece
    /// there. Returns the captured piece.
    ///
    /// # Errors
    /// [`PositionError::EmptySource`] when `from` is empty and
    /// [`PositionError::SelfCapture`] when `to` holds a piece of the mover.
    pub fn relocate(&mut self, from: Square, to: Square) -> Result<Option<Piece>, PositionError> {
        let (color, piece) = self
            .piece_at(from)
            .ok_or(PositionError::EmptySource { square: from })?;
        let captured = match self.piece_at(to) {
            Some((c, _)) if c == color => return Err(PositionError::SelfCapture { square: to }),
            Some((_, p)) => Some(p),
            None => None,
        };
        let before = self.castling_rights();
        if let Some(victim) = captured {
            self.toggle(victim, color.opponent(), to);
        }
        self.toggle(piece, color, from);
        self.toggle(piece, color, to);
        self.unmoved = self.unmoved.without(from).without(to);
        self.rehash_castling(before);
        Ok(captured)
    }

    /// Mark or clear the "never moved" flag of the piece on `sq`.
    pub fn set_unmoved(&mut self, sq: Square, unmoved: bool) {
        let before = self.castling_rights();
        self.unmoved = if unmoved {
            self.unmoved.with(sq)
        } else {
            self.unmoved.without(sq)
        };
        self.rehash_castling(before);
    }

    /// Pass the turn to the other side.
    pub fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.side_to_move = color;
            self.hash ^= self.keys.black_to_move();
        }
    }

    fn rehash_castling(&mut self, before: super::CastlingRights) {
        let after = self.castling_rights();
        if after != before {
            self.hash ^= self.keys.castling(before) ^ self.keys.castling(after);
        }
    }

    /// Play `mv` for the side to move and return the record that reverses it.
    ///
    /// The move must come from this position's move generator or notation
    /// parser; legality is not re-checked, only consistency with the board.
    ///
    /// # Errors
    /// [`PositionError::MoveMismatch`] when the mover or captured piece does
    /// not match the board, plus any primitive failure.
    pub fn apply(&mut self, mv: Move) -> Result<Undo, PositionError> {
        let mover = self.side_to_move;
        if self.piece_at(mv.from()) != Some((mover, mv.piece()))
            || self.piece_at(mv.to()).map(|(_, p)| p) != mv.captured()
        {
            return Err(PositionError::MoveMismatch { mv: mv.to_string() });
        }

        let undo = Undo {
            mv,
            mover,
            unmoved: self.unmoved,
            hash: self.hash,
        };

        match mv.kind() {
            MoveKind::Normal => {
                self.relocate(mv.from(), mv.to())?;
            }
            MoveKind::Promotion(promo) => {
                self.relocate(mv.from(), mv.to())?;
                self.remove(Piece::Pawn, mover, mv.to())?;
                self.place(promo, mover, mv.to())?;
            }
            MoveKind::Castle(side) => {
                self.relocate(mv.from(), mv.to())?;
                self.relocate(side.rook_from(mover), side.rook_to(mover))?;
            }
        }

        self.side_to_move = mover.opponent();
        self.hash ^= self.keys.black_to_move();
        debug_assert_eq!(self.hash, self.compute_hash());
        Ok(undo)
    }

    /// Restore the position exactly as it was before the recorded move.
    pub fn undo(&mut self, undo: Undo) {
        let mv = undo.mv;
        let mover = undo.mover;
        match mv.kind() {
            MoveKind::Normal => {
                self.toggle(mv.piece(), mover, mv.to());
                self.toggle(mv.piece(), mover, mv.from());
            }
            MoveKind::Promotion(promo) => {
                self.toggle(promo, mover, mv.to());
                self.toggle(Piece::Pawn, mover, mv.from());
            }
            MoveKind::Castle(side) => {
                self.toggle(Piece::King, mover, mv.to());
                self.toggle(Piece::King, mover, mv.from());
                self.toggle(Piece::Rook, mover, side.rook_to(mover));
                self.toggle(Piece::Rook, mover, side.rook_from(mover));
            }
        }
        if let Some(victim) = mv.captured() {
            self.toggle(victim, mover.opponent(), mv.to());
        }
        self.side_to_move = mover;
        self.unmoved = undo.unmoved;
        self.hash = undo.hash;
    }

    /// Hand the move to the opponent without moving a piece.
    pub fn make_null_move(&mut self) -> NullUndo {
        let undo = NullUndo { hash: self.hash };
        self.side_to_move = self.side_to_move.opponent();
        self.hash ^= self.keys.black_to_move();
        self.invalidate_attacks();
        undo
    }

    pub fn unmake_null_move(&mut self, undo: NullUndo) {
        self.side_to_move = self.side_to_move.opponent();
        self.hash = undo.hash;
        self.invalidate_attacks();
    }

    /// Apply a sequence of moves, returning their undo records in order.
    ///
    /// # Errors
    /// Stops at the first failing move; moves already applied stay applied.
    pub fn apply_all<I>(&mut self, moves: I) -> Result<Vec<Undo>, PositionError>
    where
        I: IntoIterator<Item = Move>,
    {
        moves.into_iter().map(|mv| self.apply(mv)).collect()
    }
}

/// Squares that must be empty between king and rook for a castle.
#[must_use]
pub(crate) fn castle_path(color: Color, side: CastleSide) -> Bitboard {
    let rank = color.back_rank();
    let files: &[u8] = match side {
        CastleSide::Short => &[5, 6],
        CastleSide::Long => &[1, 2, 3],
    };
    files
        .iter()
        .fold(Bitboard::EMPTY, |bb, &f| bb.with(Square(rank * 8 + f)))
}

/// Squares the king stands on, crosses or lands on while castling.
#[must_use]
pub(crate) fn castle_king_walk(color: Color, side: CastleSide) -> Bitboard {
    let rank = color.back_rank();
    let files: &[u8] = match side {
        CastleSide::Short => &[4, 5, 6],
        CastleSide::Long => &[4, 3, 2],
    };
    files
        .iter()
        .fold(Bitboard::EMPTY, |bb, &f| bb.with(Square(rank * 8 + f)))
}
