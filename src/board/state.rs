//! Bitboard position state and read-only queries.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use super::attack_tables::tables;
use super::{Bitboard, CastleSide, CastlingRights, Color, Move, Piece, Square};
use crate::zobrist::ZobristKeys;

/// Everything `undo` needs to restore the position before a move.
///
/// The record is self-contained: undoing does not consult any state that
/// other apply/undo calls may have changed in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    pub(crate) mv: Move,
    pub(crate) mover: Color,
    pub(crate) unmoved: Bitboard,
    pub(crate) hash: u64,
}

impl Undo {
    /// The move this record reverses
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// Record for reversing a null move (side to move passed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullUndo {
    pub(crate) hash: u64,
}

/// A chess position held as bitboards.
///
/// One bitboard per piece type and one per color. A square is set in at most
/// one of each and both unions are equal. `unmoved` marks squares whose
/// occupant has never moved; castling availability is derived from it.
#[derive(Clone)]
pub struct Position {
    pub(crate) pieces: [Bitboard; 6],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) unmoved: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) hash: u64,
    pub(crate) keys: Arc<ZobristKeys>,
    attacked: [Cell<Option<Bitboard>>; 2],
}

impl Position {
    /// Empty board, White to move, default hash keys.
    #[must_use]
    pub fn empty() -> Self {
        Self::empty_with_keys(Arc::new(ZobristKeys::default()))
    }

    #[must_use]
    pub fn empty_with_keys(keys: Arc<ZobristKeys>) -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            unmoved: Bitboard::EMPTY,
            side_to_move: Color::White,
            hash: 0,
            keys,
            attacked: [Cell::new(None), Cell::new(None)],
        }
    }

    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::start_with_keys(Arc::new(ZobristKeys::default()))
    }

    #[must_use]
    pub fn start_with_keys(keys: Arc<ZobristKeys>) -> Self {
        let mut pos = Position::empty_with_keys(keys);
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in (0u8..).zip(back_rank) {
            for color in Color::BOTH {
                let rank = color.back_rank();
                let pawn_rank = color.pawn_start_rank();
                pos.toggle(piece, color, Square(rank * 8 + file));
                pos.toggle(Piece::Pawn, color, Square(pawn_rank * 8 + file));
            }
        }
        pos.unmoved = pos.occupied();
        pos.hash = pos.compute_hash();
        pos
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Incrementally maintained Zobrist hash
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    /// Swap in a different key set and rehash from scratch.
    pub fn rekey(&mut self, keys: Arc<ZobristKeys>) {
        self.keys = keys;
        self.hash = self.compute_hash();
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    #[must_use]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn piece_bb(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let color = if self.colors[0].contains(sq) {
            Color::White
        } else if self.colors[1].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[p.index()].contains(sq))
            .map(|p| (color, p))
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    /// True if the piece on `sq` has not moved since setup
    #[inline]
    #[must_use]
    pub fn is_unmoved(&self, sq: Square) -> bool {
        self.unmoved.contains(sq)
    }

    /// Number of knights, bishops, rooks and queens of `color`
    #[must_use]
    pub fn non_pawn_count(&self, color: Color) -> u32 {
        Piece::OFFICERS
            .iter()
            .map(|&p| self.pieces_of(p, color).popcount())
            .sum()
    }

    /// Sum of piece values of `color`, kings excluded
    #[must_use]
    pub fn material(&self, color: Color) -> i32 {
        [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .iter()
            .map(|&p| p.value() * self.pieces_of(p, color).popcount() as i32)
            .sum()
    }

    /// Castling availability derived from unmoved kings and rooks.
    ///
    /// This only says the pieces are in place; attacked or occupied path
    /// squares are checked by the move generator.
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::none();
        for color in Color::BOTH {
            let king = CastleSide::king_from(color);
            if !(self.unmoved.contains(king) && self.pieces_of(Piece::King, color).contains(king)) {
                continue;
            }
            for side in CastleSide::BOTH {
                let rook = side.rook_from(color);
                if self.unmoved.contains(rook) && self.pieces_of(Piece::Rook, color).contains(rook) {
                    rights.set(color, side);
                }
            }
        }
        rights
    }

    /// Every square attacked by `color` with the current occupancy.
    ///
    /// Cached until the next mutation.
    #[must_use]
    pub fn attacked_by(&self, color: Color) -> Bitboard {
        let slot = &self.attacked[color.index()];
        if let Some(bb) = slot.get() {
            return bb;
        }
        let bb = self.attack_set(color, self.occupied());
        slot.set(Some(bb));
        bb
    }

    /// Union of the attacks of every `color` piece against `occupied`.
    pub(crate) fn attack_set(&self, color: Color, occupied: Bitboard) -> Bitboard {
        let t = tables();
        let mut attacks = Bitboard::EMPTY;
        for piece in Piece::ALL {
            for sq in self.pieces_of(piece, color) {
                attacks |= t.piece_attacks(piece, color, sq, occupied);
            }
        }
        attacks
    }

    /// Zobrist hash computed from scratch.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for piece in Piece::ALL {
            for color in Color::BOTH {
                for sq in self.pieces_of(piece, color) {
                    hash ^= self.keys.piece(piece, color, sq);
                }
            }
        }
        hash ^= self.keys.castling(self.castling_rights());
        if self.side_to_move == Color::Black {
            hash ^= self.keys.black_to_move();
        }
        hash
    }

    /// Flip one piece bit in both vectors and in the hash.
    #[inline]
    pub(crate) fn toggle(&mut self, piece: Piece, color: Color, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.pieces[piece.index()] ^= bb;
        self.colors[color.index()] ^= bb;
        self.hash ^= self.keys.piece(piece, color, sq);
        self.invalidate_attacks();
    }

    #[inline]
    pub(crate) fn invalidate_attacks(&self) {
        self.attacked[0].set(None);
        self.attacked[1].set(None);
    }

    /// Checks the bitboard invariants; used by tests and debug assertions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let union_pieces = self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        let mut overlap = false;
        for i in 0..6 {
            for j in (i + 1)..6 {
                overlap |= (self.pieces[i] & self.pieces[j]).any();
            }
        }
        !overlap && (self.colors[0] & self.colors[1]).is_empty() && union_pieces == self.occupied()
    }

    /// Whether `mv` is a legal move here
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(&mv)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.unmoved == other.unmoved
            && self.side_to_move == other.side_to_move
            && self.hash == other.hash
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.to_fen())
            .field("hash", &format_args!("{:016x}", self.hash))
            .finish()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = match self.piece_at(Square(rank * 8 + file)) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
