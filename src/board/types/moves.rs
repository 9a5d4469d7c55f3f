//! Move types and move lists.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::castling::CastleSide;
use super::piece::{Color, Piece};
use super::square::Square;

/// What kind of move this is beyond "piece goes from A to B".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    Normal,
    /// King move of a castle; the rook squares follow from side and color
    Castle(CastleSide),
    Promotion(Piece),
}

/// An immutable move value.
///
/// Carries the moving piece, both squares, the captured piece (if any) and
/// the move variant. Live board state such as "has this piece moved" lives in
/// the [`Undo`](crate::board::Undo) record returned by apply, not here.
///
/// Two moves are equal when piece kind, source, destination, captured kind and
/// promotion piece agree.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    piece: Piece,
    from: Square,
    to: Square,
    captured: Option<Piece>,
    kind: MoveKind,
}

impl Move {
    /// Placeholder used to fill fixed-size move arrays
    pub(crate) const EMPTY: Move = Move {
        piece: Piece::King,
        from: Square::A1,
        to: Square::A1,
        captured: None,
        kind: MoveKind::Normal,
    };

    /// Create a normal move (quiet or capture)
    #[inline]
    #[must_use]
    pub const fn new(piece: Piece, from: Square, to: Square, captured: Option<Piece>) -> Self {
        Move {
            piece,
            from,
            to,
            captured,
            kind: MoveKind::Normal,
        }
    }

    /// Create a pawn promotion, optionally capturing
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, captured: Option<Piece>, promo: Piece) -> Self {
        Move {
            piece: Piece::Pawn,
            from,
            to,
            captured,
            kind: MoveKind::Promotion(promo),
        }
    }

    /// Create the king half of a castle for `color`
    #[inline]
    #[must_use]
    pub const fn castle(color: Color, side: CastleSide) -> Self {
        Move {
            piece: Piece::King,
            from: CastleSide::king_from(color),
            to: side.king_to(color),
            captured: None,
            kind: MoveKind::Castle(side),
        }
    }

    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    #[inline]
    #[must_use]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    /// Neither a capture nor a promotion
    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Piece standing on the destination after the move
    #[inline]
    #[must_use]
    pub const fn landing_piece(self) -> Piece {
        match self.kind {
            MoveKind::Promotion(p) => p,
            _ => self.piece,
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.piece == other.piece
            && self.from == other.from
            && self.to == other.to
            && self.captured == other.captured
            && self.promotion_piece() == other.promotion_piece()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.piece.hash(state);
        self.from.hash(state);
        self.to.hash(state);
        self.captured.hash(state);
        self.promotion_piece().hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({} {}{}",
            self.piece.to_char().to_ascii_uppercase(),
            self.from,
            self.to
        )?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if let Some(cap) = self.captured {
            write!(f, " x{}", cap.to_char())?;
        }
        if let Some(side) = self.castle_side() {
            write!(f, " castle {side:?}")?;
        }
        write!(f, ")")
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`, castles as the king move `e1g1`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub(crate) const MAX_PLY: usize = 128;

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::EMPTY; MAX_MOVES],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        if idx < self.len {
            Some(self.moves[idx])
        } else {
            None
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.get(0)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

/// A move paired with its ordering score.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves.
#[derive(Clone, Debug)]
pub struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::EMPTY,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves[..self.len]
    }

    /// Stable sort by score, highest first; ties keep generation order.
    pub fn sort_by_score_desc(&mut self) {
        self.moves[..self.len].sort_by(|a, b| b.score.cmp(&a.score));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMove> {
        self.as_slice().iter()
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = Move::new(Piece::Knight, Square(6), Square(21), None);
        let b = Move::new(Piece::Knight, Square(6), Square(21), None);
        let c = Move::new(Piece::Knight, Square(6), Square(21), Some(Piece::Pawn));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn promotions_differ_by_piece() {
        let q = Move::promotion(Square(52), Square(60), None, Piece::Queen);
        let n = Move::promotion(Square(52), Square(60), None, Piece::Knight);
        assert_ne!(q, n);
        assert_eq!(q.to_string(), "e7e8q");
        assert_eq!(q.landing_piece(), Piece::Queen);
    }

    #[test]
    fn castle_uses_king_squares() {
        let mv = Move::castle(Color::Black, CastleSide::Long);
        assert_eq!(mv.from(), Square::E8);
        assert_eq!(mv.to(), Square::C8);
        assert_eq!(mv.to_string(), "e8c8");
        assert!(mv.is_quiet());
    }
}
