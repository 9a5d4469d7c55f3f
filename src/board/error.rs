//! Error types for board construction, mutation and notation.

use thiserror::Error;

use super::types::{Color, Piece, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN must have at least 2 fields, found {found}")]
    TooFewParts { found: usize },
    #[error("Invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    #[error("Invalid castling character '{char}' in FEN")]
    InvalidCastling { char: char },
    #[error("Invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    #[error("FEN placement must have 8 ranks, found {found}")]
    WrongRankCount { found: usize },
    #[error("Rank {rank} in FEN does not describe exactly 8 files")]
    BadRankWidth { rank: usize },
    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: Color, found: u32 },
    #[error("{color} has {found} pieces, at most 16 are possible")]
    TooManyPieces { color: Color, found: u32 },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("Rank {rank} out of bounds (must be 0-7)")]
    RankOutOfBounds { rank: u8 },
    #[error("File {file} out of bounds (must be 0-7)")]
    FileOutOfBounds { file: u8 },
    #[error("Invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}

/// Broken precondition on a position mutation.
///
/// These indicate a bug in the caller (usually the move generator), never a
/// game situation. Checkmate and stalemate are reported as values elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("cannot place {color} {piece} on {square}: square is occupied")]
    SquareOccupied {
        piece: Piece,
        color: Color,
        square: Square,
    },
    #[error("no {color} {piece} on {square} to remove")]
    PieceMissing {
        piece: Piece,
        color: Color,
        square: Square,
    },
    #[error("cannot relocate from {square}: square is empty")]
    EmptySource { square: Square },
    #[error("cannot relocate onto {square}: occupied by the mover's own piece")]
    SelfCapture { square: Square },
    #[error("move {mv} does not match the position")]
    MoveMismatch { mv: String },
}

/// Magic multiplier search failure for one slider square.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagicError {
    #[error("no {slider} magic found for {square} after {attempts} attempts")]
    Exhausted {
        slider: Piece,
        square: Square,
        attempts: u64,
    },
}

/// Error type for coordinate move parsing (`e2e4`, `e7e8q`)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("Move must be 4-5 characters, found {len}")]
    InvalidLength { len: usize },
    #[error("Invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    #[error("Invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
    #[error("Illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Error type for algebraic notation parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("Empty move string")]
    Empty,
    #[error("Invalid piece character '{char}' in '{san}'")]
    InvalidPiece { char: char, san: String },
    #[error("Invalid square in '{notation}'")]
    InvalidSquare { notation: String },
    #[error("Ambiguous move '{san}'")]
    AmbiguousMove { san: String },
    #[error("No legal move matches '{san}'")]
    NoMatchingMove { san: String },
    #[error("Invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
}
