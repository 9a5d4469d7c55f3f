//! Chess position representation and game logic.
//!
//! Uses bitboards with magic-number slider lookups for legal move
//! generation, exchange evaluation and search. Standard chess without en
//! passant.
//!
//! # Example
//! ```
//! use magic_negamax::board::Position;
//!
//! let pos = Position::new();
//! let moves = pos.legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

pub mod attack_tables;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod perft;
mod san;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{FenError, MagicError, MoveParseError, PositionError, SanError, SquareError};
pub use fen::START_FEN;
pub use movegen::GenMode;
pub use state::{NullUndo, Position, Undo};
pub use types::{
    Bitboard, BitboardIter, CastleSide, CastlingRights, Color, Move, MoveKind, MoveList,
    MoveListIntoIter, Piece, ScoredMove, ScoredMoveList, Square,
};

pub(crate) use types::{MAX_PLY, PROMOTION_PIECES};
