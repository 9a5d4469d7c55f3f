//! Core chess types.
//!
//! - `Piece` and `Color` - closed piece and color enums
//! - `Square` - board square as an index 0-63
//! - `Bitboard` - 64-bit square set
//! - `Move`, `MoveKind` and `MoveList` - move representation
//! - `CastleSide` and `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingRights};
pub use moves::{Move, MoveKind, MoveList, MoveListIntoIter, ScoredMove, ScoredMoveList};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use moves::MAX_PLY;
pub(crate) use piece::PROMOTION_PIECES;
