//! Castling sides and the rights mask derived from unmoved pieces.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// Short (kingside) or long (queenside) castling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    Short,
    Long,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Short, CastleSide::Long];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Home square of the king for `color`
    #[inline]
    #[must_use]
    pub const fn king_from(color: Color) -> Square {
        match color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }

    #[inline]
    #[must_use]
    pub const fn king_to(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Short, Color::White) => Square::G1,
            (CastleSide::Long, Color::White) => Square::C1,
            (CastleSide::Short, Color::Black) => Square::G8,
            (CastleSide::Long, Color::Black) => Square::C8,
        }
    }

    #[inline]
    #[must_use]
    pub const fn rook_from(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Short, Color::White) => Square::H1,
            (CastleSide::Long, Color::White) => Square::A1,
            (CastleSide::Short, Color::Black) => Square::H8,
            (CastleSide::Long, Color::Black) => Square::A8,
        }
    }

    #[inline]
    #[must_use]
    pub const fn rook_to(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Short, Color::White) => Square::F1,
            (CastleSide::Long, Color::White) => Square::D1,
            (CastleSide::Short, Color::Black) => Square::F8,
            (CastleSide::Long, Color::Black) => Square::D8,
        }
    }
}

/// Castling rights represented as a bitmask.
///
/// Rights are never stored on the position; they are derived from which king
/// and rook home squares still hold unmoved pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit_for(color, side) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit_for(color, side);
    }

    /// Raw bitmask value
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    const fn bit_for(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Short) => CASTLE_WHITE_K,
            (Color::White, CastleSide::Long) => CASTLE_WHITE_Q,
            (Color::Black, CastleSide::Short) => CASTLE_BLACK_K,
            (Color::Black, CastleSide::Long) => CASTLE_BLACK_Q,
        }
    }
}
