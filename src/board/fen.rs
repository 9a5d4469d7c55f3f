use std::str::FromStr;
use std::sync::Arc;

use super::error::{FenError, MoveParseError};
use super::{CastleSide, Color, Move, Piece, Position, Square};
use crate::zobrist::ZobristKeys;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a position from FEN with the default hash keys.
    ///
    /// # Errors
    /// Returns a [`FenError`] describing the first malformed field.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with_keys(fen, Arc::new(ZobristKeys::default()))
    }

    /// Parse a position from FEN, hashing with `keys`.
    ///
    /// Only placement, side to move and castling are read. The en passant
    /// field is accepted and ignored since en passant is not generated;
    /// move counters are ignored.
    ///
    /// # Errors
    /// Returns a [`FenError`] describing the first malformed field.
    pub fn from_fen_with_keys(fen: &str, keys: Arc<ZobristKeys>) -> Result<Self, FenError> {
        let mut pos = Position::empty_with_keys(keys);
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 2 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                    if file > 8 {
                        return Err(FenError::BadRankWidth { rank: rank as usize + 1 });
                    }
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(FenError::BadRankWidth { rank: rank as usize + 1 });
                    }
                    pos.toggle(piece, color, Square(rank * 8 + file));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadRankWidth { rank: rank as usize + 1 });
            }
        }

        for color in Color::BOTH {
            let kings = pos.pieces_of(Piece::King, color).popcount();
            if kings != 1 {
                return Err(FenError::KingCount { color, found: kings });
            }
            // keeps every position inside the fixed-capacity move list
            let men = pos.color_bb(color).popcount();
            if men > 16 {
                return Err(FenError::TooManyPieces { color, found: men });
            }
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in parts.get(2).copied().unwrap_or("-").chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::Short),
                'Q' => (Color::White, CastleSide::Long),
                'k' => (Color::Black, CastleSide::Short),
                'q' => (Color::Black, CastleSide::Long),
                '-' => continue,
                _ => return Err(FenError::InvalidCastling { char: c }),
            };
            pos.unmoved = pos
                .unmoved
                .with(CastleSide::king_from(color))
                .with(side.rook_from(color));
        }
        pos.unmoved &= pos.occupied();

        pos.hash = pos.compute_hash();
        Ok(pos)
    }

    /// Convert the position to FEN; counters are always `0 1`.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8u8 {
                if let Some((color, piece)) = self.piece_at(Square(rank * 8 + file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.side_to_move == Color::White { "w" } else { "b" };
        let rights = self.castling_rights();
        let mut castling = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::Short, 'K'),
            (Color::White, CastleSide::Long, 'Q'),
            (Color::Black, CastleSide::Short, 'k'),
            (Color::Black, CastleSide::Long, 'q'),
        ] {
            if rights.has(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        format!("{} {} {} - 0 1", rows.join("/"), active, castling)
    }

    /// Parse a move in coordinate notation (`e2e4`, `e7e8q`, castles as
    /// `e1g1`) and match it against the legal moves.
    ///
    /// # Errors
    /// Fails on malformed input or when no legal move matches.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if text.len() < 4 || text.len() > 5 || !text.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }
        let invalid = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text[0..2].parse().map_err(|_| invalid())?;
        let to: Square = text[2..4].parse().map_err(|_| invalid())?;
        let promo = match text[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion_piece() == promo)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}
