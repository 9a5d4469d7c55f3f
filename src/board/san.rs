//! Algebraic move notation.
//!
//! Parsing accepts the forms found in opening lines: `e4`, `Nf3`, `Nbd7`,
//! `R1e2`, `Qh4xe1`, `exd5`, `O-O`, `0-0-0`, `e8=Q`, with trailing `+`, `#`,
//! `!` and `?` ignored. The legal move list is the source of truth: a string
//! resolves only if exactly one legal move fits it. Promotions without a
//! piece resolve to the queen.
//!
//! # Examples
//! ```
//! use magic_negamax::board::Position;
//!
//! let pos = Position::new();
//! let mv = pos.parse_san("Nf3").expect("legal");
//! assert_eq!(pos.to_san(mv), "Nf3");
//! ```

use super::error::{PositionError, SanError};
use super::{CastleSide, Move, MoveKind, Piece, Position, Square};

/// Pieces of a parsed notation string before matching.
#[derive(Debug, Default, PartialEq, Eq)]
struct SanParts {
    piece: Option<Piece>,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    dest: Option<Square>,
    promotion: Option<Piece>,
}

fn castle_side(san: &str) -> Option<CastleSide> {
    match san {
        "O-O" | "0-0" => Some(CastleSide::Short),
        "O-O-O" | "0-0-0" => Some(CastleSide::Long),
        _ => None,
    }
}

fn split_san(san: &str) -> Result<SanParts, SanError> {
    let mut parts = SanParts::default();
    let mut body: &str = san;

    if let Some((head, promo)) = body.split_once('=') {
        let c = promo.chars().next().ok_or(SanError::InvalidPromotion { char: '=' })?;
        parts.promotion = Some(promotion_piece(c)?);
        body = head;
    } else if let Some(last) = body.chars().last() {
        // "e8Q" style promotions
        if last.is_ascii_uppercase() && body.len() > 2 {
            parts.promotion = Some(promotion_piece(last)?);
            body = &body[..body.len() - 1];
        }
    }

    let mut chars: Vec<char> = body.chars().filter(|&c| c != 'x' && c != '-' && c != ':').collect();
    if let Some(&first) = chars.first() {
        if first.is_ascii_uppercase() {
            let piece = Piece::from_char(first)
                .filter(|p| *p != Piece::Pawn)
                .ok_or_else(|| SanError::InvalidPiece {
                    char: first,
                    san: san.to_string(),
                })?;
            parts.piece = Some(piece);
            chars.remove(0);
        }
    }

    if chars.len() < 2 {
        return Err(SanError::InvalidSquare {
            notation: san.to_string(),
        });
    }
    let dest: String = chars[chars.len() - 2..].iter().collect();
    parts.dest = Some(dest.parse().map_err(|_| SanError::InvalidSquare {
        notation: san.to_string(),
    })?);

    for &c in &chars[..chars.len() - 2] {
        match c {
            'a'..='h' => parts.from_file = Some(c as u8 - b'a'),
            '1'..='8' => parts.from_rank = Some(c as u8 - b'1'),
            _ => {
                return Err(SanError::InvalidSquare {
                    notation: san.to_string(),
                })
            }
        }
    }
    Ok(parts)
}

fn promotion_piece(c: char) -> Result<Piece, SanError> {
    match Piece::from_char(c) {
        Some(p @ (Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => Ok(p),
        _ => Err(SanError::InvalidPromotion { char: c }),
    }
}

impl Position {
    /// Resolve an algebraic move string against the legal moves.
    ///
    /// # Errors
    /// [`SanError::NoMatchingMove`] if no legal move fits,
    /// [`SanError::AmbiguousMove`] if more than one does, or a syntax error.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let cleaned = san.trim().trim_end_matches(['+', '#', '!', '?']);
        if cleaned.is_empty() {
            return Err(SanError::Empty);
        }
        let legal = self.legal_moves();

        if let Some(side) = castle_side(cleaned) {
            return legal
                .iter()
                .copied()
                .find(|m| m.castle_side() == Some(side))
                .ok_or_else(|| SanError::NoMatchingMove {
                    san: san.to_string(),
                });
        }

        let parts = split_san(cleaned)?;
        let piece = parts.piece.unwrap_or(Piece::Pawn);
        let promotion = match (piece, parts.promotion) {
            (Piece::Pawn, None) => Some(Piece::Queen),
            (_, promo) => promo,
        };

        let mut matching = legal.iter().copied().filter(|m| {
            m.piece() == piece
                && Some(m.to()) == parts.dest
                && m.castle_side().is_none()
                && parts.from_file.map_or(true, |f| m.from().file() == f)
                && parts.from_rank.map_or(true, |r| m.from().rank() == r)
                && (!m.is_promotion() || m.promotion_piece() == promotion)
        });

        match (matching.next(), matching.next()) {
            (Some(mv), None) => Ok(mv),
            (None, _) => Err(SanError::NoMatchingMove {
                san: san.to_string(),
            }),
            (Some(_), Some(_)) => Err(SanError::AmbiguousMove {
                san: san.to_string(),
            }),
        }
    }

    /// Parse a move in algebraic notation and play it.
    ///
    /// # Errors
    /// Notation errors are returned as-is; a failed apply (which would mean
    /// the generator produced an inconsistent move) is reported as a
    /// [`SanError::NoMatchingMove`] carrying the contract message.
    pub fn play_san(&mut self, san: &str) -> Result<Move, SanError> {
        let mv = self.parse_san(san)?;
        self.apply(mv).map_err(|err: PositionError| SanError::NoMatchingMove {
            san: format!("{san}: {err}"),
        })?;
        Ok(mv)
    }

    /// Format a legal move in algebraic notation, with `+`/`#` suffixes.
    #[must_use]
    pub fn to_san(&self, mv: Move) -> String {
        let mut san = String::new();
        match mv.kind() {
            MoveKind::Castle(CastleSide::Short) => san.push_str("O-O"),
            MoveKind::Castle(CastleSide::Long) => san.push_str("O-O-O"),
            _ => {
                if mv.piece() == Piece::Pawn {
                    if mv.is_capture() {
                        san.push((b'a' + mv.from().file()) as char);
                    }
                } else {
                    san.push(mv.piece().to_char().to_ascii_uppercase());
                    san.push_str(&self.disambiguation(mv));
                }
                if mv.is_capture() {
                    san.push('x');
                }
                san.push_str(&mv.to().to_string());
                if let Some(promo) = mv.promotion_piece() {
                    san.push('=');
                    san.push(promo.to_char().to_ascii_uppercase());
                }
            }
        }

        let mut after = self.clone();
        if after.apply(mv).is_ok() && after.is_in_check() {
            san.push(if after.legal_moves().is_empty() { '#' } else { '+' });
        }
        san
    }

    fn disambiguation(&self, mv: Move) -> String {
        let rivals: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|m| m.piece() == mv.piece() && m.to() == mv.to() && m.from() != mv.from())
            .map(|m| m.from())
            .collect();
        if rivals.is_empty() {
            return String::new();
        }
        let file = (b'a' + mv.from().file()) as char;
        let rank = (b'1' + mv.from().rank()) as char;
        if rivals.iter().all(|sq| sq.file() != mv.from().file()) {
            file.to_string()
        } else if rivals.iter().all(|sq| sq.rank() != mv.from().rank()) {
            rank.to_string()
        } else {
            format!("{file}{rank}")
        }
    }
}
