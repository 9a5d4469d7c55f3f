//! Precomputed attack tables for leaper pieces (knights, kings, pawns) and
//! the between-squares table used by check and pin resolution.

use crate::board::types::{Bitboard, Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

pub(crate) const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Jump and step tables for the non-sliding pieces.
pub(crate) struct LeaperTables {
    pub knight: [Bitboard; 64],
    pub king: [Bitboard; 64],
    /// Diagonal capture targets, per color
    pub pawn_attacks: [[Bitboard; 64]; 2],
    /// Single-step push target, per color
    pub pawn_pushes: [[Bitboard; 64]; 2],
}

fn jumps(sq: Square, deltas: &[(i8, i8)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(dr, df)| sq.offset(dr, df))
        .fold(Bitboard::EMPTY, |bb, to| bb.with(to))
}

impl LeaperTables {
    pub(crate) fn build() -> Self {
        let mut tables = LeaperTables {
            knight: [Bitboard::EMPTY; 64],
            king: [Bitboard::EMPTY; 64],
            pawn_attacks: [[Bitboard::EMPTY; 64]; 2],
            pawn_pushes: [[Bitboard::EMPTY; 64]; 2],
        };
        for sq in Square::all() {
            let i = sq.index();
            tables.knight[i] = jumps(sq, &KNIGHT_DELTAS);
            tables.king[i] = jumps(sq, &KING_DELTAS);
            for color in Color::BOTH {
                let dir = color.pawn_direction();
                tables.pawn_attacks[color.index()][i] = jumps(sq, &[(dir, -1), (dir, 1)]);
                tables.pawn_pushes[color.index()][i] = jumps(sq, &[(dir, 0)]);
            }
        }
        tables
    }
}

/// Squares strictly between two aligned squares; empty when not aligned.
pub(crate) fn build_between() -> Vec<Bitboard> {
    let mut between = vec![Bitboard::EMPTY; 64 * 64];
    for from in Square::all() {
        for &(dr, df) in &KING_DELTAS {
            let mut path = Bitboard::EMPTY;
            let mut cur = from.offset(dr, df);
            while let Some(sq) = cur {
                between[from.index() * 64 + sq.index()] = path;
                path = path.with(sq);
                cur = sq.offset(dr, df);
            }
        }
    }
    between
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_corner_and_center() {
        let t = LeaperTables::build();
        assert_eq!(t.knight[Square::A1.index()].popcount(), 2);
        assert_eq!(t.knight[27].popcount(), 8);
        assert_eq!(t.king[Square::H8.index()].popcount(), 3);
    }

    #[test]
    fn pawn_tables_do_not_wrap_files() {
        let t = LeaperTables::build();
        let a2: Square = "a2".parse().expect("square");
        let h7: Square = "h7".parse().expect("square");
        let white = t.pawn_attacks[Color::White.index()][a2.index()];
        assert_eq!(white, Bitboard::from_square("b3".parse().expect("square")));
        let black = t.pawn_attacks[Color::Black.index()][h7.index()];
        assert_eq!(black, Bitboard::from_square("g6".parse().expect("square")));
        assert!(t.pawn_pushes[Color::White.index()][Square::A8.index()].is_empty());
    }

    #[test]
    fn between_is_exclusive_and_symmetric() {
        let between = build_between();
        let a1 = Square::A1.index();
        let h8 = Square::H8.index();
        assert_eq!(between[a1 * 64 + h8].popcount(), 6);
        assert_eq!(between[a1 * 64 + h8], between[h8 * 64 + a1]);
        let b3: Square = "b3".parse().expect("square");
        assert!(between[a1 * 64 + b3.index()].is_empty());
    }
}
