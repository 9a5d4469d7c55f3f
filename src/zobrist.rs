//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for the
//! transposition table. Keys are drawn from an explicitly seeded PRNG so two
//! key sets built from the same seed hash identically.

use rand::prelude::*;

use crate::board::{CastleSide, CastlingRights, Color, Piece, Square};

/// Seed used by positions created without an engine context.
pub const DEFAULT_ZOBRIST_SEED: u64 = 1_234_567_890;

/// Random keys for every hashed feature of a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    piece_keys: [[[u64; 64]; 2]; 6],
    black_to_move_key: u64,
    // castling_keys[color][side]: 0=White, 1=Black; 0=Short, 1=Long
    castling_keys: [[u64; 2]; 2],
    seed: u64,
}

impl ZobristKeys {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut castling_keys = [[0; 2]; 2];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    #[must_use]
    pub fn piece(&self, piece: Piece, color: Color, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn black_to_move(&self) -> u64 {
        self.black_to_move_key
    }

    /// XOR of the keys of every right present in `rights`
    #[inline]
    #[must_use]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if rights.has(color, side) {
                    key ^= self.castling_keys[color.index()][side.index()];
                }
            }
        }
        key
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        ZobristKeys::new(DEFAULT_ZOBRIST_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_keys() {
        assert_eq!(ZobristKeys::new(5), ZobristKeys::new(5));
        assert_ne!(ZobristKeys::new(5), ZobristKeys::new(6));
    }

    #[test]
    fn castling_key_is_xor_of_rights() {
        let keys = ZobristKeys::default();
        let mut short = CastlingRights::none();
        short.set(Color::White, CastleSide::Short);
        let mut long = CastlingRights::none();
        long.set(Color::White, CastleSide::Long);
        let mut both = short;
        both.set(Color::White, CastleSide::Long);
        assert_eq!(keys.castling(both), keys.castling(short) ^ keys.castling(long));
        assert_eq!(keys.castling(CastlingRights::none()), 0);
    }
}
