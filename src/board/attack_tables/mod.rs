//! Attack tables for move generation.
//!
//! Leaper tables are translated from fixed offsets; rook and bishop attacks
//! use magic bitboards whose multipliers are searched at start-up with an
//! explicitly seeded PRNG. The tables are built once per process and are
//! read-only afterwards.

mod magic;
mod tables;

pub use magic::{Magic, MAX_MAGIC_ATTEMPTS};

pub(crate) use tables::KING_DELTAS;

use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::error::MagicError;
use crate::board::types::{Bitboard, Color, Piece, Square};

use magic::SliderTable;
use tables::{build_between, LeaperTables};

/// Seed used when the tables are first touched without an explicit init.
pub const DEFAULT_MAGIC_SEED: u64 = 1_696_969_420;

static TABLES: OnceCell<AttackTables> = OnceCell::new();

/// All precomputed attack data.
pub struct AttackTables {
    leapers: LeaperTables,
    rook: SliderTable,
    bishop: SliderTable,
    between: Vec<Bitboard>,
    seed: u64,
}

impl AttackTables {
    /// Build every table, searching magics with a PRNG seeded from `seed`.
    ///
    /// # Errors
    /// Returns [`MagicError::Exhausted`] if some square has no magic within
    /// `max_attempts` candidates.
    pub fn generate_with_budget(seed: u64, max_attempts: u64) -> Result<Self, MagicError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let rook = SliderTable::generate(Piece::Rook, &mut rng, max_attempts)?;
        let bishop = SliderTable::generate(Piece::Bishop, &mut rng, max_attempts)?;
        Ok(AttackTables {
            leapers: LeaperTables::build(),
            rook,
            bishop,
            between: build_between(),
            seed,
        })
    }

    /// # Errors
    /// See [`AttackTables::generate_with_budget`].
    pub fn generate(seed: u64) -> Result<Self, MagicError> {
        Self::generate_with_budget(seed, MAX_MAGIC_ATTEMPTS)
    }

    /// Seed the magics were searched with
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn rook_magic(&self, sq: Square) -> &Magic {
        &self.rook.magics[sq.index()]
    }

    #[must_use]
    pub fn bishop_magic(&self, sq: Square) -> &Magic {
        &self.bishop.magics[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.leapers.knight[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.leapers.king[sq.index()]
    }

    /// Squares a `color` pawn on `sq` attacks
    #[inline]
    #[must_use]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.leapers.pawn_attacks[color.index()][sq.index()]
    }

    /// Single-step push target of a `color` pawn on `sq`
    #[inline]
    #[must_use]
    pub fn pawn_push(&self, color: Color, sq: Square) -> Bitboard {
        self.leapers.pawn_pushes[color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook.attacks(sq, occupied)
    }

    #[inline]
    #[must_use]
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop.attacks(sq, occupied)
    }

    #[inline]
    #[must_use]
    pub fn queen(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook(sq, occupied) | self.bishop(sq, occupied)
    }

    /// Attack set of `piece` of `color` standing on `sq`
    #[inline]
    #[must_use]
    pub fn piece_attacks(&self, piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        match piece {
            Piece::Pawn => self.pawn_attacks(color, sq),
            Piece::Knight => self.knight(sq),
            Piece::Bishop => self.bishop(sq, occupied),
            Piece::Rook => self.rook(sq, occupied),
            Piece::Queen => self.queen(sq, occupied),
            Piece::King => self.king(sq),
        }
    }

    /// Squares strictly between `a` and `b` on a shared line, else empty
    #[inline]
    #[must_use]
    pub fn between(&self, a: Square, b: Square) -> Bitboard {
        self.between[a.index() * 64 + b.index()]
    }
}

/// Build the process-wide tables with `seed` if nobody has yet.
///
/// Later calls return the existing tables regardless of seed.
///
/// # Errors
/// Propagates [`MagicError`] from the magic search.
pub fn init(seed: u64) -> Result<&'static AttackTables, MagicError> {
    TABLES.get_or_try_init(|| AttackTables::generate(seed))
}

/// Process-wide tables, built on first use with [`DEFAULT_MAGIC_SEED`].
///
/// # Panics
/// Panics if the magic search fails for the default seed; no lookup can be
/// trusted after that.
#[inline]
#[must_use]
pub fn tables() -> &'static AttackTables {
    if let Some(tables) = TABLES.get() {
        return tables;
    }
    match init(DEFAULT_MAGIC_SEED) {
        Ok(tables) => tables,
        Err(err) => panic!("attack table construction failed: {err}"),
    }
}
