//! Transposition table for caching search results.
//!
//! Keyed by the position's Zobrist hash. Entries carry the remaining depth
//! they were searched to, a score with its bound classification and a
//! compact best-move hint. The table has a hard entry cap: once full, new
//! keys are dropped and nothing is evicted. Freezing the table makes every
//! later store a no-op, which is how shutdown keeps writes from racing the
//! persistence drain.

mod persist;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::{info, warn};

use crate::board::search::MATE_THRESHOLD;
use crate::board::{Move, Piece, Square};

pub use persist::{PersistError, Record, RecordWriter};

/// Default cap on stored entries
pub const DEFAULT_TT_CAPACITY: usize = 8_000_000;

/// Entries searched to less remaining depth than this are not stored
pub const DEFAULT_MIN_STORE_DEPTH: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

impl BoundType {
    const fn as_str(self) -> &'static str {
        match self {
            BoundType::Exact => "exact",
            BoundType::LowerBound => "lower",
            BoundType::UpperBound => "upper",
        }
    }
}

impl fmt::Display for BoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(BoundType::Exact),
            "lower" => Ok(BoundType::LowerBound),
            "upper" => Ok(BoundType::UpperBound),
            other => Err(format!("unknown node type '{other}'")),
        }
    }
}

/// Best-move hint packed into 16 bits:
/// - bits 0-5:   source square
/// - bits 6-11:  destination square
/// - bits 12-14: promotion piece (0 = none, 1 = knight .. 4 = queen)
///
/// A hint is matched against the legal moves of the probing position, so a
/// stale or colliding entry can never inject an illegal move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedMove(u16);

impl PackedMove {
    #[must_use]
    pub fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        let promo = match promotion {
            Some(Piece::Knight) => 1,
            Some(Piece::Bishop) => 2,
            Some(Piece::Rook) => 3,
            Some(Piece::Queen) => 4,
            _ => 0,
        };
        PackedMove(u16::from(from.0) | (u16::from(to.0) << 6) | (promo << 12))
    }

    #[inline]
    #[must_use]
    pub fn source(self) -> Square {
        Square((self.0 & 0x3F) as u8)
    }

    #[inline]
    #[must_use]
    pub fn dest(self) -> Square {
        Square(((self.0 >> 6) & 0x3F) as u8)
    }

    #[must_use]
    pub fn promotion(self) -> Option<Piece> {
        match (self.0 >> 12) & 0x7 {
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            _ => None,
        }
    }

    /// True if `mv` is the move this hint describes
    #[inline]
    #[must_use]
    pub fn matches(self, mv: Move) -> bool {
        self == PackedMove::from(mv)
    }
}

impl From<Move> for PackedMove {
    fn from(mv: Move) -> Self {
        PackedMove::new(mv.from(), mv.to(), mv.promotion_piece())
    }
}

impl fmt::Display for PackedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.dest())?;
        if let Some(p) = self.promotion() {
            write!(f, "{}", p.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for PackedMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(format!("bad move '{s}'"));
        }
        let from: Square = s[0..2].parse().map_err(|e| format!("{e}"))?;
        let to: Square = s[2..4].parse().map_err(|e| format!("{e}"))?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(format!("bad promotion '{c}'")),
            },
        };
        Ok(PackedMove::new(from, to, promotion))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: i32,
    pub score: i32,
    pub bound_type: BoundType,
    pub best_move: Option<PackedMove>,
}

impl TTEntry {
    #[must_use]
    pub fn depth(&self) -> i32 {
        self.depth
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    #[must_use]
    pub fn best_move(&self) -> Option<PackedMove> {
        self.best_move
    }
}

/// Result of a store attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    Inserted,
    Replaced,
    /// Kept the existing entry (deeper, or an exact node)
    Rejected,
    /// Below the minimum depth or a mate score
    Skipped,
    Full,
    Frozen,
}

impl StoreOutcome {
    #[must_use]
    pub fn accepted(self) -> bool {
        matches!(self, StoreOutcome::Inserted | StoreOutcome::Replaced)
    }
}

pub struct TranspositionTable {
    entries: HashMap<u64, TTEntry>,
    capacity: usize,
    min_store_depth: i32,
    frozen: bool,
    warned_full: bool,
    warned_frozen: bool,
    writer: Option<RecordWriter>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(capacity: usize, min_store_depth: i32) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity,
            min_store_depth,
            frozen: false,
            warned_full: false,
            warned_frozen: false,
            writer: None,
        }
    }

    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<&TTEntry> {
        self.entries.get(&hash)
    }

    /// Store a search result.
    ///
    /// An existing entry is overwritten only by a deeper search, or by an
    /// equally deep one when the existing entry is not exact. Mate scores
    /// are never stored (they are ply-relative).
    pub fn store(
        &mut self,
        hash: u64,
        depth: i32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) -> StoreOutcome {
        if self.frozen {
            if !self.warned_frozen {
                warn!("transposition table is frozen; stores ignored");
                self.warned_frozen = true;
            }
            return StoreOutcome::Frozen;
        }
        if depth < self.min_store_depth || score.abs() >= MATE_THRESHOLD {
            return StoreOutcome::Skipped;
        }

        let entry = TTEntry {
            depth,
            score,
            bound_type,
            best_move: best_move.map(PackedMove::from),
        };
        let outcome = match self.entries.get(&hash) {
            Some(existing) if existing.depth > depth => return StoreOutcome::Rejected,
            Some(existing) if existing.depth == depth && existing.bound_type == BoundType::Exact => {
                return StoreOutcome::Rejected
            }
            Some(_) => StoreOutcome::Replaced,
            None if self.entries.len() >= self.capacity => {
                if !self.warned_full {
                    warn!("transposition table full at {} entries; new keys dropped", self.capacity);
                    self.warned_full = true;
                }
                return StoreOutcome::Full;
            }
            None => StoreOutcome::Inserted,
        };

        self.entries.insert(hash, entry);
        if let Some(writer) = &self.writer {
            writer.push(Record { hash, entry });
        }
        outcome
    }

    /// Insert without replacement rules; used when loading a saved table.
    pub(crate) fn insert_raw(&mut self, hash: u64, entry: TTEntry) -> bool {
        if !self.entries.contains_key(&hash) && self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.insert(hash, entry);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn min_store_depth(&self) -> i32 {
        self.min_store_depth
    }

    /// Fill level in per mille (0-1000).
    #[must_use]
    pub fn fill_per_mille(&self) -> u32 {
        if self.capacity == 0 {
            return 1000;
        }
        ((self.entries.len() as u64 * 1000) / self.capacity as u64) as u32
    }

    /// Drop every entry. A frozen table stays frozen.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.warned_full = false;
    }

    /// Enter the terminal frozen state: every later store is ignored.
    pub fn freeze(&mut self) {
        if !self.frozen {
            info!("transposition table frozen with {} entries", self.entries.len());
        }
        self.frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stream every accepted store to `writer` from now on.
    pub fn attach_writer(&mut self, writer: RecordWriter) {
        self.writer = Some(writer);
    }

    pub(crate) fn take_writer(&mut self) -> Option<RecordWriter> {
        self.writer.take()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &TTEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_CAPACITY, DEFAULT_MIN_STORE_DEPTH)
    }
}

impl fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("min_store_depth", &self.min_store_depth)
            .field("frozen", &self.frozen)
            .field("persisting", &self.writer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_probe() {
        let mut tt = TranspositionTable::new(16, 2);
        let hash = 0x1234_5678_9ABC_DEF0;

        assert_eq!(tt.store(hash, 10, 500, BoundType::Exact, None), StoreOutcome::Inserted);

        let entry = tt.probe(hash).expect("should find entry");
        assert_eq!(entry.depth(), 10);
        assert_eq!(entry.score(), 500);
        assert_eq!(entry.bound_type(), BoundType::Exact);
    }

    #[test]
    fn test_no_false_positives() {
        let mut tt = TranspositionTable::new(16, 2);
        tt.store(0x1234_5678_9ABC_DEF0, 10, 500, BoundType::Exact, None);
        assert!(tt.probe(0xFEDC_BA98_7654_3210).is_none());
    }

    #[test]
    fn test_replacement_rules() {
        let mut tt = TranspositionTable::new(16, 2);
        tt.store(1, 4, 10, BoundType::LowerBound, None);
        assert_eq!(tt.store(1, 3, 20, BoundType::Exact, None), StoreOutcome::Rejected);
        assert_eq!(tt.store(1, 4, 30, BoundType::UpperBound, None), StoreOutcome::Replaced);
        assert_eq!(tt.store(1, 5, 40, BoundType::Exact, None), StoreOutcome::Replaced);
        // an exact entry only yields to a deeper search
        assert_eq!(tt.store(1, 5, 50, BoundType::LowerBound, None), StoreOutcome::Rejected);
        assert_eq!(tt.store(1, 6, 60, BoundType::LowerBound, None), StoreOutcome::Replaced);
        assert_eq!(tt.probe(1).map(TTEntry::score), Some(60));
    }

    #[test]
    fn test_shallow_and_mate_scores_skipped() {
        let mut tt = TranspositionTable::new(16, 2);
        assert_eq!(tt.store(1, 1, 10, BoundType::Exact, None), StoreOutcome::Skipped);
        assert_eq!(
            tt.store(2, 5, MATE_THRESHOLD + 3, BoundType::Exact, None),
            StoreOutcome::Skipped
        );
        assert!(tt.is_empty());
    }

    #[test]
    fn test_capacity_drops_new_keys() {
        let mut tt = TranspositionTable::new(2, 2);
        tt.store(1, 2, 0, BoundType::Exact, None);
        tt.store(2, 2, 0, BoundType::Exact, None);
        assert_eq!(tt.store(3, 9, 0, BoundType::Exact, None), StoreOutcome::Full);
        // existing keys can still be updated
        assert_eq!(tt.store(2, 3, 7, BoundType::Exact, None), StoreOutcome::Replaced);
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.fill_per_mille(), 1000);
    }

    #[test]
    fn test_frozen_table_ignores_stores() {
        let mut tt = TranspositionTable::new(16, 2);
        tt.freeze();
        assert_eq!(tt.store(1, 5, 0, BoundType::Exact, None), StoreOutcome::Frozen);
        assert!(tt.is_empty());
        assert!(tt.is_frozen());
    }

    #[test]
    fn test_packed_move_text() {
        let mv: PackedMove = "e7e8q".parse().expect("valid");
        assert_eq!(mv.source(), Square::new(6, 4).expect("e7"));
        assert_eq!(mv.dest(), Square::new(7, 4).expect("e8"));
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
        assert!("e7e8k".parse::<PackedMove>().is_err());
    }

    #[test]
    fn test_stored_move_comes_back_as_matching_hint() {
        let pos = crate::board::Position::new();
        let mv = pos.parse_move("g1f3").expect("legal");
        let other = pos.parse_move("g1h3").expect("legal");

        let mut tt = TranspositionTable::new(16, 2);
        tt.store(7, 3, 15, BoundType::LowerBound, Some(mv));
        let hint = tt.probe(7).and_then(TTEntry::best_move).expect("hint stored");
        assert_eq!(hint, PackedMove::new(mv.from(), mv.to(), None));
        assert_eq!(hint.source(), mv.from());
        assert_eq!(hint.dest(), mv.to());
        assert!(hint.matches(mv));
        assert!(!hint.matches(other));
    }
}
