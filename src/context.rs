//! Engine-wide state: hash keys, transposition table, PRNG and attack
//! tables, built from one [`EngineConfig`].

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::attack_tables::{self, AttackTables, DEFAULT_MAGIC_SEED};
use crate::board::search::{self, SearchOutcome, SearchParams};
use crate::board::Position;
use crate::error::EngineError;
use crate::eval::Evaluator;
use crate::tt::{PersistError, RecordWriter, TranspositionTable, DEFAULT_MIN_STORE_DEPTH, DEFAULT_TT_CAPACITY};
use crate::zobrist::{ZobristKeys, DEFAULT_ZOBRIST_SEED};

/// Seed of the context PRNG unless configured otherwise
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_C4E5;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub zobrist_seed: u64,
    /// Only honored by the first context in the process; the attack tables
    /// are shared
    pub magic_seed: u64,
    pub rng_seed: u64,
    pub tt_capacity: usize,
    pub tt_min_store_depth: i32,
    /// Transposition file loaded at startup and appended to while running
    pub persist_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
            magic_seed: DEFAULT_MAGIC_SEED,
            rng_seed: DEFAULT_RNG_SEED,
            tt_capacity: DEFAULT_TT_CAPACITY,
            tt_min_store_depth: DEFAULT_MIN_STORE_DEPTH,
            persist_path: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn zobrist_seed(mut self, seed: u64) -> Self {
        self.zobrist_seed = seed;
        self
    }

    #[must_use]
    pub fn magic_seed(mut self, seed: u64) -> Self {
        self.magic_seed = seed;
        self
    }

    #[must_use]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    #[must_use]
    pub fn tt_capacity(mut self, capacity: usize) -> Self {
        self.tt_capacity = capacity;
        self
    }

    #[must_use]
    pub fn tt_min_store_depth(mut self, depth: i32) -> Self {
        self.tt_min_store_depth = depth;
        self
    }

    #[must_use]
    pub fn persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }
}

/// Owner of everything a search shares across moves of a game.
///
/// Dropping the context freezes the table and flushes the transposition
/// file; call [`EngineContext::freeze_and_flush`] to see the result.
pub struct EngineContext {
    config: EngineConfig,
    keys: Arc<ZobristKeys>,
    tt: TranspositionTable,
    rng: StdRng,
    tables: &'static AttackTables,
}

impl EngineContext {
    /// Build the context, loading and compacting the transposition file
    /// when one is configured.
    ///
    /// # Errors
    /// Magic search exhaustion, or an unreadable or malformed transposition
    /// file.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let tables = attack_tables::init(config.magic_seed)?;
        if tables.seed() != config.magic_seed {
            warn!(
                "attack tables already built with seed {}; ignoring seed {}",
                tables.seed(),
                config.magic_seed
            );
        }

        let keys = Arc::new(ZobristKeys::new(config.zobrist_seed));
        let mut tt = TranspositionTable::new(config.tt_capacity, config.tt_min_store_depth);
        if let Some(path) = &config.persist_path {
            if path.exists() {
                let read = tt.load_from(path)?;
                info!("loaded {read} transposition records from {}", path.display());
            }
            tt.save_to(path)?;
            tt.attach_writer(RecordWriter::spawn(path)?);
        }

        Ok(EngineContext {
            rng: StdRng::seed_from_u64(config.rng_seed),
            config,
            keys,
            tt,
            tables,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    #[must_use]
    pub fn attack_tables(&self) -> &'static AttackTables {
        self.tables
    }

    #[must_use]
    pub fn start_position(&self) -> Position {
        Position::start_with_keys(Arc::clone(&self.keys))
    }

    /// # Errors
    /// Malformed FEN.
    pub fn position_from_fen(&self, fen: &str) -> Result<Position, EngineError> {
        Ok(Position::from_fen_with_keys(fen, Arc::clone(&self.keys))?)
    }

    /// Rehash `pos` with this context's keys if it uses different ones.
    pub fn adopt(&self, pos: &mut Position) {
        if pos.keys().seed() != self.keys.seed() {
            pos.rekey(Arc::clone(&self.keys));
        }
    }

    #[must_use]
    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn tt_mut(&mut self) -> &mut TranspositionTable {
        &mut self.tt
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Search `pos` with this context's transposition table.
    ///
    /// # Errors
    /// Contract violations from the position, which indicate a bug.
    pub fn search(
        &mut self,
        pos: &mut Position,
        evaluator: &dyn Evaluator,
        params: &SearchParams,
        stop: &AtomicBool,
    ) -> Result<SearchOutcome, EngineError> {
        self.adopt(pos);
        Ok(search::search(pos, &mut self.tt, evaluator, params, stop)?)
    }

    /// Freeze the table and drain the transposition writer.
    ///
    /// Returns the number of records appended this run. Calling it again
    /// returns 0.
    ///
    /// # Errors
    /// The writer's I/O failure.
    pub fn freeze_and_flush(&mut self) -> Result<usize, PersistError> {
        self.tt.freeze();
        match self.tt.take_writer() {
            Some(writer) => writer.finish(),
            None => Ok(0),
        }
    }
}

impl Drop for EngineContext {
    fn drop(&mut self) {
        if let Err(err) = self.freeze_and_flush() {
            warn!("transposition flush failed: {err}");
        }
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("config", &self.config)
            .field("tt", &self.tt)
            .finish_non_exhaustive()
    }
}
