//! Bitboard chess engine core: magic attack tables, legal move generation,
//! static exchange evaluation and an iterative-deepening negamax search
//! with a Zobrist-keyed transposition table.
//!
//! # Example
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use magic_negamax::{EngineConfig, EngineContext, MaterialEvaluator, NullMove, SearchParams};
//!
//! let mut ctx = EngineContext::new(EngineConfig::default())?;
//! let mut pos = ctx.start_position();
//! let params = SearchParams::fixed_depth(4, NullMove::Disabled);
//! let outcome = ctx.search(&mut pos, &MaterialEvaluator, &params, &AtomicBool::new(false))?;
//! println!("{:?}", outcome.best_move());
//! # Ok::<(), magic_negamax::EngineError>(())
//! ```

pub mod board;
pub mod context;
pub mod error;
pub mod eval;
pub mod player;
pub mod tt;
pub mod zobrist;

pub use board::search::{
    search, LineTag, NullMove, SearchLine, SearchOutcome, SearchParams, SearchReport, SearchStats,
    MATE_SCORE, MATE_THRESHOLD,
};
pub use board::{Color, GenMode, Move, MoveKind, Piece, Position, Square, Undo};
pub use context::{EngineConfig, EngineContext};
pub use error::EngineError;
pub use eval::{Evaluation, Evaluator, MaterialEvaluator};
pub use player::{OpeningBook, Player, SearchPlayer};
pub use tt::{BoundType, PersistError, TranspositionTable};
