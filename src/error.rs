//! Crate-wide error type.

use thiserror::Error;

use crate::board::{FenError, MagicError, MoveParseError, PositionError, SanError};
use crate::tt::PersistError;

/// Any failure surfaced by [`EngineContext`](crate::context::EngineContext).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("attack tables: {0}")]
    Magic(#[from] MagicError),
    #[error("FEN: {0}")]
    Fen(#[from] FenError),
    #[error("position: {0}")]
    Position(#[from] PositionError),
    #[error("move: {0}")]
    MoveParse(#[from] MoveParseError),
    #[error("notation: {0}")]
    San(#[from] SanError),
    #[error("transposition file: {0}")]
    Persist(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_sources_with_context() {
        let err: EngineError = SanError::Empty.into();
        assert_eq!(err.to_string(), "notation: Empty move string");
        let err: EngineError = FenError::TooFewParts { found: 1 }.into();
        assert!(err.to_string().starts_with("FEN: "));
        assert!(matches!(err, EngineError::Fen(_)));
    }
}
