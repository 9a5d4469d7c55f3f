//! Move choosers built on the engine.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::{debug, error};
use rand::seq::SliceRandom;

use crate::board::search::{SearchOutcome, SearchParams};
use crate::board::{Move, Position, SanError};
use crate::context::EngineContext;
use crate::eval::Evaluator;

/// Anything that picks moves in a game.
pub trait Player {
    /// The move to play in `pos`, or `None` to resign.
    fn next_move(&mut self, pos: &Position) -> Option<Move>;
}

/// Known replies keyed by position hash.
#[derive(Clone, Debug, Default)]
pub struct OpeningBook {
    replies: HashMap<u64, Vec<Move>>,
}

impl OpeningBook {
    /// Build a book from lines of algebraic moves played from `start`.
    ///
    /// Move numbers (`1.`, `12...`) are skipped. Hashes use `start`'s keys,
    /// so lookups must use positions with the same keys.
    ///
    /// # Errors
    /// The first move that does not parse in its position.
    pub fn from_lines<'a>(
        start: &Position,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, SanError> {
        let mut book = OpeningBook::default();
        for line in lines {
            let mut pos = start.clone();
            for token in line.split_whitespace() {
                let san = strip_move_number(token);
                if san.is_empty() {
                    continue;
                }
                let hash = pos.hash();
                let mv = pos.play_san(san)?;
                let replies = book.replies.entry(hash).or_default();
                if !replies.contains(&mv) {
                    replies.push(mv);
                }
            }
        }
        Ok(book)
    }

    /// Book moves for `pos` that are legal there.
    #[must_use]
    pub fn candidates(&self, pos: &Position) -> Vec<Move> {
        self.replies
            .get(&pos.hash())
            .map(|moves| moves.iter().copied().filter(|&mv| pos.is_legal(mv)).collect())
            .unwrap_or_default()
    }

    /// Number of positions with book replies
    #[must_use]
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

/// `"12.e4"` and `"12...e5"` lose their move number; `"0-0"` is kept.
fn strip_move_number(token: &str) -> &str {
    match token.rfind('.') {
        Some(dot) if token[..dot].chars().all(|c| c.is_ascii_digit() || c == '.') => &token[dot + 1..],
        _ => token,
    }
}

/// Plays from the book while it can, then searches.
pub struct SearchPlayer<E> {
    ctx: EngineContext,
    evaluator: E,
    params: SearchParams,
    book: Option<OpeningBook>,
    stop: Arc<AtomicBool>,
}

impl<E: Evaluator> SearchPlayer<E> {
    #[must_use]
    pub fn new(ctx: EngineContext, evaluator: E, params: SearchParams) -> Self {
        SearchPlayer {
            ctx,
            evaluator,
            params,
            book: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = Some(book);
        self
    }

    /// Flag that ends a running search. It stays set until the caller
    /// clears it.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    #[must_use]
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    fn book_move(&mut self, pos: &Position) -> Option<Move> {
        let candidates = self.book.as_ref()?.candidates(pos);
        let mv = candidates.choose(self.ctx.rng_mut()).copied()?;
        debug!("book move {mv} out of {}", candidates.len());
        Some(mv)
    }
}

impl<E: Evaluator> Player for SearchPlayer<E> {
    fn next_move(&mut self, pos: &Position) -> Option<Move> {
        let mut pos = pos.clone();
        self.ctx.adopt(&mut pos);
        if let Some(mv) = self.book_move(&pos) {
            return Some(mv);
        }
        match self.ctx.search(&mut pos, &self.evaluator, &self.params, &self.stop) {
            Ok(SearchOutcome::BestMove(report)) => Some(report.best_move),
            Ok(SearchOutcome::Checkmated | SearchOutcome::Stalemate) => None,
            Err(err) => {
                error!("search failed: {err}");
                None
            }
        }
    }
}
