//! Static evaluation contract.
//!
//! The search only needs a White-positive centipawn score and an endgame
//! flag; anything that can produce those plugs in as an [`Evaluator`].

use crate::board::{Color, Piece, Position};

/// Material per side (kings and pawns excluded) at or below which
/// [`MaterialEvaluator`] reports an endgame.
pub const ENDGAME_MATERIAL: i32 = 1400;

/// A static score with its named components.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Centipawns, positive when White is better
    pub score: i32,
    pub breakdown: Vec<(&'static str, i32)>,
}

impl Evaluation {
    #[must_use]
    pub fn new(score: i32) -> Self {
        Evaluation {
            score,
            breakdown: Vec::new(),
        }
    }

    /// Add a named term to the score.
    #[must_use]
    pub fn with_term(mut self, name: &'static str, value: i32) -> Self {
        self.score += value;
        self.breakdown.push((name, value));
        self
    }

    /// Score from `color`'s point of view
    #[must_use]
    pub fn relative_to(&self, color: Color) -> i32 {
        self.score * color.sign()
    }
}

/// Scores positions for the search.
///
/// Implementations must be color symmetric: mirroring the board and
/// swapping colors negates the score.
pub trait Evaluator {
    fn evaluate(&self, pos: &Position) -> Evaluation;

    /// Whether the position should be treated as an endgame by move
    /// ordering and quiescence pruning.
    fn is_endgame(&self, pos: &Position) -> bool;
}

/// Counts material and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    fn officers(pos: &Position, color: Color) -> i32 {
        pos.material(color) - Piece::Pawn.value() * pos.pieces_of(Piece::Pawn, color).popcount() as i32
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &Position) -> Evaluation {
        let pawns = |color| Piece::Pawn.value() * pos.pieces_of(Piece::Pawn, color).popcount() as i32;
        Evaluation::default()
            .with_term("pawns", pawns(Color::White) - pawns(Color::Black))
            .with_term(
                "pieces",
                Self::officers(pos, Color::White) - Self::officers(pos, Color::Black),
            )
    }

    fn is_endgame(&self, pos: &Position) -> bool {
        Color::BOTH
            .iter()
            .all(|&c| Self::officers(pos, c) <= ENDGAME_MATERIAL)
    }
}
