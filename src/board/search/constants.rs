//! Search constants.
//!
//! Scores are centipawns from the side to move's point of view.

use super::super::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Scores with absolute value >= this are considered checkmate scores
pub const MATE_THRESHOLD: i32 = 28000;

/// Score of being mated at the root; a mate `n` plies away scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = MATE_THRESHOLD + MAX_PLY as i32;

/// Initial search window bound, beyond any mate score
pub const INFINITY: i32 = 30000;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. TT > good captures > killers > counter >
// quiets by class > losing captures

/// Hash move (from transposition table) - highest priority
pub const TT_MOVE_SCORE: i32 = 1 << 20;

/// Captures and promotions that do not lose material, plus their SEE
pub const GOOD_CAPTURE_SCORE: i32 = 1 << 18;

/// First killer move (quiet that caused beta cutoff at same remaining depth)
pub const KILLER1_SCORE: i32 = 20000;

/// Second killer move (replaced killer)
pub const KILLER2_SCORE: i32 = 10000;

/// Counter move (quiet that refuted opponent's previous move)
pub const COUNTER_SCORE: i32 = 5000;

/// Quiet move of a knight, bishop or rook; the piece value / 10 is added
pub const MINOR_QUIET_SCORE: i32 = 1000;
pub const QUEEN_QUIET_SCORE: i32 = 800;
pub const PAWN_QUIET_SCORE: i32 = 600;
/// King quiets go first in the endgame and last otherwise
pub const ENDGAME_KING_QUIET_SCORE: i32 = 1200;

/// Captures with negative SEE sort below every quiet move
pub const BAD_CAPTURE_SCORE: i32 = -(1 << 16);

// ============================================================================
// QUIESCENCE
// ============================================================================

/// Quiet checks are tried while fewer than this many moves raised alpha
pub const QUIESCENCE_CHECK_RAISE_LIMIT: u32 = 3;

/// Quiet checks are tried only this many plies into quiescence
pub const QUIESCENCE_CHECK_PLIES: u32 = 2;

