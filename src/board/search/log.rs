use std::fmt;
use std::time::Duration;

use log::debug;

use super::constants::{MATE_SCORE, MATE_THRESHOLD};

/// Summary of one completed iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationInfo {
    pub depth: u32,
    /// Side-to-move relative centipawns
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub line: String,
}

impl IterationInfo {
    /// Moves to mate (positive: we mate, negative: we are mated)
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        if self.score.abs() < MATE_THRESHOLD {
            None
        } else if self.score > 0 {
            Some((MATE_SCORE - self.score + 1) / 2)
        } else {
            Some(-(MATE_SCORE + self.score + 1) / 2)
        }
    }

    pub(crate) fn log(&self) {
        debug!("{self}");
    }
}

impl fmt::Display for IterationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth {} score ", self.depth)?;
        match self.mate_in() {
            Some(n) => write!(f, "mate {n}")?,
            None => write!(f, "cp {}", self.score)?,
        }
        write!(
            f,
            " nodes {} time {} pv {}",
            self.nodes,
            self.elapsed.as_millis(),
            self.line
        )
    }
}
