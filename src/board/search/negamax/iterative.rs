use super::super::constants::{INFINITY, MATE_THRESHOLD};
use super::super::line::SearchLine;
use super::super::log::IterationInfo;
use super::super::SearchReport;
use super::{Node, Searcher};
use crate::board::error::PositionError;
use crate::board::Move;

/// Last iteration that ran to completion.
struct Completed {
    best_move: Move,
    score: i32,
    depth: u32,
    line: SearchLine,
}

impl Searcher<'_> {
    /// Iterative deepening from depth 1 to the configured last depth.
    ///
    /// An iteration cut short by the clock or the stop flag is thrown away.
    /// With no completed iteration `fallback` is played.
    pub(in super::super) fn iterative_deepening(
        &mut self,
        fallback: Move,
    ) -> Result<SearchReport, PositionError> {
        self.tables.reset();
        let mut completed: Option<Completed> = None;
        let mut iterations = Vec::new();

        for depth in 1..=self.params.last_depth() {
            self.iteration_depth = depth;
            if self.past_baseline() && self.start.elapsed() >= self.params.time_budget {
                break;
            }

            self.root_best = None;
            let mut line = SearchLine::new();
            let score = self.negamax(depth as i32, -INFINITY, INFINITY, Node::root(), &mut line)?;
            if self.cancelled {
                break;
            }
            let Some(best_move) = self.root_best else {
                break;
            };

            let info = IterationInfo {
                depth,
                score,
                nodes: self.stats.nodes(),
                elapsed: self.start.elapsed(),
                line: line.to_string(),
            };
            info.log();
            iterations.push(info);
            completed = Some(Completed {
                best_move,
                score,
                depth,
                line,
            });

            // a forced mate for us will not get better with depth
            if score >= MATE_THRESHOLD {
                break;
            }
        }

        let report = match completed {
            Some(done) => SearchReport {
                best_move: done.best_move,
                score: done.score,
                depth: done.depth,
                interrupted: self.cancelled,
                line: done.line,
                stats: self.stats,
                elapsed: self.start.elapsed(),
                iterations,
            },
            None => SearchReport {
                best_move: fallback,
                score: 0,
                depth: 0,
                interrupted: true,
                line: SearchLine::new(),
                stats: self.stats,
                elapsed: self.start.elapsed(),
                iterations,
            },
        };
        Ok(report)
    }
}
