use std::time::Duration;

/// Whether null-move pruning runs.
///
/// There is deliberately no default: null-move pruning is unsound in
/// zugzwang positions, so every caller picks a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NullMove {
    Enabled,
    Disabled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchParams {
    /// Depth always completed; the clock is ignored up to here
    pub baseline_depth: u32,
    /// Deepest iteration when deepening is on
    pub max_depth: u32,
    pub time_budget: Duration,
    /// Keep deepening past the baseline until the budget runs out
    pub iterative: bool,
    pub null_move: NullMove,
    /// Reverse futility margins at remaining depth 1 and 2
    pub rfp_margins: [i32; 2],
    /// Whole-node quiescence delta
    pub big_delta: i32,
    /// Per-capture quiescence delta
    pub move_delta: i32,
    /// Moves searched at full depth before reductions start
    pub lmr_min_moves: u32,
    pub lmr_min_depth: u32,
    /// Null move needs more than this many knights, bishops, rooks and queens
    pub null_min_officers: u32,
    /// Search quiet checks near the top of quiescence
    pub quiescence_checks: bool,
}

impl SearchParams {
    /// Parameters with the given null-move policy: baseline depth 4,
    /// deepening up to 64 plies within 3.5 seconds.
    #[must_use]
    pub fn with_null_move(null_move: NullMove) -> Self {
        SearchParams {
            baseline_depth: 4,
            max_depth: 64,
            time_budget: Duration::from_millis(3500),
            iterative: true,
            null_move,
            rfp_margins: [325, 525],
            big_delta: 975,
            move_delta: 225,
            lmr_min_moves: 4,
            lmr_min_depth: 3,
            null_min_officers: 4,
            quiescence_checks: true,
        }
    }

    /// Search exactly to `depth` with no clock.
    #[must_use]
    pub fn fixed_depth(depth: u32, null_move: NullMove) -> Self {
        SearchParams {
            baseline_depth: depth,
            max_depth: depth,
            iterative: false,
            ..Self::with_null_move(null_move)
        }
    }

    #[must_use]
    pub fn baseline_depth(mut self, depth: u32) -> Self {
        self.baseline_depth = depth;
        self.max_depth = self.max_depth.max(depth);
        self
    }

    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    #[must_use]
    pub fn iterative(mut self, iterative: bool) -> Self {
        self.iterative = iterative;
        self
    }

    #[must_use]
    pub fn quiescence_checks(mut self, enabled: bool) -> Self {
        self.quiescence_checks = enabled;
        self
    }

    /// Last iteration depth this configuration runs.
    #[must_use]
    pub fn last_depth(&self) -> u32 {
        if self.iterative {
            self.max_depth.max(self.baseline_depth)
        } else {
            self.baseline_depth
        }
    }

    #[must_use]
    pub fn null_move_enabled(&self) -> bool {
        self.null_move == NullMove::Enabled
    }

    /// Reverse futility margin for `remaining` plies, if pruning applies.
    #[must_use]
    pub fn rfp_margin(&self, remaining: u32) -> Option<i32> {
        match remaining {
            1 => Some(self.rfp_margins[0]),
            2 => Some(self.rfp_margins[1]),
            _ => None,
        }
    }
}
