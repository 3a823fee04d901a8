//! Cell selection heuristic.
//!
//! `next()` prefers the best-scoring cell recorded so far when it is worth
//! revisiting; otherwise it advances an independent scan cursor by a fixed
//! stride, wrapping modularly into the board range. Selection always
//! terminates: the scan is bounded to one full sweep, after which the
//! validity filter is relaxed and the least-bad recorded cell is accepted.
//!
//! All heuristic state lives in the selector instance; nothing is global,
//! so independent runs in the same process cannot interfere.

use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::types::{Cell, RobotError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default exploration step size.
pub const DEFAULT_SCAN_STRIDE: u32 = 15;

/// Default minimum recorded score for a cell to be worth revisiting.
pub const DEFAULT_MIN_SCORE_TO_REVISIT: i64 = 15;

/// Tunables for `CellSelector`.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub min_index: u32,
    pub max_index: u32,
    pub scan_stride: u32,
    pub min_score_to_revisit: i64,
}

impl SelectorConfig {
    /// Config over `[min_index, max_index]` with default tunables.
    pub fn new(min_index: u32, max_index: u32) -> Self {
        Self {
            min_index,
            max_index,
            scan_stride: DEFAULT_SCAN_STRIDE,
            min_score_to_revisit: DEFAULT_MIN_SCORE_TO_REVISIT,
        }
    }

    fn validate(&self) -> Result<(), RobotError> {
        if self.min_index > self.max_index {
            return Err(RobotError::Config(format!(
                "min_index ({}) must not exceed max_index ({})",
                self.min_index, self.max_index
            )));
        }
        if self.scan_stride == 0 {
            return Err(RobotError::Config(
                "scan_stride must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of addressable cells.
    fn span(&self) -> u32 {
        self.max_index - self.min_index + 1
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Picks the next cell to visit from accumulated score feedback.
///
/// Owned by exactly one run; created fresh per run and discarded with it.
pub struct CellSelector {
    config: SelectorConfig,
    /// Most recently observed score per cell index. Keys stay within the
    /// board range: only indices produced by `next()` are ever registered.
    scores: HashMap<u32, i64>,
    last_visited: Cell,
    /// Exploration cursor, independent of `last_visited`.
    scan_cursor: u32,
}

impl CellSelector {
    /// Create a selector over the configured board range.
    ///
    /// Fails fast on an inverted range or a zero stride; a zero stride
    /// would pin the scan in place forever.
    pub fn new(config: SelectorConfig) -> Result<Self, RobotError> {
        config.validate()?;
        Ok(Self {
            last_visited: Cell::unscored(config.min_index),
            scan_cursor: config.min_index,
            scores: HashMap::new(),
            config,
        })
    }

    /// Pick the next cell index to visit. Always in range, always returns.
    pub fn next(&mut self) -> u32 {
        let chosen = match self.exploitation_candidate() {
            Some(index) => {
                debug!(index, "Revisiting high-score cell");
                index
            }
            None => self.scan(),
        };

        self.last_visited = match self.scores.get(&chosen) {
            Some(&score) => Cell::scored(chosen, score),
            None => Cell::unscored(chosen),
        };
        chosen
    }

    /// Record the score observed at `index`, overwriting any previous
    /// observation. Registering the same pair twice is a no-op.
    pub fn register_score(&mut self, index: u32, score: i64) {
        self.scores.insert(index, score);
        self.last_visited = Cell::scored(index, score);
        trace!(index, score, "Score registered");
    }

    /// The most recently visited or registered cell.
    pub fn last_visited(&self) -> Cell {
        self.last_visited
    }

    /// The score recorded for `index`, if any.
    pub fn recorded_score(&self, index: u32) -> Option<i64> {
        self.scores.get(&index).copied()
    }

    /// Number of cells with a recorded score.
    pub fn recorded_cells(&self) -> usize {
        self.scores.len()
    }

    // -- Exploitation ----------------------------------------------------

    /// The best-scoring recorded cell, if it differs from the last visit
    /// and is worth revisiting. Ties on score go to the lowest index so
    /// selection is deterministic.
    fn exploitation_candidate(&self) -> Option<u32> {
        let (&index, _) = self
            .scores
            .iter()
            .max_by_key(|&(&index, &score)| (score, Reverse(index)))?;

        (index != self.last_visited.index && self.is_valid(index)).then_some(index)
    }

    // -- Exploration -----------------------------------------------------

    /// Advance the scan cursor until a valid cell turns up, bounded to one
    /// full sweep of the board. A starved sweep relaxes the validity
    /// filter and settles for the least-bad recorded cell.
    fn scan(&mut self) -> u32 {
        for _ in 0..self.config.span() {
            self.scan_cursor = self.advance(self.scan_cursor);
            if self.is_valid(self.scan_cursor) {
                return self.scan_cursor;
            }
        }

        let fallback = self.least_bad_cell().unwrap_or(self.scan_cursor);
        debug!(index = fallback, "Scan starved; relaxing validity filter");
        fallback
    }

    /// One stride forward, wrapped modularly into the board range.
    fn advance(&self, cursor: u32) -> u32 {
        let span = u64::from(self.config.span());
        let offset = u64::from(cursor - self.config.min_index);
        let stride = u64::from(self.config.scan_stride);
        self.config.min_index + ((offset + stride) % span) as u32
    }

    /// A cell is valid when it is on the board and either unexplored or
    /// recorded at or above the revisit threshold.
    fn is_valid(&self, index: u32) -> bool {
        if index < self.config.min_index || index > self.config.max_index {
            return false;
        }
        match self.scores.get(&index) {
            Some(&score) => score >= self.config.min_score_to_revisit,
            None => true,
        }
    }

    /// Lowest-scoring recorded cell (ties to the lowest index).
    fn least_bad_cell(&self) -> Option<u32> {
        self.scores
            .iter()
            .min_by_key(|&(&index, &score)| (score, index))
            .map(|(&index, _)| index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_selector(min: u32, max: u32) -> CellSelector {
        CellSelector::new(SelectorConfig::new(min, max)).unwrap()
    }

    fn make_selector_with_stride(min: u32, max: u32, stride: u32) -> CellSelector {
        CellSelector::new(SelectorConfig {
            scan_stride: stride,
            ..SelectorConfig::new(min, max)
        })
        .unwrap()
    }

    // -- Construction ----------------------------------------------------

    #[test]
    fn test_inverted_range_rejected() {
        assert!(CellSelector::new(SelectorConfig::new(10, 5)).is_err());
    }

    #[test]
    fn test_zero_stride_rejected() {
        let config = SelectorConfig {
            scan_stride: 0,
            ..SelectorConfig::new(0, 100)
        };
        assert!(CellSelector::new(config).is_err());
    }

    #[test]
    fn test_single_cell_board_is_allowed() {
        let mut selector = make_selector(5, 5);
        assert_eq!(selector.next(), 5);
        assert_eq!(selector.next(), 5);
    }

    // -- Exploration -----------------------------------------------------

    #[test]
    fn test_first_scans_walk_the_stride() {
        let mut selector = make_selector(0, 100);
        let picks: Vec<u32> = (0..5).map(|_| selector.next()).collect();
        assert_eq!(picks, vec![15, 30, 45, 60, 75]);
    }

    #[test]
    fn test_scan_wraps_modularly_into_range() {
        let mut selector = make_selector(0, 100);
        let picks: Vec<u32> = (0..7).map(|_| selector.next()).collect();
        // 90 + 15 wraps to (90 + 15) % 101 = 4
        assert_eq!(picks, vec![15, 30, 45, 60, 75, 90, 4]);
    }

    #[test]
    fn test_scan_respects_offset_range() {
        let mut selector = make_selector_with_stride(10, 19, 3);
        let picks: Vec<u32> = (0..4).map(|_| selector.next()).collect();
        assert_eq!(picks, vec![13, 16, 19, 12]);
    }

    #[test]
    fn test_next_always_in_range() {
        let mut selector = make_selector(0, 100);
        for i in 0..999i64 {
            let index = selector.next();
            assert!((0..=100).contains(&index), "index {index} out of range");
            // Mixed feedback: some cells worth revisiting, most not.
            selector.register_score(index, (i * 7) % 40 - 10);
        }
    }

    #[test]
    fn test_never_returns_same_cell_twice_in_a_row() {
        let mut selector = make_selector_with_stride(0, 100, 1);
        let mut previous = selector.next();
        for _ in 0..500 {
            let current = selector.next();
            assert_ne!(current, previous);
            previous = current;
        }
    }

    // -- Exploitation ----------------------------------------------------

    #[test]
    fn test_exploitation_beats_exploration() {
        let mut selector = make_selector(0, 100);
        selector.register_score(30, 50);
        selector.register_score(75, 20);
        assert_eq!(selector.last_visited().index, 75);

        assert_eq!(selector.next(), 30);
    }

    #[test]
    fn test_exploitation_skips_last_visited_cell() {
        let mut selector = make_selector(0, 100);
        selector.register_score(30, 50);
        // 30 is the best cell but was just visited, so the scan decides.
        assert_eq!(selector.next(), 15);
    }

    #[test]
    fn test_best_cell_below_threshold_not_revisited() {
        let mut selector = make_selector_with_stride(0, 100, 1);
        selector.scores = HashMap::from([(2, 0), (3, 0)]);
        selector.scan_cursor = 1;
        selector.last_visited = Cell::scored(1, 5);

        assert_eq!(selector.next(), 4);
    }

    #[test]
    fn test_cells_below_custom_threshold_skipped() {
        let mut selector = CellSelector::new(SelectorConfig {
            scan_stride: 1,
            min_score_to_revisit: 12,
            ..SelectorConfig::new(0, 100)
        })
        .unwrap();
        selector.scores = HashMap::from([(2, 8), (3, 10)]);
        selector.scan_cursor = 1;
        selector.last_visited = Cell::scored(1, 5);

        assert_eq!(selector.next(), 4);
    }

    #[test]
    fn test_score_at_threshold_is_revisited() {
        let mut selector = make_selector(0, 100);
        selector.register_score(30, DEFAULT_MIN_SCORE_TO_REVISIT);
        selector.register_score(75, 5);

        assert_eq!(selector.next(), 30);
    }

    #[test]
    fn test_max_score_tie_breaks_to_lowest_index() {
        let mut selector = make_selector(0, 100);
        selector.scores = HashMap::from([(40, 50), (10, 50), (90, 20)]);
        selector.last_visited = Cell::scored(90, 20);

        assert_eq!(selector.next(), 10);
    }

    // -- Starvation ------------------------------------------------------

    #[test]
    fn test_starved_scan_terminates_with_least_bad_cell() {
        let mut selector = make_selector_with_stride(0, 2, 1);
        selector.register_score(0, 1);
        selector.register_score(1, 2);
        selector.register_score(2, 0);

        // Every cell is recorded below the revisit threshold; one full
        // sweep finds nothing, so the lowest-scoring cell is accepted.
        assert_eq!(selector.next(), 2);
    }

    #[test]
    fn test_starved_scan_tie_breaks_to_lowest_index() {
        let mut selector = make_selector_with_stride(0, 1, 1);
        selector.register_score(0, 3);
        selector.register_score(1, 3);

        assert_eq!(selector.next(), 0);
    }

    // -- Registration ----------------------------------------------------

    #[test]
    fn test_register_several_cells() {
        let mut selector = make_selector(0, 100);
        selector.register_score(1, 10);
        selector.register_score(2, 30);

        assert_eq!(selector.recorded_cells(), 2);
        assert_eq!(selector.recorded_score(1), Some(10));
        assert_eq!(selector.recorded_score(2), Some(30));
    }

    #[test]
    fn test_register_same_cell_twice_is_idempotent() {
        let mut selector = make_selector(0, 100);
        selector.register_score(1, 10);
        selector.register_score(1, 10);

        assert_eq!(selector.recorded_cells(), 1);
        assert_eq!(selector.recorded_score(1), Some(10));
        assert_eq!(selector.last_visited(), Cell::scored(1, 10));
    }

    #[test]
    fn test_register_overwrites_previous_score() {
        let mut selector = make_selector(0, 100);
        selector.register_score(1, 10);
        selector.register_score(1, 25);

        assert_eq!(selector.recorded_cells(), 1);
        assert_eq!(selector.recorded_score(1), Some(25));
    }

    #[test]
    fn test_register_updates_last_visited() {
        let mut selector = make_selector(0, 100);
        selector.register_score(1, 10);
        selector.register_score(2, 30);

        assert_eq!(selector.last_visited(), Cell::scored(2, 30));
    }

    #[test]
    fn test_next_marks_unexplored_pick_unscored() {
        let mut selector = make_selector(0, 100);
        let index = selector.next();
        assert_eq!(selector.last_visited(), Cell::unscored(index));
    }
}
