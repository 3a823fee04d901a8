//! Run loop.
//!
//! Drives the interaction for up to `total_moves` rounds: ask the selector
//! for a target, hand it to the transport, feed the scored delta back into
//! the selector, and classify the outcome. One move is in flight at a time;
//! the next is only issued after the previous round-trip completes.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::strategy::CellSelector;
use crate::transport::GameTransport;
use crate::types::{InitStatus, MoveStatus, RunOutcome, RunReport, RunStatus};

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// Per-run mutable state, created at run start and discarded with the run.
#[derive(Debug, Clone)]
struct RunState {
    accumulated_score: i64,
    last_observed_score: i64,
    status: RunStatus,
    moves_taken: u32,
}

impl RunState {
    fn new() -> Self {
        Self {
            accumulated_score: 0,
            last_observed_score: 0,
            status: RunStatus::Pending,
            moves_taken: 0,
        }
    }

    /// Classify the finished run. A run that never saw a terminal status
    /// from the server ran out of its move budget.
    fn outcome(&self) -> RunOutcome {
        match self.status {
            RunStatus::GameOver => RunOutcome::GameOver,
            RunStatus::YouWin => RunOutcome::YouWin,
            RunStatus::Pending | RunStatus::Ok => RunOutcome::Exhausted,
        }
    }
}

// ---------------------------------------------------------------------------
// Robot
// ---------------------------------------------------------------------------

/// The autonomous agent: one selector, one transport, one run at a time.
///
/// Instances share no state; a fleet of robots is one `Robot` per task.
pub struct Robot<T: GameTransport> {
    name: String,
    transport: T,
    selector: CellSelector,
}

impl<T: GameTransport> Robot<T> {
    pub fn new(name: impl Into<String>, transport: T, selector: CellSelector) -> Self {
        Self {
            name: name.into(),
            transport,
            selector,
        }
    }

    /// The selector, for inspection after a run.
    pub fn selector(&self) -> &CellSelector {
        &self.selector
    }

    /// The transport, for inspection after a run.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Play one game of at most `total_moves` moves.
    ///
    /// Transport failures abort the run and propagate to the caller;
    /// they are never swallowed or reinterpreted as a game outcome.
    pub async fn run(&mut self, total_moves: u32) -> Result<RunReport> {
        let started_at = Utc::now();
        let mut state = RunState::new();

        info!(agent = %self.name, total_moves, "Initializing game");
        if self.transport.init(&self.name).await? == InitStatus::GameOver {
            warn!(agent = %self.name, "Server refused init: game over before any move");
            state.status = RunStatus::GameOver;
            return Ok(self.report(&state, started_at));
        }

        for _ in 0..total_moves {
            let target = self.selector.next();
            let outcome = self.transport.move_to(&self.name, target).await?;

            state.status = outcome.status.into();
            state.moves_taken += 1;

            match outcome.status {
                MoveStatus::GameOver => {
                    warn!(
                        agent = %self.name,
                        target,
                        moves = state.moves_taken,
                        "Game over"
                    );
                    break;
                }
                MoveStatus::YouWin => {
                    state.accumulated_score += outcome.score;
                    info!(
                        agent = %self.name,
                        target,
                        score = state.accumulated_score,
                        "Won the game"
                    );
                    break;
                }
                MoveStatus::Ok => {
                    let delta = outcome.score - state.last_observed_score;
                    self.selector.register_score(target, delta);
                    state.last_observed_score = outcome.score;
                    // The server reports a cumulative figure; mirror it
                    // rather than summing deltas.
                    state.accumulated_score = outcome.score;
                    debug!(
                        agent = %self.name,
                        target,
                        delta,
                        score = outcome.score,
                        "Move scored"
                    );
                }
            }
        }

        Ok(self.report(&state, started_at))
    }

    fn report(&self, state: &RunState, started_at: DateTime<Utc>) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            agent_name: self.name.clone(),
            outcome: state.outcome(),
            final_score: state.accumulated_score,
            moves_taken: state.moves_taken,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
