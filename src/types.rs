//! Shared types for the GRIDBOT agent.
//!
//! These types form the data model used across all modules. They are
//! designed to be stable so that transport, strategy, and engine modules
//! can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One addressable position in the game's 1-D index space, with the score
/// observed there (if any).
///
/// Cells are immutable: a fresh `Cell` is created on every observation
/// rather than mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub index: u32,
    pub score: Option<i64>,
}

impl Cell {
    /// A cell that has not been scored yet.
    pub fn unscored(index: u32) -> Self {
        Self { index, score: None }
    }

    /// A cell with an observed score.
    pub fn scored(index: u32, score: i64) -> Self {
        Self {
            index,
            score: Some(score),
        }
    }

    /// Whether a score has been observed for this cell.
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.score {
            Some(s) => write!(f, "#{} (score {s})", self.index),
            None => write!(f, "#{} (unscored)", self.index),
        }
    }
}

// ---------------------------------------------------------------------------
// Server statuses
// ---------------------------------------------------------------------------

/// Status word returned by the game server for a move.
///
/// Wire words are `OK`, `GameOver`, and `YouWin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveStatus {
    Ok,
    GameOver,
    YouWin,
}

impl MoveStatus {
    /// Whether this status ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveStatus::GameOver | MoveStatus::YouWin)
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveStatus::Ok => write!(f, "OK"),
            MoveStatus::GameOver => write!(f, "GameOver"),
            MoveStatus::YouWin => write!(f, "YouWin"),
        }
    }
}

impl std::str::FromStr for MoveStatus {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(MoveStatus::Ok),
            "GameOver" => Ok(MoveStatus::GameOver),
            "YouWin" => Ok(MoveStatus::YouWin),
            other => Err(RobotError::MalformedResponse(format!(
                "unknown move status word: {other:?}"
            ))),
        }
    }
}

/// Status word returned by the game server for an init request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitStatus {
    Ok,
    GameOver,
}

impl fmt::Display for InitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStatus::Ok => write!(f, "OK"),
            InitStatus::GameOver => write!(f, "GameOver"),
        }
    }
}

impl std::str::FromStr for InitStatus {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(InitStatus::Ok),
            "GameOver" => Ok(InitStatus::GameOver),
            other => Err(RobotError::MalformedResponse(format!(
                "unknown init status word: {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Move outcome
// ---------------------------------------------------------------------------

/// What the server reported for a single move.
///
/// `score` is the server's cumulative game score when the status permits,
/// and `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub status: MoveStatus,
    pub score: i64,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (score {})", self.status, self.score)
    }
}

// ---------------------------------------------------------------------------
// Run status & outcome
// ---------------------------------------------------------------------------

/// Status of a run as it progresses, tracked once per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// No move has been answered yet.
    Pending,
    Ok,
    GameOver,
    YouWin,
}

impl RunStatus {
    /// Whether the server ended the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::GameOver | RunStatus::YouWin)
    }
}

impl From<MoveStatus> for RunStatus {
    fn from(status: MoveStatus) -> Self {
        match status {
            MoveStatus::Ok => RunStatus::Ok,
            MoveStatus::GameOver => RunStatus::GameOver,
            MoveStatus::YouWin => RunStatus::YouWin,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "Pending"),
            RunStatus::Ok => write!(f, "OK"),
            RunStatus::GameOver => write!(f, "GameOver"),
            RunStatus::YouWin => write!(f, "YouWin"),
        }
    }
}

/// How a finished run is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The server ended the game.
    GameOver,
    /// The agent won.
    YouWin,
    /// The move budget ran out without a terminal status from the server.
    Exhausted,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::GameOver => write!(f, "GAME OVER"),
            RunOutcome::YouWin => write!(f, "YOU WIN"),
            RunOutcome::Exhausted => write!(f, "EXHAUSTED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Summary of a completed run, returned by `Robot::run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub agent_name: String,
    pub outcome: RunOutcome,
    pub final_score: i64,
    pub moves_taken: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Wall-clock duration of the run.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | score={} moves={} took={}ms [{}]",
            self.agent_name,
            self.outcome,
            self.final_score,
            self.moves_taken,
            self.duration().num_milliseconds(),
            self.run_id,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for GRIDBOT.
#[derive(Debug, thiserror::Error)]
pub enum RobotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
