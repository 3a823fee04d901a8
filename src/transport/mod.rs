//! Game server transport.
//!
//! Defines the `GameTransport` trait (the only boundary the core engine
//! depends on) and provides the HTTP implementation that talks to the
//! remote game server.

pub mod http;
pub mod url;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{InitStatus, MoveOutcome};

/// Abstraction over the game server.
///
/// Implementors answer an init request and score individual moves. Any
/// transport failure (network, HTTP, malformed reply) is surfaced as an
/// error and is fatal for the current run; the engine never retries or
/// reinterprets it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameTransport: Send + Sync {
    /// Register the agent for a new game.
    async fn init(&self, agent_name: &str) -> Result<InitStatus>;

    /// Move the agent to `target_index` and report the resulting status
    /// and cumulative score.
    async fn move_to(&self, agent_name: &str, target_index: u32) -> Result<MoveOutcome>;
}
