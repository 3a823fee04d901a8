//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Validation is fail-fast: a bad board range or a zero scan stride is
//! rejected at load time, never mid-run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::RobotError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub board: BoardConfig,
    #[serde(default)]
    pub selector: SelectorSettings,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Opaque identifier passed through to the game server.
    pub name: String,
    /// Move budget per run.
    pub total_moves: u32,
}

/// The closed index range of the game board.
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub min_index: u32,
    pub max_index: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SelectorSettings {
    /// Exploration step size.
    #[serde(default = "default_scan_stride")]
    pub scan_stride: u32,
    /// Minimum recorded score for a cell to be worth revisiting.
    #[serde(default = "default_min_score_to_revisit")]
    pub min_score_to_revisit: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL the game query string is appended to,
    /// e.g. `http://188.165.135.37:81/game?`.
    pub base_url: String,
    /// Minimum spacing between consecutive move requests.
    #[serde(default = "default_min_move_interval_ms")]
    pub min_move_interval_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_scan_stride() -> u32 {
    15
}

fn default_min_score_to_revisit() -> i64 {
    15
}

fn default_min_move_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            scan_stride: default_scan_stride(),
            min_score_to_revisit: default_min_score_to_revisit(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file: {path}"))
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RobotError> {
        if self.board.min_index > self.board.max_index {
            return Err(RobotError::Config(format!(
                "min_index ({}) must not exceed max_index ({})",
                self.board.min_index, self.board.max_index
            )));
        }
        if self.selector.scan_stride == 0 {
            return Err(RobotError::Config(
                "scan_stride must be at least 1".to_string(),
            ));
        }
        if self.server.base_url.is_empty() {
            return Err(RobotError::Config("base_url must not be empty".to_string()));
        }
        Ok(())
    }
}
