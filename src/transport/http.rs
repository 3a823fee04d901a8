//! HTTP game server client.
//!
//! Issues GET requests against the configured base URL and parses the
//! plain-text reply: the first whitespace-separated token is the status
//! word (`OK` | `GameOver` | `YouWin`), the optional second token is the
//! cumulative score (absent means 0). Anything else is a malformed
//! response and fails the run.
//!
//! Move requests are paced: consecutive moves are spaced at least
//! `min_move_interval_ms` apart so the agent never hammers the server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::url::UrlBuilder;
use super::GameTransport;
use crate::config::ServerConfig;
use crate::types::{InitStatus, MoveOutcome, MoveStatus, RobotError};

/// HTTP implementation of `GameTransport`.
pub struct HttpTransport {
    http: Client,
    urls: UrlBuilder,
    min_move_interval: Duration,
    /// Instant of the most recent move request, for pacing.
    last_move_at: Mutex<Option<Instant>>,
}

impl HttpTransport {
    pub fn new(cfg: &ServerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .user_agent("GRIDBOT/0.1.0 (game-agent)")
            .build()
            .context("Failed to build HTTP client for the game server")?;

        Ok(Self {
            http,
            urls: UrlBuilder::new(cfg.base_url.clone()),
            min_move_interval: Duration::from_millis(cfg.min_move_interval_ms),
            last_move_at: Mutex::new(None),
        })
    }

    // -- Internal helpers ------------------------------------------------

    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Requesting game server");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("Game server request failed")?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RobotError::Server { status, body }.into());
        }

        resp.text()
            .await
            .context("Failed to read game server response body")
    }

    /// Wait until at least `min_move_interval` has passed since the last
    /// move request, then stamp the current one.
    async fn pace_moves(&self) {
        let mut last = self.last_move_at.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_move_interval {
                tokio::time::sleep(self.min_move_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

// -- Response parsing ---------------------------------------------------

fn parse_init_response(body: &str) -> Result<InitStatus, RobotError> {
    body.split_whitespace()
        .next()
        .ok_or_else(|| RobotError::MalformedResponse("empty init response".to_string()))?
        .parse()
}

fn parse_move_response(body: &str) -> Result<MoveOutcome, RobotError> {
    let mut tokens = body.split_whitespace();

    let status: MoveStatus = tokens
        .next()
        .ok_or_else(|| RobotError::MalformedResponse("empty move response".to_string()))?
        .parse()?;

    let score = match tokens.next() {
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            RobotError::MalformedResponse(format!("non-numeric score: {raw:?}"))
        })?,
        None => 0,
    };

    Ok(MoveOutcome { status, score })
}

#[async_trait]
impl GameTransport for HttpTransport {
    async fn init(&self, agent_name: &str) -> Result<InitStatus> {
        let body = self.fetch_text(&self.urls.init_url(agent_name)).await?;
        let status = parse_init_response(&body)?;
        debug!(agent = agent_name, status = %status, "Init reply");
        Ok(status)
    }

    async fn move_to(&self, agent_name: &str, target_index: u32) -> Result<MoveOutcome> {
        self.pace_moves().await;

        let body = self
            .fetch_text(&self.urls.move_url(agent_name, target_index))
            .await?;
        let outcome = parse_move_response(&body)?;
        debug!(agent = agent_name, target_index, outcome = %outcome, "Move reply");
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
