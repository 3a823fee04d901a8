//! Game URL construction.
//!
//! The server speaks a flat query-string protocol appended to a base URL:
//! `player=<name>&command=Init` registers an agent and
//! `player=<name>&command=Move&position=<index>` requests a move.

/// Builds request URLs for the game server.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// URL registering `agent_name` for a new game.
    pub fn init_url(&self, agent_name: &str) -> String {
        format!(
            "{}player={}&command=Init",
            self.base_url,
            urlencoding::encode(agent_name),
        )
    }

    /// URL moving `agent_name` to `position`.
    pub fn move_url(&self, agent_name: &str, position: u32) -> String {
        format!(
            "{}player={}&command=Move&position={}",
            self.base_url,
            urlencoding::encode(agent_name),
            position,
        )
    }
}
