use tracing::debug;

use crate::error::Result;
use crate::types::{SolvedPayload, Stats};

pub const DEFAULT_BASE_URL: &str = "https://alfa-leetcode-api.onrender.com";

/// Read-only client for the stats provider.
#[derive(Debug, Clone)]
pub struct StatsClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

impl StatsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn solved_url(&self, username: &str) -> String {
        format!("{}/{}/solved", self.base_url, username)
    }

    /// Fetch solved-problem counts for `username`.
    ///
    /// Transport failures surface as `Http`, a non-JSON body as
    /// `Serialization`, and a well-formed response carrying an error
    /// indicator or no solved count as `Upstream`. The three are checked
    /// independently, in that order, on every call.
    pub async fn fetch_solved(&self, username: &str) -> Result<Stats> {
        let url = self.solved_url(username);
        debug!(url = %url, "requesting solved stats");

        let body = self.client.get(&url).send().await?.text().await?;
        let payload: SolvedPayload = serde_json::from_str(&body)?;

        payload.into_stats()
    }
}
