// Stats provider seam.
//
// `StatsProvider` is the four-query surface the analysis needs. The
// production implementation talks to stats.nba.com (`nba::NbaStatsClient`);
// tests substitute scripted fakes.

pub mod cache;
pub mod fetch;
pub mod nba;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{PlayerId, TeamId};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error for {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response shape from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ProviderError::NotFound(_))
    }
}

// ---------------------------------------------------------------------------
// StatsProvider
// ---------------------------------------------------------------------------

/// The four provider queries used by the analysis.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Games scheduled on `date` (one row per game).
    async fn scoreboard(&self, date: NaiveDate) -> Result<Table, ProviderError>;

    /// Every game `team_id` played against `vs_team_id`, newest first, one
    /// row per game from `team_id`'s side.
    async fn game_finder(&self, team_id: TeamId, vs_team_id: TeamId) -> Result<Table, ProviderError>;

    /// Traditional box score for `game_id`, one row per player.
    async fn box_score(&self, game_id: &str) -> Result<Table, ProviderError>;

    /// A player's game log for `season` ("2023-24").
    async fn player_game_log(&self, player_id: PlayerId, season: &str) -> Result<Table, ProviderError>;
}
