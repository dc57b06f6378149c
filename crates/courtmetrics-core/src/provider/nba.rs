// stats.nba.com client.
//
// The v2 endpoints (scoreboardv2, leaguegamefinder, playergamelog) answer
// with `resultSets: [{ name, headers, rowSet }]`; we keep the first set. The
// v3 box score nests players under `boxScoreTraditional.{homeTeam,awayTeam}`
// and is flattened here to one row per player.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as TimeSpan, NaiveDate, Utc, Weekday};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::model::{PlayerId, TeamId};
use crate::provider::{ProviderError, StatsProvider};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const LEAGUE_ID: &str = "00";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Columns produced when flattening a v3 box score, in output order.
const BOX_SCORE_COLUMNS: &[&str] = &[
    "gameId",
    "teamId",
    "teamTricode",
    "personId",
    "firstName",
    "familyName",
    "position",
    "minutes",
    "fieldGoalsMade",
    "fieldGoalsAttempted",
    "threePointersMade",
    "threePointersAttempted",
    "freeThrowsMade",
    "freeThrowsAttempted",
    "reboundsOffensive",
    "reboundsDefensive",
    "reboundsTotal",
    "assists",
    "steals",
    "blocks",
    "turnovers",
    "foulsPersonal",
    "points",
    "plusMinusPoints",
];

// ---------------------------------------------------------------------------
// NbaStatsClient
// ---------------------------------------------------------------------------

/// HTTP client for the stats.nba.com endpoints.
pub struct NbaStatsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NbaStatsClient {
    /// Build a client with browser-like headers; stats.nba.com rejects bare
    /// requests.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
        headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(NbaStatsClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        NbaStatsClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, ?params, "provider request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport { url: url.clone(), source: e })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url));
        }
        if !status.is_success() {
            return Err(ProviderError::Status { url, status: status.as_u16() });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl StatsProvider for NbaStatsClient {
    async fn scoreboard(&self, date: NaiveDate) -> Result<Table, ProviderError> {
        let params = [
            ("GameDate", date.format("%Y-%m-%d").to_string()),
            ("LeagueID", LEAGUE_ID.to_string()),
            ("DayOffset", "0".to_string()),
        ];
        let body = self.get_json("scoreboardv2", &params).await?;
        parse_result_set(&body, "scoreboardv2")
    }

    async fn game_finder(&self, team_id: TeamId, vs_team_id: TeamId) -> Result<Table, ProviderError> {
        let params = [
            ("PlayerOrTeam", "T".to_string()),
            ("TeamID", team_id.to_string()),
            ("VsTeamID", vs_team_id.to_string()),
            ("LeagueID", LEAGUE_ID.to_string()),
        ];
        let body = self.get_json("leaguegamefinder", &params).await?;
        parse_result_set(&body, "leaguegamefinder")
    }

    async fn box_score(&self, game_id: &str) -> Result<Table, ProviderError> {
        let params = [
            ("GameID", game_id.to_string()),
            ("StartPeriod", "0".to_string()),
            ("EndPeriod", "0".to_string()),
            ("StartRange", "0".to_string()),
            ("EndRange", "0".to_string()),
            ("RangeType", "0".to_string()),
        ];
        let body = self.get_json("boxscoretraditionalv3", &params).await?;
        flatten_box_score(&body)
    }

    async fn player_game_log(&self, player_id: PlayerId, season: &str) -> Result<Table, ProviderError> {
        let params = [
            ("PlayerID", player_id.to_string()),
            ("Season", season.to_string()),
            ("SeasonType", "Regular Season".to_string()),
            ("LeagueID", LEAGUE_ID.to_string()),
        ];
        let body = self.get_json("playergamelog", &params).await?;
        parse_result_set(&body, "playergamelog")
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawResultSets {
    #[serde(rename = "resultSets", alias = "resultSet")]
    result_sets: ResultSetsField,
}

/// Some endpoints send a list of sets, others a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultSetsField {
    Many(Vec<RawResultSet>),
    One(RawResultSet),
}

#[derive(Debug, Deserialize)]
struct RawResultSet {
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

/// Extract the first result set of a v2 endpoint response.
pub fn parse_result_set(body: &Value, endpoint: &str) -> Result<Table, ProviderError> {
    let raw = RawResultSets::deserialize(body).map_err(|e| ProviderError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;
    let first = match raw.result_sets {
        ResultSetsField::Many(sets) => sets.into_iter().next(),
        ResultSetsField::One(set) => Some(set),
    };
    let set = first.ok_or_else(|| ProviderError::Decode {
        endpoint: endpoint.to_string(),
        message: "response has no result sets".into(),
    })?;
    Ok(Table::new(set.headers, set.row_set))
}

/// Flatten a boxscoretraditionalv3 response into one row per player.
pub fn flatten_box_score(body: &Value) -> Result<Table, ProviderError> {
    let decode_err = |message: &str| ProviderError::Decode {
        endpoint: "boxscoretraditionalv3".into(),
        message: message.to_string(),
    };

    let root = body
        .get("boxScoreTraditional")
        .and_then(Value::as_object)
        .ok_or_else(|| decode_err("missing boxScoreTraditional"))?;
    let game_id = root.get("gameId").cloned().unwrap_or(Value::Null);

    let mut rows = Vec::new();
    for side in ["homeTeam", "awayTeam"] {
        let Some(team) = root.get(side).and_then(Value::as_object) else {
            continue;
        };
        let team_id = team.get("teamId").cloned().unwrap_or(Value::Null);
        let tricode = team.get("teamTricode").cloned().unwrap_or(Value::Null);
        let players = team.get("players").and_then(Value::as_array);
        for player in players.into_iter().flatten() {
            let Some(player) = player.as_object() else {
                continue;
            };
            rows.push(player_row(&game_id, &team_id, &tricode, player));
        }
    }

    let headers = BOX_SCORE_COLUMNS.iter().map(|c| c.to_string()).collect();
    Ok(Table::new(headers, rows))
}

fn player_row(game_id: &Value, team_id: &Value, tricode: &Value, player: &Map<String, Value>) -> Vec<Value> {
    let stats = player.get("statistics").and_then(Value::as_object);
    BOX_SCORE_COLUMNS
        .iter()
        .map(|&col| match col {
            "gameId" => game_id.clone(),
            "teamId" => team_id.clone(),
            "teamTricode" => tricode.clone(),
            "personId" | "firstName" | "familyName" | "position" => {
                player.get(col).cloned().unwrap_or(Value::Null)
            }
            _ => stats
                .and_then(|s| s.get(col))
                .cloned()
                .unwrap_or(Value::Null),
        })
        .collect()
}

/// Season label for a date; seasons start in October ("2023-24").
pub fn season_for(date: NaiveDate) -> String {
    let start = if date.month() >= 10 { date.year() } else { date.year() - 1 };
    format!("{}-{:02}", start, (start + 1) % 100)
}

/// The slate date at `now`. NBA schedules are dated in US Eastern time.
pub fn slate_date(now: DateTime<Utc>) -> NaiveDate {
    let offset = if eastern_daylight(now) { 4 } else { 5 };
    (now - TimeSpan::hours(offset)).date_naive()
}

/// Daylight time runs from 02:00 local on the second Sunday of March to
/// 02:00 local on the first Sunday of November.
fn eastern_daylight(now: DateTime<Utc>) -> bool {
    let year = now.year();
    let switch = |month, nth, utc_hour| {
        NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, nth)
            .and_then(|day| day.and_hms_opt(utc_hour, 0, 0))
            .map(|at| at.and_utc())
    };
    match (switch(3, 2, 7), switch(11, 1, 6)) {
        (Some(start), Some(end)) => now >= start && now < end,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
