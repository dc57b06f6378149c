// Domain records decoded from provider tables.
//
// Decoders skip rows that lack an identifier or a usable date (with a warn!
// log line) and read missing stat columns as NaN.

use chrono::NaiveDate;
use tracing::warn;

use crate::analysis::minutes::{MinutesRounding, RawMinutes};
use crate::table::{Row, Table};

pub type TeamId = i64;
pub type PlayerId = i64;

// ---------------------------------------------------------------------------
// Venue
// ---------------------------------------------------------------------------

/// Whether a team played at home or on the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn label(self) -> &'static str {
        match self {
            Venue::Home => "(HOME)",
            Venue::Away => "(AWAY)",
        }
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A scheduled or completed game between two teams.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub game_id: String,
    pub date: NaiveDate,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    /// Provider matchup label ("BOS vs. NYK", "20240115/NYKBOS").
    pub matchup: String,
}

impl Game {
    /// Decode a scoreboard `GameHeader` row.
    pub fn from_scoreboard_row(row: &Row<'_>) -> Option<Game> {
        Some(Game {
            game_id: row.text("game_id").filter(|s| !s.is_empty())?,
            date: parse_provider_date(&row.text("game_date_est")?)?,
            home_team_id: row.int("home_team_id")?,
            away_team_id: row.int("visitor_team_id")?,
            matchup: row.text("gamecode").unwrap_or_default(),
        })
    }

    /// Decode a game-finder row. Game-finder rows describe one team's side
    /// of the game; the matchup label tells which side was at home
    /// ("BOS vs. NYK" = BOS hosted, "BOS @ NYK" = BOS travelled).
    pub fn from_finder_row(row: &Row<'_>, opponent_id: TeamId) -> Option<Game> {
        let team_id = row.int("team_id")?;
        let matchup = row.text("matchup").unwrap_or_default();
        let (home_team_id, away_team_id) = if matchup.contains('@') {
            (opponent_id, team_id)
        } else {
            (team_id, opponent_id)
        };
        Some(Game {
            game_id: row.text("game_id").filter(|s| !s.is_empty())?,
            date: parse_provider_date(&row.text("game_date")?)?,
            home_team_id,
            away_team_id,
            matchup,
        })
    }

    /// Which side `team_id` was on in this game.
    pub fn venue_for(&self, team_id: TeamId) -> Venue {
        if team_id == self.home_team_id {
            Venue::Home
        } else {
            Venue::Away
        }
    }
}

/// Decode every scoreboard row, skipping malformed ones.
pub fn games_from_scoreboard(table: &Table) -> Vec<Game> {
    let mut games = Vec::with_capacity(table.len());
    for row in table.rows() {
        match Game::from_scoreboard_row(&row) {
            Some(game) => games.push(game),
            None => warn!("skipping malformed scoreboard row"),
        }
    }
    games
}

/// Decode every game-finder row, skipping malformed ones. Provider order is
/// preserved (newest first).
pub fn games_from_finder(table: &Table, opponent_id: TeamId) -> Vec<Game> {
    let mut games = Vec::with_capacity(table.len());
    for row in table.rows() {
        match Game::from_finder_row(&row, opponent_id) {
            Some(game) => games.push(game),
            None => warn!("skipping malformed game-finder row"),
        }
    }
    games
}

// ---------------------------------------------------------------------------
// BoxScoreLine
// ---------------------------------------------------------------------------

/// One player's line in one game's box score.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxScoreLine {
    pub person_id: PlayerId,
    pub team_id: TeamId,
    pub first_name: String,
    pub family_name: String,
    pub minutes: RawMinutes,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub field_goals_made: f64,
    pub field_goals_attempted: f64,
    pub three_pointers_made: f64,
    pub three_pointers_attempted: f64,
}

impl BoxScoreLine {
    pub fn from_row(row: &Row<'_>) -> Option<BoxScoreLine> {
        Some(BoxScoreLine {
            person_id: row.int("personid")?,
            team_id: row.int("teamid")?,
            first_name: row.text("firstname").unwrap_or_default(),
            family_name: row.text("familyname").unwrap_or_default(),
            minutes: RawMinutes::from_value(row.get("minutes")),
            points: row.stat("points"),
            rebounds: row.stat("reboundstotal"),
            assists: row.stat("assists"),
            field_goals_made: row.stat("fieldgoalsmade"),
            field_goals_attempted: row.stat("fieldgoalsattempted"),
            three_pointers_made: row.stat("threepointersmade"),
            three_pointers_attempted: row.stat("threepointersattempted"),
        })
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.family_name)
            .trim()
            .to_string()
    }

    pub fn minutes_played(&self, rounding: MinutesRounding) -> f64 {
        self.minutes.parse(rounding)
    }

    /// Points + rebounds + assists.
    pub fn pra(&self) -> f64 {
        self.points + self.rebounds + self.assists
    }

    /// Points + assists.
    pub fn pa(&self) -> f64 {
        self.points + self.assists
    }

    pub fn two_pointers_made(&self) -> f64 {
        self.field_goals_made - self.three_pointers_made
    }

    pub fn two_pointers_attempted(&self) -> f64 {
        self.field_goals_attempted - self.three_pointers_attempted
    }
}

/// Decode every box-score row, skipping rows without player or team ids.
pub fn box_score_lines(table: &Table) -> Vec<BoxScoreLine> {
    let mut lines = Vec::with_capacity(table.len());
    for row in table.rows() {
        match BoxScoreLine::from_row(&row) {
            Some(line) => lines.push(line),
            None => warn!("skipping box score row without player/team id"),
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// GameLogEntry
// ---------------------------------------------------------------------------

/// One game from a player's recent game log.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLogEntry {
    pub game_id: String,
    /// `None` when the provider date could not be parsed.
    pub date: Option<NaiveDate>,
    pub matchup: String,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub minutes: RawMinutes,
}

impl GameLogEntry {
    pub fn from_row(row: &Row<'_>) -> GameLogEntry {
        GameLogEntry {
            game_id: row.text("game_id").unwrap_or_default(),
            date: row.text("game_date").and_then(|d| parse_provider_date(&d)),
            matchup: row.text("matchup").unwrap_or_default(),
            points: row.stat("pts"),
            rebounds: row.stat("reb"),
            assists: row.stat("ast"),
            minutes: RawMinutes::from_value(row.get("min")),
        }
    }
}

/// Decode a game log and order it newest first.
pub fn game_log_entries(table: &Table) -> Vec<GameLogEntry> {
    let mut entries: Vec<GameLogEntry> = table.rows().map(|r| GameLogEntry::from_row(&r)).collect();
    sort_by_recency(&mut entries);
    entries
}

/// Stable newest-first sort. Entries without a date go last, keeping their
/// relative order.
pub fn sort_by_recency(entries: &mut [GameLogEntry]) {
    entries.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse the date formats the provider uses: "2024-01-15",
/// "2024-01-15T00:00:00" and the game log's "JAN 15, 2024".
pub fn parse_provider_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(prefix) = s.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(s, "%b %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(&title_case_month(s), "%b %d, %Y"))
        .ok()
}

fn title_case_month(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if (1..3).contains(&i) {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
