// One report run: schedule lookup and per-game head-to-head analysis.
//
// A `Session` owns the provider handle and the response cache for a single
// run (one dashboard report or one console pass). Provider calls are
// sequential; the only shared state is the cache behind `&mut self`.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::analysis::filter::select_notable;
use crate::analysis::matchup::{meetings_in_window, select_prior_matchup};
use crate::analysis::trend::{compare, TrendReport, TrendSettings};
use crate::config::Config;
use crate::model::{
    box_score_lines, game_log_entries, games_from_finder, games_from_scoreboard, BoxScoreLine, Game,
    PlayerId, TeamId, Venue,
};
use crate::provider::cache::{CacheStats, ResponseCache};
use crate::provider::fetch::{FetchOutcome, Fetcher};
use crate::provider::nba::season_for;
use crate::provider::StatsProvider;
use crate::teams::TeamDirectory;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Which entry point a session serves. Each has its own threshold and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Dashboard,
    Console,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub lookback_days: u32,
    /// Players must exceed this many head-to-head minutes to be analyzed.
    pub minutes_threshold: f64,
    /// Sleep after each analyzed player.
    pub pacing: Duration,
    pub trend: TrendSettings,
}

impl SessionSettings {
    pub fn for_surface(config: &Config, surface: Surface) -> Self {
        let (minutes_threshold, pacing_ms) = match surface {
            Surface::Dashboard => (config.dashboard.minutes_threshold, config.dashboard.pacing_ms),
            Surface::Console => (config.console.minutes_threshold, config.console.pacing_ms),
        };
        SessionSettings {
            lookback_days: config.analysis.lookback_days,
            minutes_threshold,
            pacing: Duration::from_millis(pacing_ms),
            trend: config.analysis.trend_settings(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Games on a date.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Games(Vec<Game>),
    NoGames,
    /// The scoreboard could not be fetched.
    Unavailable { last_error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupStatus {
    Analyzed,
    /// No meeting between the teams inside the lookback window.
    NoRecentMeeting,
    /// The latest meeting's box score could not be fetched.
    BoxScoreUnavailable,
}

/// A player's line in one earlier meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingLine {
    pub game: Game,
    pub venue: Venue,
    pub line: BoxScoreLine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStatus {
    Analyzed(TrendReport),
    /// The game log came back empty.
    Absent,
    /// Every game-log attempt failed.
    LogUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    /// The player's side in the game being previewed.
    pub venue_today: Venue,
    /// Minutes in the latest meeting, under the session's rounding policy.
    pub h2h_minutes: f64,
    /// The latest meeting's box score line.
    pub h2h: BoxScoreLine,
    /// Every meeting in the window the player appeared in, newest first.
    pub meeting_lines: Vec<MeetingLine>,
    pub status: PlayerStatus,
}

impl PlayerReport {
    pub fn trend(&self) -> Option<&TrendReport> {
        match &self.status {
            PlayerStatus::Analyzed(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupReport {
    pub game: Game,
    pub home_name: String,
    pub away_name: String,
    pub home_abbreviation: String,
    pub away_abbreviation: String,
    pub status: MatchupStatus,
    pub latest_meeting: Option<Game>,
    /// Meetings in the window, newest first.
    pub meetings: Vec<Game>,
    pub players: Vec<PlayerReport>,
}

impl MatchupReport {
    /// "NYK @ BOS".
    pub fn title(&self) -> String {
        format!("{} @ {}", self.away_abbreviation, self.home_abbreviation)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    provider: Arc<dyn StatsProvider>,
    fetcher: Fetcher,
    teams: Arc<TeamDirectory>,
    settings: SessionSettings,
}

impl Session {
    pub fn new(
        provider: Arc<dyn StatsProvider>,
        fetcher: Fetcher,
        teams: Arc<TeamDirectory>,
        settings: SessionSettings,
    ) -> Self {
        Session {
            provider,
            fetcher,
            teams,
            settings,
        }
    }

    /// A session for `surface` with a fresh cache sized by `config`.
    pub fn from_config(
        provider: Arc<dyn StatsProvider>,
        teams: Arc<TeamDirectory>,
        config: &Config,
        surface: Surface,
    ) -> Self {
        let fetcher = Fetcher::from_config(&config.provider, ResponseCache::new(config.cache.capacity));
        Session::new(provider, fetcher, teams, SessionSettings::for_surface(config, surface))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.fetcher.cache_stats()
    }

    /// Games scheduled on `date`.
    pub async fn games_on(&mut self, date: NaiveDate) -> Schedule {
        let provider = Arc::clone(&self.provider);
        match self.fetcher.fetch(None, || provider.scoreboard(date)).await {
            FetchOutcome::Success(table) => {
                let games = games_from_scoreboard(&table);
                info!(%date, games = games.len(), "scoreboard loaded");
                if games.is_empty() {
                    Schedule::NoGames
                } else {
                    Schedule::Games(games)
                }
            }
            FetchOutcome::NotFound => Schedule::NoGames,
            FetchOutcome::Exhausted { last_error, .. } => {
                warn!(%date, "scoreboard unavailable: {last_error}");
                Schedule::Unavailable { last_error }
            }
        }
    }

    /// Head-to-head analysis of `game` as previewed on `date`.
    pub async fn analyze_game(&mut self, game: &Game, date: NaiveDate) -> MatchupReport {
        let mut report = MatchupReport {
            game: game.clone(),
            home_name: self.teams.full_name(game.home_team_id),
            away_name: self.teams.full_name(game.away_team_id),
            home_abbreviation: self.teams.abbreviation(game.home_team_id),
            away_abbreviation: self.teams.abbreviation(game.away_team_id),
            status: MatchupStatus::NoRecentMeeting,
            latest_meeting: None,
            meetings: Vec::new(),
            players: Vec::new(),
        };

        // ---- meeting history ----
        let provider = Arc::clone(&self.provider);
        let (home, away) = (game.home_team_id, game.away_team_id);
        let history_outcome = self.fetcher.fetch(None, || provider.game_finder(home, away)).await;
        if let FetchOutcome::Exhausted { last_error, .. } = &history_outcome {
            warn!(game_id = %game.game_id, "meeting history unavailable: {last_error}");
        }
        let history = games_from_finder(&history_outcome.into_table(), away);

        let lookback = self.settings.lookback_days;
        let Some(latest) = select_prior_matchup(&history, date, lookback).cloned() else {
            info!(matchup = %report.title(), "no meeting in the last {lookback} days");
            return report;
        };
        report.meetings = meetings_in_window(&history, date, lookback);
        report.latest_meeting = Some(latest.clone());

        // ---- latest meeting box score ----
        let Some(latest_lines) = self.box_score(&latest.game_id).await else {
            warn!(game_id = %latest.game_id, "box score unavailable");
            report.status = MatchupStatus::BoxScoreUnavailable;
            return report;
        };
        report.status = MatchupStatus::Analyzed;

        // Older meetings feed the per-player cards only; a missing one is
        // skipped.
        let mut meeting_boxes = Vec::with_capacity(report.meetings.len());
        for meeting in &report.meetings {
            let lines = if meeting.game_id == latest.game_id {
                latest_lines.clone()
            } else {
                self.box_score(&meeting.game_id).await.unwrap_or_default()
            };
            meeting_boxes.push((meeting.clone(), lines));
        }

        // ---- per-player analysis ----
        let rounding = self.settings.trend.rounding;
        let notable = select_notable(&latest_lines, self.settings.minutes_threshold, rounding);
        info!(matchup = %report.title(), players = notable.len(), "analyzing notable players");
        let season = season_for(date);

        for line in notable {
            let meeting_lines = meeting_boxes
                .iter()
                .filter_map(|(meeting, lines)| {
                    lines
                        .iter()
                        .find(|l| l.person_id == line.person_id)
                        .map(|l| MeetingLine {
                            game: meeting.clone(),
                            venue: meeting.venue_for(l.team_id),
                            line: l.clone(),
                        })
                })
                .collect();

            let venue_today = game.venue_for(line.team_id);
            let status = self.player_status(line, venue_today, &season).await;
            report.players.push(PlayerReport {
                player_id: line.person_id,
                name: line.name(),
                team_id: line.team_id,
                venue_today,
                h2h_minutes: line.minutes_played(rounding),
                h2h: line.clone(),
                meeting_lines,
                status,
            });

            if !self.settings.pacing.is_zero() {
                tokio::time::sleep(self.settings.pacing).await;
            }
        }

        report
    }

    async fn box_score(&mut self, game_id: &str) -> Option<Vec<BoxScoreLine>> {
        let provider = Arc::clone(&self.provider);
        let key = format!("box_{game_id}");
        let outcome = self.fetcher.fetch(Some(key.as_str()), || provider.box_score(game_id)).await;
        outcome.table().map(box_score_lines)
    }

    async fn player_status(&mut self, line: &BoxScoreLine, venue: Venue, season: &str) -> PlayerStatus {
        let provider = Arc::clone(&self.provider);
        let player_id = line.person_id;
        let key = format!("log_{player_id}_{season}");
        let outcome = self
            .fetcher
            .fetch(Some(key.as_str()), || provider.player_game_log(player_id, season))
            .await;

        match outcome {
            FetchOutcome::Success(table) => {
                let entries = game_log_entries(&table);
                match compare(&entries, line, venue, &self.settings.trend) {
                    Some(trend) => PlayerStatus::Analyzed(trend),
                    None => PlayerStatus::Absent,
                }
            }
            FetchOutcome::NotFound => {
                debug!(player_id, season, "no recent game log");
                PlayerStatus::Absent
            }
            FetchOutcome::Exhausted { last_error, .. } => {
                warn!(player_id, season, "game log unavailable: {last_error}");
                PlayerStatus::LogUnavailable
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
