// Head-to-head matchup selection within a lookback window.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::model::Game;

/// First date (inclusive) of the lookback window ending before `target`.
pub fn window_start(target: NaiveDate, lookback_days: u32) -> NaiveDate {
    target - Duration::days(i64::from(lookback_days))
}

fn in_window(game: &Game, target: NaiveDate, lookback_days: u32) -> bool {
    game.date < target && game.date >= window_start(target, lookback_days)
}

/// The most recent meeting strictly before `target` and no older than
/// `lookback_days`. When several meetings share the latest date, the one
/// listed first by the provider wins.
pub fn select_prior_matchup(
    history: &[Game],
    target: NaiveDate,
    lookback_days: u32,
) -> Option<&Game> {
    history
        .iter()
        .filter(|g| in_window(g, target, lookback_days))
        .fold(None, |best: Option<&Game>, game| match best {
            Some(b) if b.date >= game.date => Some(b),
            _ => Some(game),
        })
}

/// Every meeting in the lookback window, one entry per game id (first row
/// wins), newest first.
pub fn meetings_in_window(history: &[Game], target: NaiveDate, lookback_days: u32) -> Vec<Game> {
    let mut seen = HashSet::new();
    let mut meetings: Vec<Game> = history
        .iter()
        .filter(|g| in_window(g, target, lookback_days))
        .filter(|g| seen.insert(g.game_id.clone()))
        .cloned()
        .collect();
    meetings.sort_by(|a, b| b.date.cmp(&a.date));
    meetings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
