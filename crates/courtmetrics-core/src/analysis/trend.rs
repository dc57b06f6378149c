// Last-N vs head-to-head trend comparison.
//
// Averages are plain means over the first `last_n` log entries; combo stats
// are sums of those means. Missing stats are NaN and propagate unchanged.

use crate::analysis::minutes::MinutesRounding;
use crate::model::{BoxScoreLine, GameLogEntry, PlayerId, Venue};

/// Comparator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    pub last_n: usize,
    /// Head-to-head minutes above the average by more than this flag a role
    /// decrease.
    pub role_decrease_tolerance: f64,
    /// Head-to-head minutes below the average by more than this flag a role
    /// expansion.
    pub role_expansion_tolerance: f64,
    pub rounding: MinutesRounding,
}

impl Default for TrendSettings {
    fn default() -> Self {
        TrendSettings {
            last_n: 5,
            role_decrease_tolerance: 7.0,
            role_expansion_tolerance: 5.0,
            rounding: MinutesRounding::Truncate,
        }
    }
}

/// Direction of the recent PRA average relative to the head-to-head game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Recent average above the head-to-head line (over).
    Up,
    /// Recent average below the head-to-head line (under).
    Down,
}

/// Minutes-based role-change signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// Played much more in the head-to-head game than lately.
    Decrease,
    /// Played much less in the head-to-head game than lately.
    Expansion,
}

/// Points, rebounds, assists and minutes, plus their combos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatLine {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub minutes: f64,
}

impl StatLine {
    pub fn pra(&self) -> f64 {
        self.points + self.rebounds + self.assists
    }

    pub fn pa(&self) -> f64 {
        self.points + self.assists
    }
}

/// Comparison of a player's recent form against a head-to-head game.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub player_id: PlayerId,
    pub player_name: String,
    /// The player's side in today's game.
    pub venue: Venue,
    /// Number of log entries actually averaged (at most `last_n`).
    pub games_used: usize,
    pub recent: StatLine,
    pub head_to_head: StatLine,
    pub trend: Option<Trend>,
    pub role_change: Option<RoleChange>,
}

impl TrendReport {
    pub fn points_delta(&self) -> f64 {
        self.recent.points - self.head_to_head.points
    }

    pub fn rebounds_delta(&self) -> f64 {
        self.recent.rebounds - self.head_to_head.rebounds
    }

    pub fn assists_delta(&self) -> f64 {
        self.recent.assists - self.head_to_head.assists
    }

    pub fn pra_delta(&self) -> f64 {
        self.recent.pra() - self.head_to_head.pra()
    }
}

/// Compare the first `settings.last_n` entries of `game_log` (already ordered
/// newest first) against `h2h`. Returns `None` for an empty log.
pub fn compare(
    game_log: &[GameLogEntry],
    h2h: &BoxScoreLine,
    venue: Venue,
    settings: &TrendSettings,
) -> Option<TrendReport> {
    let recent_games = &game_log[..game_log.len().min(settings.last_n)];
    if recent_games.is_empty() {
        return None;
    }

    let recent = StatLine {
        points: mean(recent_games.iter().map(|e| e.points)),
        rebounds: mean(recent_games.iter().map(|e| e.rebounds)),
        assists: mean(recent_games.iter().map(|e| e.assists)),
        minutes: mean(recent_games.iter().map(|e| e.minutes.parse(settings.rounding))),
    };
    let head_to_head = StatLine {
        points: h2h.points,
        rebounds: h2h.rebounds,
        assists: h2h.assists,
        minutes: h2h.minutes_played(settings.rounding),
    };

    Some(TrendReport {
        player_id: h2h.person_id,
        player_name: h2h.name(),
        venue,
        games_used: recent_games.len(),
        trend: classify(recent.pra(), head_to_head.pra()),
        role_change: role_change(head_to_head.minutes, recent.minutes, settings),
        recent,
        head_to_head,
    })
}

/// Up when `recent > h2h`, Down when `recent < h2h`, nothing on a tie or NaN.
pub fn classify(recent: f64, h2h: f64) -> Option<Trend> {
    if recent > h2h {
        Some(Trend::Up)
    } else if recent < h2h {
        Some(Trend::Down)
    } else {
        None
    }
}

/// Role-change flag from head-to-head minutes vs the recent average.
pub fn role_change(h2h_minutes: f64, avg_minutes: f64, settings: &TrendSettings) -> Option<RoleChange> {
    if h2h_minutes > avg_minutes + settings.role_decrease_tolerance {
        Some(RoleChange::Decrease)
    } else if h2h_minutes < avg_minutes - settings.role_expansion_tolerance {
        Some(RoleChange::Expansion)
    } else {
        None
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
