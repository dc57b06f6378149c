// Console findings for a single player.

use std::fmt;

use crate::analysis::trend::{RoleChange, Trend, TrendReport};
use crate::session::{PlayerReport, PlayerStatus};

/// One line of console output about a player.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// No recent game-log entries. `key` marks players who logged heavy
    /// minutes in the head-to-head game.
    Absent { key: bool },
    /// The game log could not be fetched at all.
    LogUnavailable,
    UnderPra { h2h: f64, recent: f64 },
    OverPra { h2h: f64, recent: f64 },
    RoleDecrease { h2h_minutes: f64, avg_minutes: f64 },
    RoleExpansion { h2h_minutes: f64, avg_minutes: f64 },
}

/// Findings for one analyzed player. Absent players above
/// `key_minutes_threshold` head-to-head minutes are key absences.
pub fn player_findings(player: &PlayerReport, key_minutes_threshold: f64) -> Vec<Finding> {
    match &player.status {
        PlayerStatus::Analyzed(report) => findings(report),
        PlayerStatus::Absent => vec![absence(player.h2h_minutes, key_minutes_threshold)],
        PlayerStatus::LogUnavailable => vec![Finding::LogUnavailable],
    }
}

/// Findings derived from a trend report, trend first then role signals.
pub fn findings(report: &TrendReport) -> Vec<Finding> {
    let mut out = Vec::new();
    let h2h = report.head_to_head.pra();
    let recent = report.recent.pra();

    match report.trend {
        Some(Trend::Down) => out.push(Finding::UnderPra { h2h, recent }),
        Some(Trend::Up) => out.push(Finding::OverPra { h2h, recent }),
        None => {}
    }

    let h2h_minutes = report.head_to_head.minutes;
    let avg_minutes = report.recent.minutes;
    match report.role_change {
        Some(RoleChange::Decrease) => out.push(Finding::RoleDecrease { h2h_minutes, avg_minutes }),
        Some(RoleChange::Expansion) => out.push(Finding::RoleExpansion { h2h_minutes, avg_minutes }),
        None => {}
    }

    out
}

/// Absence finding for a player with no recent log.
pub fn absence(h2h_minutes: f64, key_minutes_threshold: f64) -> Finding {
    Finding::Absent {
        key: h2h_minutes > key_minutes_threshold,
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Absent { key: true } => {
                write!(f, "[KEY ABSENCE] Not in recent game logs (heavy H2H minutes)")
            }
            Finding::Absent { key: false } => write!(f, "[ABSENT] Not in recent game logs"),
            Finding::LogUnavailable => write!(f, "[NO DATA] Game log unavailable"),
            Finding::UnderPra { h2h, recent } => {
                write!(f, "[UNDER PRA] H2H: {h2h} -> L5: {recent:.1} (Trend: Down)")
            }
            Finding::OverPra { h2h, recent } => {
                write!(f, "[OVER PRA] H2H: {h2h} -> L5: {recent:.1} (Trend: Up)")
            }
            Finding::RoleDecrease { h2h_minutes, avg_minutes } => write!(
                f,
                "[CAUTION] Minute Drop: {h2h_minutes:.0}m -> {avg_minutes:.1}m (Role Decrease)"
            ),
            Finding::RoleExpansion { h2h_minutes, avg_minutes } => write!(
                f,
                "[OPPORTUNITY] Role Expansion: {h2h_minutes:.0}m -> {avg_minutes:.1}m (Filling Gap?)"
            ),
        }
    }
}
