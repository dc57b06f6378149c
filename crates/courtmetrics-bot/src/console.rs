// Console rendering of matchup findings.

use std::fmt::Write;

use chrono::NaiveDate;

use courtmetrics_core::analysis::findings::{player_findings, Finding};
use courtmetrics_core::session::{MatchupReport, MatchupStatus};

/// First line of a console run.
pub fn banner(date: NaiveDate) -> String {
    format!("--- CourtMetrics: head-to-head findings ({date}) ---")
}

/// Findings block for one matchup, or `None` when there is nothing to say
/// (no meeting in the window).
///
/// Players without findings are left out. A player whose only finding is an
/// absence gets a single line.
pub fn render_matchup(report: &MatchupReport, key_minutes_threshold: f64) -> Option<String> {
    let mut out = String::new();

    match (&report.status, &report.latest_meeting) {
        (MatchupStatus::NoRecentMeeting, _) | (_, None) => return None,
        (MatchupStatus::BoxScoreUnavailable, Some(meeting)) => {
            let _ = writeln!(out, "Matchup: {} (H2H: {})", report.title(), meeting.date);
            let _ = writeln!(out, "   Box score unavailable for game {}", meeting.game_id);
            return Some(out);
        }
        (MatchupStatus::Analyzed, Some(meeting)) => {
            let _ = writeln!(out, "Matchup: {} (H2H: {})", report.title(), meeting.date);
        }
    }

    for player in &report.players {
        let findings = player_findings(player, key_minutes_threshold);
        match findings.as_slice() {
            [] => {}
            [single @ (Finding::Absent { .. } | Finding::LogUnavailable)] => {
                let _ = writeln!(out, "   {}: {single}", player.name);
            }
            many => {
                let _ = writeln!(out, "   {}:", player.name);
                for finding in many {
                    let _ = writeln!(out, "      {finding}");
                }
            }
        }
    }

    Some(out)
}
