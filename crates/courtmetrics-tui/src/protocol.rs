// Messages between the TUI and the app orchestrator.

use chrono::NaiveDate;

use courtmetrics_core::provider::cache::CacheStats;
use courtmetrics_core::session::MatchupReport;

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Build a fresh report for the given matchup date, replacing any report
    /// in progress.
    GenerateReport { date: NaiveDate },
    Quit,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// A report run started; previous results are stale.
    ReportRequested { date: NaiveDate },
    /// The scoreboard for the date came back with this many games.
    SlateLoaded { games: usize },
    MatchupReady(Box<MatchupReport>),
    ReportComplete { matchups: usize, cache: CacheStats },
    NoGames { date: NaiveDate },
    ReportFailed(String),
}

/// A report-task update tagged with the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEvent {
    pub generation: u64,
    pub update: UiUpdate,
}

/// Progress of the current report run, as shown by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportStatus {
    #[default]
    Idle,
    Loading,
    Complete,
    NoGames,
    Failed(String),
}
