// Application state and orchestration logic.
//
// The app loop receives user commands from the TUI and events from the
// report task, and pushes UI updates to the TUI render loop. Each report
// runs in its own spawned task with a fresh `Session`; starting a new one
// aborts the old task and bumps the generation counter so events it already
// queued are discarded.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use courtmetrics_core::config::Config;
use courtmetrics_core::provider::StatsProvider;
use courtmetrics_core::session::{Schedule, Session, Surface};
use courtmetrics_core::teams::TeamDirectory;

use crate::protocol::{ReportEvent, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn StatsProvider>,
    pub teams: Arc<TeamDirectory>,
    pub current_report: Option<JoinHandle<()>>,
    /// Identifies the current report task. Incremented on every start;
    /// events carrying an older generation are dropped.
    pub report_generation: u64,
    /// Report tasks send their events through a clone of this sender.
    pub report_tx: mpsc::Sender<ReportEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn StatsProvider>,
        teams: Arc<TeamDirectory>,
        report_tx: mpsc::Sender<ReportEvent>,
    ) -> Self {
        AppState {
            config,
            provider,
            teams,
            current_report: None,
            report_generation: 0,
            report_tx,
        }
    }

    /// Abort the running report task, if any.
    pub fn cancel_report(&mut self) {
        if let Some(handle) = self.current_report.take() {
            handle.abort();
            info!("Cancelled previous report task");
        }
    }

    /// Start a report for `date`, replacing any report in progress.
    /// Returns the new generation.
    pub fn start_report(&mut self, date: NaiveDate) -> u64 {
        self.cancel_report();
        self.report_generation += 1;
        let generation = self.report_generation;

        let session = Session::from_config(
            Arc::clone(&self.provider),
            Arc::clone(&self.teams),
            &self.config,
            Surface::Dashboard,
        );
        let tx = self.report_tx.clone();
        self.current_report = Some(tokio::spawn(run_report(session, date, generation, tx)));
        info!(%date, generation, "Started report");
        generation
    }
}

// ---------------------------------------------------------------------------
// Report task
// ---------------------------------------------------------------------------

/// Body of a report task: load the slate, then analyze each game and send
/// its report as soon as it is ready.
pub async fn run_report(
    mut session: Session,
    date: NaiveDate,
    generation: u64,
    tx: mpsc::Sender<ReportEvent>,
) {
    let event = |update| ReportEvent { generation, update };

    let games = match session.games_on(date).await {
        Schedule::Games(games) => games,
        Schedule::NoGames => {
            let _ = tx.send(event(UiUpdate::NoGames { date })).await;
            return;
        }
        Schedule::Unavailable { last_error } => {
            let message = format!("Scoreboard unavailable: {last_error}");
            let _ = tx.send(event(UiUpdate::ReportFailed(message))).await;
            return;
        }
    };

    if tx.send(event(UiUpdate::SlateLoaded { games: games.len() })).await.is_err() {
        return;
    }

    for game in &games {
        let report = session.analyze_game(game, date).await;
        if tx.send(event(UiUpdate::MatchupReady(Box::new(report)))).await.is_err() {
            debug!("Report receiver dropped; stopping report task");
            return;
        }
    }

    let cache = session.cache_stats();
    info!(%date, matchups = games.len(), hits = cache.hits, misses = cache.misses, "Report complete");
    let _ = tx
        .send(event(UiUpdate::ReportComplete {
            matchups: games.len(),
            cache,
        }))
        .await;
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until the user quits or the command
/// channel closes.
///
/// Listens on two channels using `tokio::select!`:
/// 1. Report task events
/// 2. User commands from the TUI
pub async fn run(
    mut report_rx: mpsc::Receiver<ReportEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    loop {
        tokio::select! {
            // --- Report events ---
            Some(event) = report_rx.recv() => {
                handle_report_event(&mut state, event, &ui_tx).await;
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.cancel_report();
    Ok(())
}

/// Forward a report event to the TUI unless it belongs to a superseded run.
async fn handle_report_event(state: &mut AppState, event: ReportEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    if event.generation != state.report_generation {
        debug!(
            "Discarding stale report event (event gen: {}, current gen: {})",
            event.generation, state.report_generation
        );
        return;
    }

    match &event.update {
        UiUpdate::ReportComplete { .. } | UiUpdate::NoGames { .. } => {
            state.current_report = None;
        }
        UiUpdate::ReportFailed(message) => {
            warn!("Report failed: {}", message);
            state.current_report = None;
        }
        _ => {}
    }
    let _ = ui_tx.send(event.update).await;
}

async fn handle_user_command(state: &mut AppState, cmd: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
    match cmd {
        UserCommand::GenerateReport { date } => {
            state.start_report(date);
            let _ = ui_tx.send(UiUpdate::ReportRequested { date }).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
