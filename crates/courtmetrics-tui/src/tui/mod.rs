// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the chosen date and the report built so
// far. The app orchestrator pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashSet;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use courtmetrics_core::provider::cache::CacheStats;
use courtmetrics_core::provider::nba::slate_date;
use courtmetrics_core::session::MatchupReport;

use crate::protocol::{ReportStatus, UiUpdate, UserCommand};
use layout::{build_layout, AppLayout};

/// Display format for dates, matching the date entry format.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the date controls plus the report received so far.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Matchup date the next report will use.
    pub date: NaiveDate,
    /// Today's date, for the `t` shortcut.
    pub today: NaiveDate,
    /// Text being typed in date-entry mode; `None` outside that mode.
    pub date_entry: Option<String>,
    /// Last date-entry parse error.
    pub entry_error: Option<String>,
    /// Date of the report currently shown.
    pub report_date: Option<NaiveDate>,
    pub status: ReportStatus,
    /// Games on the slate; 0 until the scoreboard arrives.
    pub total_games: usize,
    pub matchups: Vec<MatchupReport>,
    /// Index of the highlighted matchup.
    pub selected: usize,
    /// Matchups the user folded away. Sections start expanded.
    pub collapsed: HashSet<usize>,
    pub scroll_offset: usize,
    pub cache: Option<CacheStats>,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        ViewState {
            date: today,
            today,
            date_entry: None,
            entry_error: None,
            report_date: None,
            status: ReportStatus::Idle,
            total_games: 0,
            matchups: Vec::new(),
            selected: 0,
            collapsed: HashSet::new(),
            scroll_offset: 0,
            cache: None,
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        !self.collapsed.contains(&index)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(slate_date(Utc::now()))
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::ReportRequested { date } => {
            state.report_date = Some(date);
            state.status = ReportStatus::Loading;
            state.total_games = 0;
            state.matchups.clear();
            state.selected = 0;
            state.collapsed.clear();
            state.scroll_offset = 0;
            state.cache = None;
        }
        UiUpdate::SlateLoaded { games } => {
            state.total_games = games;
        }
        UiUpdate::MatchupReady(report) => {
            state.matchups.push(*report);
        }
        UiUpdate::ReportComplete { cache, .. } => {
            state.status = ReportStatus::Complete;
            state.cache = Some(cache);
        }
        UiUpdate::NoGames { date } => {
            state.report_date = Some(date);
            state.status = ReportStatus::NoGames;
        }
        UiUpdate::ReportFailed(message) => {
            state.status = ReportStatus::Failed(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::controls::render(frame, layout.controls, state);
    widgets::report::render(frame, layout.report, state);
    render_help_bar(frame, &layout, state);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = if state.date_entry.is_some() {
        " Type DD/MM/YYYY | Enter:Apply | Esc:Cancel"
    } else {
        " q:Quit | \u{2190}/\u{2192}:Date | t:Today | d:Type date | g/Enter:Generate | \u{2191}/\u{2193}:Select | Space:Fold | PgUp/PgDn:Scroll"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the default panic output.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
