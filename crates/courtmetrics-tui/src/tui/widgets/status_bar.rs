// Status bar widget: report date, progress, cache summary.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::ReportStatus;
use crate::tui::{ViewState, DATE_FORMAT};

/// Render the status bar into the given area.
///
/// Layout: [app name] [report date] [progress] [cache hits]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " CourtMetrics ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if let Some(date) = state.report_date {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("Report {}", date.format(DATE_FORMAT)),
            Style::default().fg(Color::White),
        ));
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (label, color) = progress_label(state);
    spans.push(Span::styled(label, Style::default().fg(color)));

    if let Some(cache) = state.cache {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("cache {} hit / {} miss", cache.hits, cache.misses),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Progress text and its color for the current report status.
pub fn progress_label(state: &ViewState) -> (String, Color) {
    match &state.status {
        ReportStatus::Idle => ("Press g to generate a report".to_string(), Color::Gray),
        ReportStatus::Loading if state.total_games == 0 => ("Loading schedule...".to_string(), Color::Yellow),
        ReportStatus::Loading => (
            format!("Analyzing {}/{} games...", state.matchups.len(), state.total_games),
            Color::Yellow,
        ),
        ReportStatus::Complete => (format!("{} matchups analyzed", state.matchups.len()), Color::Green),
        ReportStatus::NoGames => ("No games scheduled".to_string(), Color::Yellow),
        ReportStatus::Failed(message) => (format!("Error: {message}"), Color::Red),
    }
}
