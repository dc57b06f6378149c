// Controls panel: matchup date picker and generate hint.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::{ViewState, DATE_FORMAT};

/// Render the controls panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(Line::from(control_spans(state))).block(block);
    frame.render_widget(paragraph, area);
}

/// Spans for the single controls row.
pub fn control_spans(state: &ViewState) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled("Matchup Date: ", Style::default().fg(Color::Gray))];

    match &state.date_entry {
        Some(text) => {
            spans.push(Span::styled(
                format!("{text}_"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("  (DD/MM/YYYY)", Style::default().fg(Color::DarkGray)));
        }
        None => {
            spans.push(Span::styled(
                state.date.format(DATE_FORMAT).to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
            if state.date == state.today {
                spans.push(Span::styled(" (today)", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                "[g] Generate Report",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        }
    }

    if let Some(error) = &state.entry_error {
        spans.push(Span::styled(format!("  {error}"), Style::default().fg(Color::Red)));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn state() -> ViewState {
        ViewState::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn shows_date_in_day_month_year() {
        let line = text(&control_spans(&state()));
        assert!(line.contains("Matchup Date: 15/01/2024 (today)"));
        assert!(line.contains("[g] Generate Report"));
    }

    #[test]
    fn other_dates_are_not_marked_today() {
        let mut state = state();
        state.date = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        let line = text(&control_spans(&state));
        assert!(line.contains("14/01/2024"));
        assert!(!line.contains("today"));
    }

    #[test]
    fn entry_mode_shows_cursor_and_error() {
        let mut state = state();
        state.date_entry = Some("31/02".into());
        state.entry_error = Some("Invalid date".into());
        let line = text(&control_spans(&state));
        assert!(line.contains("31/02_"));
        assert!(line.contains("Invalid date"));
        assert!(!line.contains("Generate"));
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = state();
        terminal.draw(|frame| render(frame, frame.area(), &state)).unwrap();
    }
}
