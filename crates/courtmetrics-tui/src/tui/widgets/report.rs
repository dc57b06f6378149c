// Report panel: one expandable section per matchup with player cards.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use courtmetrics_core::analysis::trend::TrendReport;
use courtmetrics_core::session::{MatchupReport, MatchupStatus, MeetingLine, PlayerReport, PlayerStatus};

use crate::protocol::ReportStatus;
use crate::tui::{ViewState, DATE_FORMAT};

/// Render the report panel into the given area. Lines are not wrapped so
/// that every report line is one row and `section_starts` maps to rows.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .title(" Head-to-Head Report ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines = report_lines(state);
    let scroll = u16::try_from(state.scroll_offset).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// All report lines, including placeholder text when no matchup has arrived.
pub fn report_lines(state: &ViewState) -> Vec<Line<'static>> {
    if state.matchups.is_empty() {
        return vec![Line::from(Span::styled(
            placeholder(&state.status),
            Style::default().fg(Color::DarkGray),
        ))];
    }

    state
        .matchups
        .iter()
        .enumerate()
        .flat_map(|(index, report)| {
            section_lines(report, index == state.selected, state.is_expanded(index))
        })
        .collect()
}

/// Line index at which each matchup section starts.
pub fn section_starts(state: &ViewState) -> Vec<usize> {
    let mut starts = Vec::with_capacity(state.matchups.len());
    let mut offset = 0;
    for (index, report) in state.matchups.iter().enumerate() {
        starts.push(offset);
        offset += section_lines(report, false, state.is_expanded(index)).len();
    }
    starts
}

/// Furthest scroll offset: the last report line at the top of the panel.
pub fn max_scroll(state: &ViewState) -> usize {
    report_lines(state).len().saturating_sub(1)
}

fn placeholder(status: &ReportStatus) -> String {
    match status {
        ReportStatus::Idle => "Choose a matchup date and press g to generate a report.".into(),
        ReportStatus::Loading => "Loading...".into(),
        ReportStatus::NoGames => "No games found for this date.".into(),
        ReportStatus::Complete => "No matchups to show.".into(),
        ReportStatus::Failed(message) => format!("Report failed: {message}"),
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// "New York Knicks @ Boston Celtics (HOME)".
pub fn section_title(report: &MatchupReport) -> String {
    format!("{} @ {} (HOME)", report.away_name, report.home_name)
}

fn section_lines(report: &MatchupReport, selected: bool, expanded: bool) -> Vec<Line<'static>> {
    let marker = if expanded { "\u{25bc}" } else { "\u{25b6}" };
    let mut header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    if selected {
        header_style = header_style.add_modifier(Modifier::REVERSED);
    }
    let mut lines = vec![Line::from(Span::styled(
        format!("{marker} {}", section_title(report)),
        header_style,
    ))];

    if !expanded {
        return lines;
    }

    match report.status {
        MatchupStatus::NoRecentMeeting => lines.push(note("No recent head-to-head meeting.")),
        MatchupStatus::BoxScoreUnavailable => lines.push(note("Box score for the last meeting is unavailable.")),
        MatchupStatus::Analyzed if report.players.is_empty() => {
            lines.push(note("No players above the minutes threshold."))
        }
        MatchupStatus::Analyzed => {
            if let Some(meeting) = &report.latest_meeting {
                lines.push(note(&format!("Last meeting: {}", meeting.date.format(DATE_FORMAT))));
            }
            for player in &report.players {
                lines.extend(player_card(player));
            }
        }
    }

    lines.push(Line::from(""));
    lines
}

fn note(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {text}"), Style::default().fg(Color::DarkGray)))
}

// ---------------------------------------------------------------------------
// Player cards
// ---------------------------------------------------------------------------

/// Lines for one player: name and venue, a pair of lines per meeting, then
/// the L5 metrics or the reason they are missing.
pub fn player_card(player: &PlayerReport) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("  {}", player.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} TODAY", player.venue_today.label()),
            Style::default().fg(Color::Gray),
        ),
    ])];

    let recent_minutes = player.trend().map(|t| t.recent.minutes);
    for meeting in &player.meeting_lines {
        lines.extend(meeting_lines(meeting, recent_minutes));
    }

    match &player.status {
        PlayerStatus::Analyzed(report) => lines.push(metrics_line(report)),
        PlayerStatus::Absent => lines.push(Line::from(Span::styled(
            "    Not in recent game logs",
            Style::default().fg(Color::Yellow),
        ))),
        PlayerStatus::LogUnavailable => lines.push(Line::from(Span::styled(
            "    Game log unavailable",
            Style::default().fg(Color::Red),
        ))),
    }

    lines
}

fn meeting_lines(meeting: &MeetingLine, recent_minutes: Option<f64>) -> Vec<Line<'static>> {
    let line = &meeting.line;
    let stats = format!(
        "    MATCHUP ({}) {}: {} PTS | {} REB | {} AST | {} PRA",
        meeting.game.date.format(DATE_FORMAT),
        meeting.venue.label(),
        format_count(line.points),
        format_count(line.rebounds),
        format_count(line.assists),
        format_count(line.pra()),
    );
    let minutes = format!(
        "      MINUTES: {} (L5 Avg: {}m) | 2P: {}/{} | 3P: {}/{}",
        line.minutes,
        format_average(recent_minutes.unwrap_or(f64::NAN)),
        format_count(line.two_pointers_made()),
        format_count(line.two_pointers_attempted()),
        format_count(line.three_pointers_made),
        format_count(line.three_pointers_attempted),
    );
    vec![
        Line::from(Span::styled(stats, Style::default().fg(Color::White))),
        Line::from(Span::styled(minutes, Style::default().fg(Color::Gray))),
    ]
}

fn metrics_line(report: &TrendReport) -> Line<'static> {
    let metrics = [
        ("Points", report.recent.points, report.points_delta()),
        ("Rebounds", report.recent.rebounds, report.rebounds_delta()),
        ("Assists", report.recent.assists, report.assists_delta()),
        ("PRA", report.recent.pra(), report.pra_delta()),
    ];

    let mut spans = vec![Span::raw("    ")];
    for (i, (label, average, delta)) in metrics.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("{label} (L{}): {}", report.games_used, format_average(average)),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(
            format!(" ({} vs H2H)", format_delta(delta)),
            Style::default().fg(delta_color(delta)),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Whole numbers without decimals, otherwise one decimal; NaN as "--".
pub fn format_count(value: f64) -> String {
    if value.is_nan() {
        "--".into()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn format_average(value: f64) -> String {
    if value.is_nan() {
        "--".into()
    } else {
        format!("{value:.1}")
    }
}

/// Signed delta, "+1.5" / "-2.0".
pub fn format_delta(value: f64) -> String {
    if value.is_nan() {
        "--".into()
    } else {
        format!("{value:+.1}")
    }
}

pub fn delta_color(delta: f64) -> Color {
    if delta > 0.0 {
        Color::Green
    } else if delta < 0.0 {
        Color::Red
    } else {
        Color::Gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use courtmetrics_core::analysis::minutes::RawMinutes;
    use courtmetrics_core::analysis::trend::{RoleChange, StatLine, Trend};
    use courtmetrics_core::model::{BoxScoreLine, Game, Venue};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn game(id: &str, on: NaiveDate) -> Game {
        Game {
            game_id: id.into(),
            date: on,
            home_team_id: 1610612738,
            away_team_id: 1610612752,
            matchup: "BOS vs. NYK".into(),
        }
    }

    fn tatum_line() -> BoxScoreLine {
        BoxScoreLine {
            person_id: 1628369,
            team_id: 1610612738,
            first_name: "Jayson".into(),
            family_name: "Tatum".into(),
            minutes: RawMinutes::Text("38:10".into()),
            points: 30.0,
            rebounds: 5.0,
            assists: 3.0,
            field_goals_made: 11.0,
            field_goals_attempted: 20.0,
            three_pointers_made: 4.0,
            three_pointers_attempted: 9.0,
        }
    }

    fn tatum(status: PlayerStatus) -> PlayerReport {
        let meeting = game("0022300400", date(2023, 12, 20));
        PlayerReport {
            player_id: 1628369,
            name: "Jayson Tatum".into(),
            team_id: 1610612738,
            venue_today: Venue::Home,
            h2h_minutes: 38.0,
            h2h: tatum_line(),
            meeting_lines: vec![MeetingLine {
                game: meeting,
                venue: Venue::Home,
                line: tatum_line(),
            }],
            status,
        }
    }

    fn trend() -> TrendReport {
        TrendReport {
            player_id: 1628369,
            player_name: "Jayson Tatum".into(),
            venue: Venue::Home,
            games_used: 5,
            recent: StatLine {
                points: 22.0,
                rebounds: 5.0,
                assists: 3.0,
                minutes: 29.0,
            },
            head_to_head: StatLine {
                points: 30.0,
                rebounds: 5.0,
                assists: 3.0,
                minutes: 38.0,
            },
            trend: Some(Trend::Down),
            role_change: Some(RoleChange::Decrease),
        }
    }

    fn matchup(status: MatchupStatus, players: Vec<PlayerReport>) -> MatchupReport {
        MatchupReport {
            game: game("0022300555", date(2024, 1, 15)),
            home_name: "Boston Celtics".into(),
            away_name: "New York Knicks".into(),
            home_abbreviation: "BOS".into(),
            away_abbreviation: "NYK".into(),
            status,
            latest_meeting: Some(game("0022300400", date(2023, 12, 20))),
            meetings: vec![game("0022300400", date(2023, 12, 20))],
            players,
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn all_text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_count(30.0), "30");
        assert_eq!(format_count(7.5), "7.5");
        assert_eq!(format_count(f64::NAN), "--");
        assert_eq!(format_average(22.0), "22.0");
        assert_eq!(format_average(f64::NAN), "--");
        assert_eq!(format_delta(-8.0), "-8.0");
        assert_eq!(format_delta(1.5), "+1.5");
        assert_eq!(format_delta(0.0), "+0.0");
        assert_eq!(format_delta(f64::NAN), "--");
    }

    #[test]
    fn delta_colors() {
        assert_eq!(delta_color(2.0), Color::Green);
        assert_eq!(delta_color(-0.5), Color::Red);
        assert_eq!(delta_color(0.0), Color::Gray);
        assert_eq!(delta_color(f64::NAN), Color::Gray);
    }

    #[test]
    fn section_title_names_the_home_side() {
        let report = matchup(MatchupStatus::Analyzed, Vec::new());
        assert_eq!(section_title(&report), "New York Knicks @ Boston Celtics (HOME)");
    }

    #[test]
    fn analyzed_player_card() {
        let lines = all_text(&player_card(&tatum(PlayerStatus::Analyzed(trend()))));
        assert_eq!(lines[0], "  Jayson Tatum (HOME) TODAY");
        assert_eq!(lines[1], "    MATCHUP (20/12/2023) (HOME): 30 PTS | 5 REB | 3 AST | 38 PRA");
        assert_eq!(lines[2], "      MINUTES: 38:10 (L5 Avg: 29.0m) | 2P: 7/11 | 3P: 4/9");
        assert!(lines[3].contains("Points (L5): 22.0 (-8.0 vs H2H)"));
        assert!(lines[3].contains("Rebounds (L5): 5.0 (+0.0 vs H2H)"));
        assert!(lines[3].contains("PRA (L5): 30.0 (-8.0 vs H2H)"));
    }

    #[test]
    fn absent_player_card_has_no_average() {
        let lines = all_text(&player_card(&tatum(PlayerStatus::Absent)));
        assert!(lines[2].contains("L5 Avg: --m"));
        assert_eq!(lines.last().map(String::as_str), Some("    Not in recent game logs"));
    }

    #[test]
    fn unavailable_log_is_reported() {
        let lines = all_text(&player_card(&tatum(PlayerStatus::LogUnavailable)));
        assert_eq!(lines.last().map(String::as_str), Some("    Game log unavailable"));
    }

    #[test]
    fn collapsed_section_is_header_only() {
        let report = matchup(MatchupStatus::Analyzed, vec![tatum(PlayerStatus::Absent)]);
        let lines = section_lines(&report, false, false);
        assert_eq!(lines.len(), 1);
        assert!(line_text(&lines[0]).starts_with('\u{25b6}'));
    }

    #[test]
    fn status_notes() {
        let lines = all_text(&section_lines(&matchup(MatchupStatus::NoRecentMeeting, Vec::new()), false, true));
        assert!(lines[1].contains("No recent head-to-head meeting"));
        let lines = all_text(&section_lines(&matchup(MatchupStatus::BoxScoreUnavailable, Vec::new()), false, true));
        assert!(lines[1].contains("unavailable"));
        let lines = all_text(&section_lines(&matchup(MatchupStatus::Analyzed, Vec::new()), false, true));
        assert!(lines[1].contains("No players above"));
    }

    #[test]
    fn section_starts_follow_expansion() {
        let mut state = ViewState::new(date(2024, 1, 15));
        state.matchups = vec![
            matchup(MatchupStatus::Analyzed, vec![tatum(PlayerStatus::Absent)]),
            matchup(MatchupStatus::NoRecentMeeting, Vec::new()),
        ];
        // header, last meeting, card (4 lines), blank
        assert_eq!(section_starts(&state), vec![0, 7]);
        state.collapsed.insert(0);
        assert_eq!(section_starts(&state), vec![0, 1]);
    }

    #[test]
    fn max_scroll_is_last_line() {
        let mut state = ViewState::new(date(2024, 1, 15));
        assert_eq!(max_scroll(&state), 0);
        state.matchups = vec![
            matchup(MatchupStatus::Analyzed, vec![tatum(PlayerStatus::Absent)]),
            matchup(MatchupStatus::NoRecentMeeting, Vec::new()),
        ];
        assert_eq!(max_scroll(&state), 9);
    }

    #[test]
    fn long_lines_do_not_shift_sections() {
        let backend = ratatui::backend::TestBackend::new(60, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::new(date(2024, 1, 15));
        state.matchups = vec![
            matchup(
                MatchupStatus::Analyzed,
                vec![tatum(PlayerStatus::Analyzed(trend()))],
            ),
            matchup(MatchupStatus::NoRecentMeeting, Vec::new()),
        ];
        state.scroll_offset = section_starts(&state)[1];
        terminal.draw(|frame| render(frame, frame.area(), &state)).unwrap();

        let buffer = terminal.backend().buffer();
        let first_row: String = (1..59).map(|x| buffer[(x, 1)].symbol()).collect();
        assert!(first_row.starts_with("\u{25bc} New York Knicks @ Boston Celtics"));
        let second_row: String = (1..59).map(|x| buffer[(x, 2)].symbol()).collect();
        assert!(second_row.contains("No recent head-to-head meeting"));
    }

    #[test]
    fn placeholder_when_empty() {
        let mut state = ViewState::new(date(2024, 1, 15));
        state.status = ReportStatus::NoGames;
        let lines = all_text(&report_lines(&state));
        assert_eq!(lines, vec!["No games found for this date.".to_string()]);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::new(date(2024, 1, 15));
        state.matchups = vec![matchup(
            MatchupStatus::Analyzed,
            vec![tatum(PlayerStatus::Analyzed(trend()))],
        )];
        state.scroll_offset = 2;
        terminal.draw(|frame| render(frame, frame.area(), &state)).unwrap();
    }
}
