// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the report dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Controls (3 rows): matchup date, generate hint    |
// +--------------------------------------------------+
// | Report (fill)                                     |
// |   one expandable section per matchup              |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: report date and progress.
    pub status_bar: Rect,
    /// Bordered date picker and generate hint.
    pub controls: Rect,
    /// Scrollable matchup report.
    pub report: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | controls(3) | report(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // controls
            Constraint::Min(5),    // report
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        controls: vertical[1],
        report: vertical[2],
        help_bar: vertical[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_nonzero_areas() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        assert!(layout.status_bar.height > 0);
        assert!(layout.controls.height > 0);
        assert!(layout.report.height > 0);
        assert!(layout.help_bar.height > 0);
    }

    #[test]
    fn fixed_rows_have_expected_heights() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.controls.height, 3);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.report.height, 35);
    }

    #[test]
    fn zones_stack_top_to_bottom() {
        let layout = build_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.status_bar.y, 0);
        assert_eq!(layout.controls.y, 1);
        assert_eq!(layout.report.y, 4);
        assert_eq!(layout.help_bar.y, 29);
        assert_eq!(layout.report.width, 100);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = build_layout(area);
        for rect in [layout.status_bar, layout.controls, layout.report, layout.help_bar] {
            assert!(rect.x + rect.width <= area.width);
            assert!(rect.y + rect.height <= area.height);
        }
    }

    #[test]
    fn small_terminal_does_not_panic() {
        let layout = build_layout(Rect::new(0, 0, 20, 5));
        assert!(layout.status_bar.width <= 20);
    }
}
