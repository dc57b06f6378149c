// TUI widget modules for each dashboard panel.

pub mod controls;
pub mod report;
pub mod status_bar;
