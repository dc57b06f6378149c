// Library root: exposes the dashboard modules to the binary and to
// integration tests.

pub mod app;
pub mod protocol;
pub mod tui;
