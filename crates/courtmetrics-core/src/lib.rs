// Library root: head-to-head trend analysis shared by the dashboard and the
// console runner.

pub mod analysis;
pub mod config;
pub mod model;
pub mod provider;
pub mod session;
pub mod table;
pub mod teams;
