// Matchup selection, player filtering and trend comparison.

pub mod filter;
pub mod findings;
pub mod matchup;
pub mod minutes;
pub mod trend;
