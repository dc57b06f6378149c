// CourtMetrics console entry point.
//
// Prints head-to-head findings for today's slate and exits:
// 1. Initialize tracing (stderr, warnings by default)
// 2. Load config, team directory and stats client
// 3. Fetch today's games
// 4. Analyze each game and print its findings block

mod console;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use courtmetrics_core::config;
use courtmetrics_core::provider::nba::NbaStatsClient;
use courtmetrics_core::session::{Schedule, Session, Surface};
use courtmetrics_core::teams::TeamDirectory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Tracing goes to stderr so stdout carries only findings.
    init_tracing();

    // 2. Config, teams, provider
    let config = config::load_config().context("failed to load configuration")?;
    let teams = TeamDirectory::from_config(&config.teams).context("failed to load team directory")?;
    let provider = NbaStatsClient::from_config(&config.provider).context("failed to build stats client")?;
    let key_minutes_threshold = config.console.key_minutes_threshold;

    let mut session = Session::from_config(Arc::new(provider), Arc::new(teams), &config, Surface::Console);

    // 3. Today's games
    let today = chrono::Local::now().date_naive();
    println!("{}", console::banner(today));

    let games = match session.games_on(today).await {
        Schedule::Games(games) => games,
        Schedule::NoGames => {
            println!("No games scheduled.");
            return Ok(());
        }
        Schedule::Unavailable { last_error } => {
            anyhow::bail!("scoreboard unavailable for {today}: {last_error}");
        }
    };
    info!(%today, games = games.len(), "Analyzing slate");

    // 4. One block per game with something to report
    for game in &games {
        let report = session.analyze_game(game, today).await;
        if let Some(block) = console::render_matchup(&report, key_minutes_threshold) {
            println!();
            print!("{block}");
        }
    }

    let stats = session.cache_stats();
    info!(hits = stats.hits, misses = stats.misses, "Console run finished");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
