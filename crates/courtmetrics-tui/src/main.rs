// CourtMetrics dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the team directory
// 4. Build the stats provider client
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI event loop
// 8. Cleanup on exit

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use courtmetrics_core::config;
use courtmetrics_core::provider::nba::NbaStatsClient;
use courtmetrics_core::teams::TeamDirectory;
use courtmetrics_tui::{app, tui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("CourtMetrics dashboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: lookback {} days, L{} window, minutes threshold {}",
        config.analysis.lookback_days, config.analysis.last_n, config.dashboard.minutes_threshold
    );

    // 3. Team directory
    let teams = TeamDirectory::from_config(&config.teams).context("failed to load team directory")?;
    info!("Loaded {} teams", teams.len());

    // 4. Stats provider
    let provider = NbaStatsClient::from_config(&config.provider).context("failed to build stats client")?;
    info!("Stats provider: {}", config.provider.base_url);

    // 5. Create mpsc channels
    let (report_tx, report_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, Arc::new(provider), Arc::new(teams), report_tx);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(report_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("CourtMetrics dashboard shut down cleanly");
    Ok(())
}

/// Log directory: the platform data dir when one exists, else `./logs`.
fn log_dir() -> anyhow::Result<PathBuf> {
    match directories::ProjectDirs::from("", "", "courtmetrics") {
        Some(dirs) => Ok(dirs.data_local_dir().join("logs")),
        None => Ok(std::env::current_dir()?.join("logs")),
    }
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_file = std::fs::File::create(log_dir.join("courtmetrics.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtmetrics_core=info,courtmetrics_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    Ok(())
}
