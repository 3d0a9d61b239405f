//! FeiQ headless client
//!
//! Loads configuration and mock data, builds the application state and
//! logs what each section would show.

use anyhow::Context;
use feiq_core::{format_speed, AppConfig, MockData, TracingActionSink};
use feiq_ui::{AppState, MainNav, DEMO_DATA};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn load_config() -> AppConfig {
    let loaded = AppConfig::default_path().and_then(|path| AppConfig::load_or_default(path));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("Falling back to default config: {}", e);
            AppConfig::default()
        }
    }
}

fn load_data(path: Option<PathBuf>) -> anyhow::Result<MockData> {
    match path {
        Some(path) => MockData::load_from(&path)
            .with_context(|| format!("failed to load mock data from {}", path.display())),
        None => {
            info!("Using bundled demo data");
            MockData::from_json(DEMO_DATA).context("bundled demo data is invalid")
        }
    }
}

fn log_summary(state: &AppState) {
    for section in MainNav::ALL {
        match section {
            MainNav::Messaging => {
                let (pinned, regular) = state.conversation_rows();
                info!(
                    "{}: {} pinned, {} other, {} unread",
                    section.label(),
                    pinned.len(),
                    regular.len(),
                    state.conversations.total_unread()
                );
            }
            MainNav::FileTransfer => {
                let stats = state.transfers.stats();
                info!(
                    "{}: {} active at {}, {} in history",
                    section.label(),
                    stats.active_count,
                    format_speed(stats.total_speed),
                    state.transfers.history().len()
                );
                for row in state.transfer_rows() {
                    let (speed, remaining) = row.telemetry.unwrap_or_default();
                    info!(
                        "  {} {} {} {:.0}% [{}] {} {}",
                        row.file_name,
                        row.size_label,
                        row.peer_name,
                        row.progress,
                        row.badge.label,
                        speed,
                        remaining
                    );
                }
            }
            MainNav::Organization => {
                let stats = state.directory.stats();
                info!(
                    "{}: {} departments visible, {}/{} colleagues online",
                    section.label(),
                    state.department_rows().len(),
                    stats.online,
                    stats.total
                );
            }
            MainNav::Collaboration => {
                info!(
                    "{}: {} screenshots",
                    section.label(),
                    state.annotations.screenshots().len()
                );
            }
            MainNav::Settings => {
                info!(
                    "{}: user {} ({}), locale {}, {} known users",
                    section.label(),
                    state.current_user.name,
                    state.current_user.id,
                    state.config.locale,
                    state.users.len()
                );
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("FeiQ v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();
    let data = load_data(std::env::args_os().nth(1).map(PathBuf::from))?;
    let state = AppState::new(config, data, Box::new(TracingActionSink))
        .context("failed to build application state")?;

    log_summary(&state);
    Ok(())
}
