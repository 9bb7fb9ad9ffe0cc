use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod prompt;
mod screens;

use auth_cell::{FileSessionStore, SessionManager};
use shared_config::AppConfig;

use cli::Cli;
use prompt::Prompt;
use screens::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("Configuration is incomplete, check API_BASE_URL and SESSION_FILE");
    }
    info!("Using clinic backend at {}", config.api_base_url);

    let store = FileSessionStore::new(config.session_file.clone());
    let sessions = SessionManager::init(Box::new(store), Utc::now())?;

    let mut ctx = Context {
        config,
        sessions,
        prompt: Prompt::new(),
    };

    screens::run(&mut ctx, cli.command).await
}
