use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use newsdeck::api::NewsClient;
use newsdeck::app::{build_http_client, App, AppEvent, ScreenId};
use newsdeck::config::{Config, StartScreen};
use newsdeck::feed::FilterState;
use newsdeck::theme::ThemeVariant;
use newsdeck::ui;

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdeck", about = "Terminal news reader", version)]
struct Args {
    /// News API base URL (overrides config and NEWSDECK_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// API access token (overrides config and NEWSDECK_API_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Config file path (default: ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Screen to open on startup
    #[arg(long, value_enum)]
    screen: Option<StartScreen>,

    /// Initial category filter for the News Feed screen
    #[arg(long)]
    category: Option<String>,

    /// Initial tag filter for the News Feed screen
    #[arg(long)]
    tag: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Initialize tracing. Logs go to `log_file` when given, since stderr output
/// would be drawn over by the TUI.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        .with_env(|key| std::env::var(key).ok());

    // Command-line flags override file and environment
    if let Some(url) = args.api_url {
        config.api_url = Some(url);
    }
    if let Some(token) = args.token {
        config.api_token = Some(token);
    }
    if let Some(screen) = args.screen {
        config.start_screen = screen;
    }
    tracing::debug!(config = ?config, "Resolved configuration");

    let api_url = config.require_api_url()?.to_string();
    let token = match config.api_token.clone() {
        Some(token) => token,
        None => {
            tracing::warn!("No API token configured; requests will send an empty token");
            String::new()
        }
    };

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    let http = build_http_client().context("Failed to build HTTP client")?;
    let client = NewsClient::new(
        http,
        &api_url,
        SecretString::from(token),
        config.request_timeout(),
    )
    .context("Invalid API URL")?;

    let mut app = App::new(
        client,
        theme,
        ScreenId::from(config.start_screen),
        FilterState::new(args.category, args.tag),
    );

    // Event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
