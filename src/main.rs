// Policy Guardian - command line entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use policy_guardian::commands::{self, get_settings, reset_settings};
use policy_guardian::services::page::StaticPageCollector;
use policy_guardian::services::scan::{JsonFileBackend, ScanEvent};
use policy_guardian::storage::ConfigService;
use policy_guardian::utils::paths::session_state_dir;
use policy_guardian::AppState;
use policy_guardian_core::{PageType, TabId};
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser)]
#[command(
    name = "policy-guardian",
    version,
    about = "Detect and review terms of service and privacy policy pages"
)]
struct Cli {
    /// Configuration file (default: ~/.policy-guardian/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a page is a terms or privacy page
    Classify {
        /// Page file (.json snapshot or plain text)
        page: PathBuf,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the opening sentences of a page without analyzing it
    Preview {
        page: PathBuf,
    },
    /// Analyze a page and print the result
    Analyze {
        page: PathBuf,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// terms-of-service or privacy-policy
        #[arg(long)]
        page_type: Option<String>,
    },
    /// Run the full detect and scan lifecycle, printing each event
    Scan {
        page: PathBuf,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value_t = 1)]
        tab_id: TabId,
        /// Keep scan state on disk (the configured stateDir, else the session directory)
        #[arg(long)]
        persist: bool,
    },
    /// Show the effective configuration
    Config {
        /// Overwrite the configuration file with defaults first
        #[arg(long)]
        reset: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_config(path: Option<PathBuf>) -> anyhow::Result<ConfigService> {
    let service = match path {
        Some(path) => ConfigService::open(path)?,
        None => ConfigService::new()?,
    };
    Ok(service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_guardian=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config_service = open_config(cli.config).context("loading configuration")?;

    match cli.command {
        Commands::Config { reset } => {
            let resp = if reset {
                reset_settings(&mut config_service)
            } else {
                get_settings(&config_service)
            };
            print_json(&resp)?;
        }
        Commands::Classify { page, url, title } => {
            let snapshot = commands::load_snapshot(&page, url, title)?;
            let collector = Arc::new(StaticPageCollector::new());
            let state = AppState::new(config_service.effective_config(), collector)?;
            print_json(&commands::classify_page(&state, &snapshot))?;
        }
        Commands::Preview { page } => {
            let snapshot = commands::load_snapshot(&page, None, None)?;
            let collector = Arc::new(StaticPageCollector::new());
            let state = AppState::new(config_service.effective_config(), collector)?;
            print_json(&commands::preview_page(&state, &snapshot))?;
        }
        Commands::Analyze {
            page,
            url,
            title,
            page_type,
        } => {
            let page_type = match page_type.as_deref() {
                Some(raw) => Some(
                    PageType::parse(raw)
                        .with_context(|| format!("unknown page type '{}'", raw))?,
                ),
                None => None,
            };
            let snapshot = commands::load_snapshot(&page, url, title)?;
            let collector = Arc::new(StaticPageCollector::new());
            let state = AppState::new(config_service.effective_config(), collector)?;
            print_json(&commands::analyze_page(&state, &snapshot, page_type).await)?;
        }
        Commands::Scan {
            page,
            url,
            title,
            tab_id,
            persist,
        } => {
            let snapshot = commands::load_snapshot(&page, url, title)?;
            let mut config = config_service.effective_config();
            if persist && config.state_dir.is_none() {
                let dir = session_state_dir()?;
                let purged = JsonFileBackend::new(&dir)
                    .purge()
                    .await
                    .context("failed to purge session state")?;
                tracing::debug!(dir = %dir.display(), purged, "Starting persisted session");
                config.state_dir = Some(dir);
            }
            let collector = Arc::new(StaticPageCollector::new());
            let state = AppState::new(config, collector.clone())?;
            collector.insert(
                tab_id,
                snapshot.content(snapshot.structured(&state.config().structure)),
            );

            let mut events = state.scan_service().subscribe();

            if let Some(detection) = state.classifier().classify_snapshot(&snapshot) {
                let message = json!({
                    "type": "policy-detected",
                    "tabId": tab_id,
                    "payload": detection,
                });
                state.handle_message(message, None).await;
            }

            let resp = state
                .handle_message(json!({"type": "start-scan", "tabId": tab_id, "origin": "cli"}), None)
                .await;
            if !resp.ok {
                print_json(&resp)?;
                return Ok(());
            }

            loop {
                match events.recv().await {
                    Ok(event) => {
                        println!("{}", serde_json::to_string(&event)?);
                        if is_terminal_for(&event, tab_id) {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }

            let resp = state
                .handle_message(json!({"type": "get-state", "tabId": tab_id}), None)
                .await;
            print_json(&resp)?;
        }
    }

    Ok(())
}

fn is_terminal_for(event: &ScanEvent, tab_id: TabId) -> bool {
    event.is_terminal() && event.tab_id() == tab_id
}
