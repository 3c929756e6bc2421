use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod catalog;
mod client;
mod config;
mod errors;
mod handler;
mod models;
mod ollama;
mod server;
mod transcript;
mod tui;
mod ui;

use app::App;
use catalog::Catalog;
use client::ChatClient;
use config::Config;
use ollama::OllamaClient;
use server::ShopService;
use tui::EventHandler;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

#[derive(Parser)]
#[command(name = "gameshop")]
#[command(about = "Terminal chat client and backend service for a game shop assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the shop assistant (interactive)
    Chat {
        /// Backend endpoint to talk to
        #[arg(short, long)]
        endpoint: Option<String>,
    },
    /// Run the backend HTTP service
    Serve {
        /// Path to the game catalog
        #[arg(short, long, default_value = "data/games.json")]
        catalog: PathBuf,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Ollama base URL
        #[arg(long)]
        ollama_url: Option<String>,
        /// Ollama model to answer with
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List available Ollama models
    Models {
        /// Ollama base URL
        #[arg(long)]
        ollama_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config")?;

    match cli.command {
        Commands::Chat { endpoint } => {
            let endpoint = endpoint
                .or(config.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
            run_chat(&endpoint).await
        }
        Commands::Serve {
            catalog,
            port,
            ollama_url,
            model,
        } => run_server(&config, &catalog, port, ollama_url, model).await,
        Commands::Models { ollama_url } => {
            let ollama_url = resolve_ollama_url(ollama_url, &config);
            list_models(&ollama_url).await
        }
    }
}

async fn run_chat(endpoint: &str) -> Result<()> {
    init_client_logging();
    tui::install_panic_hook();

    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let sender = events.sender();
    let mut app = App::new(ChatClient::new(endpoint));

    let result = run_event_loop(&mut terminal, &mut events, &sender, &mut app).await;
    tui::restore()?;
    result
}

async fn run_event_loop(
    terminal: &mut tui::Tui,
    events: &mut EventHandler,
    sender: &tui::EventSender,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        if let Some(event) = events.next().await {
            handler::handle_event(app, event, sender);
        }
    }
    Ok(())
}

/// Route tracing output to a log file. The chat screen owns the terminal,
/// so diagnostics cannot go to stderr while it is up.
fn init_client_logging() {
    let log_dir = match dirs::data_local_dir() {
        Some(dir) => dir.join("gameshop"),
        None => return,
    };
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let file = match OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_dir.join("client.log"))
    {
        Ok(file) => file,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "gameshop=debug".into()))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}

async fn run_server(
    config: &Config,
    catalog_path: &Path,
    port: Option<u16>,
    ollama_url: Option<String>,
    model: Option<String>,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gameshop=debug,tower_http=debug".into()),
        )
        .init();

    let catalog = Catalog::load(catalog_path)?;
    if catalog.is_empty() {
        warn!("Catalog {} has no games", catalog_path.display());
    }
    info!(
        "Loaded {} games from {}",
        catalog.len(),
        catalog_path.display()
    );

    let ollama_url = resolve_ollama_url(ollama_url, config);
    let model = model
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let service = ShopService::new(catalog, OllamaClient::new(&ollama_url), &model);

    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{port}");
    server::serve(service, &addr).await
}

fn resolve_ollama_url(flag: Option<String>, config: &Config) -> String {
    flag.or_else(|| std::env::var("OLLAMA_API_BASE_URL").ok())
        .or_else(|| config.ollama_url.clone())
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
}

async fn list_models(ollama_url: &str) -> Result<()> {
    let ollama = OllamaClient::new(ollama_url);

    match ollama.list_models().await {
        Ok(models) => {
            if models.is_empty() {
                println!("No models installed. Pull one with: ollama pull {DEFAULT_MODEL}");
            } else {
                for model in models {
                    println!("{model}");
                }
            }
        }
        Err(e) => {
            eprintln!("Error connecting to Ollama: {e}");
            eprintln!("Make sure Ollama is running with: ollama serve");
        }
    }

    Ok(())
}
