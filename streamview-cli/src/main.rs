use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use streamview_client::stats::HttpStreamInfo;
use streamview_client::{
    Collaborators, ControllerSnapshot, SessionStatus, TransportKind, ViewerConfig, ViewerController,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{TerminalLog, TerminalSurface};

#[derive(Parser)]
#[command(name = "streamview")]
#[command(about = "Terminal viewer for live game streams")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "viewer.toml")]
    config: String,

    /// Server endpoint, e.g. http://localhost:8080
    #[arg(long, global = true)]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a stream and report playback until Ctrl+C
    Watch {
        /// Stream key; prompted for when neither given nor configured
        #[arg(short = 'k', long)]
        stream_key: Option<String>,

        /// webrtc or hls
        #[arg(short, long)]
        transport: Option<TransportKind>,
    },

    /// List the streams the server knows about
    Streams,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "streamview={log_level},streamview_client={log_level},webrtc=warn"
        ))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = load_config(&cli.config)?;
    if let Some(server) = cli.server {
        config.server_endpoint = server;
    }

    match cli.command {
        Commands::Watch {
            stream_key,
            transport,
        } => {
            if let Some(stream_key) = stream_key {
                config.stream_key = stream_key;
            }
            if let Some(transport) = transport {
                config.transport = transport;
            }
            if config.stream_key.trim().is_empty() {
                config.stream_key = Input::new()
                    .with_prompt("Stream key")
                    .interact_text()
                    .context("Failed to read stream key")?;
            }
            watch(config).await
        }
        Commands::Streams => list_streams(&config).await,
    }
}

fn load_config(path: &str) -> Result<ViewerConfig> {
    if !Path::new(path).exists() {
        info!("No {} found, using default configuration", path);
        return Ok(ViewerConfig::default());
    }

    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let config: ViewerConfig =
        toml::from_str(&content).with_context(|| format!("Invalid configuration in {path}"))?;
    Ok(config)
}

async fn watch(config: ViewerConfig) -> Result<()> {
    println!(
        "{} {} via {}",
        "📺 Watching".green().bold(),
        config.stream_key.bold(),
        config.transport
    );

    let surface = Arc::new(TerminalSurface::new());
    let collaborators = Collaborators::production(surface, &config)
        .context("Failed to set up HTTP client")?
        .with_log_sink(Arc::new(TerminalLog));
    let controller = ViewerController::spawn(config, collaborators);

    controller.toggle_connection().await?;

    let mut updates = controller.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(5));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Controller stopped");
                    break;
                }
            }
            _ = ticker.tick() => {
                print_status(&controller.snapshot());
            }
        }
    }

    controller.shutdown().await?;
    println!("{}", "👋 Viewer stopped".green());
    Ok(())
}

fn print_status(snapshot: &ControllerSnapshot) {
    let status = match snapshot.status {
        SessionStatus::Connected => snapshot.status.to_string().green(),
        SessionStatus::Connecting => snapshot.status.to_string().yellow(),
        SessionStatus::Idle | SessionStatus::Disconnected => snapshot.status.to_string().red(),
    };
    let show = |v: Option<u32>, unit: &str| v.map_or("-".to_string(), |v| format!("{v} {unit}"));

    println!(
        "{} | bitrate {} | latency {} | viewers {}",
        status,
        show(snapshot.stats.bitrate_kbps, "kbps"),
        show(snapshot.stats.latency_ms, "ms"),
        show(snapshot.stats.viewer_count, ""),
    );
}

async fn list_streams(config: &ViewerConfig) -> Result<()> {
    let info = HttpStreamInfo::new(config.http_timeout())?;
    let streams = info
        .list_streams(&config.server_endpoint)
        .await
        .with_context(|| format!("Failed to list streams on {}", config.server_endpoint))?;

    if streams.is_empty() {
        println!("{}", "No streams".yellow());
        return Ok(());
    }

    for stream in streams {
        let live = if stream.is_live {
            "LIVE".red().bold()
        } else {
            "offline".dimmed()
        };
        println!(
            "{:<8} {:<24} {:>5} viewers  {}",
            live,
            stream.stream_key,
            stream.viewer_count,
            stream.title.unwrap_or_default()
        );
    }
    Ok(())
}
