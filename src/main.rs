//! Docgate - PII boundary filter and protocol gate for document
//! translation services.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docgate::api::{build_app, build_state};
use docgate::config::GateConfig;
use docgate::filter::FilterMode;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docgate")]
#[command(version)]
#[command(about = "PII boundary filter and protocol gate")]
struct Cli {
    /// Configuration file path (.json)
    #[arg(short, long, env = "DOCGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the boundary gate server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the capability card JSON
    Card,

    /// Run the security filter over text from an argument or stdin
    Scan {
        /// Text to scan (reads stdin when omitted)
        text: Option<String>,

        /// Filter mode: detect, mask, or verify
        #[arg(long, default_value = "mask")]
        mode: String,

        /// Apply the policy for this document type instead of the raw filter
        #[arg(long)]
        document_type: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("docgate={log_level},tower_http=debug").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            serve(config, host, port).await?;
        }
        Commands::Card => {
            println!(
                "{}",
                serde_json::to_string_pretty(&docgate::protocol::capability_card())?
            );
        }
        Commands::Scan {
            text,
            mode,
            document_type,
        } => {
            scan(&config, text, &mode, document_type.as_deref())?;
        }
        Commands::Config { default } => {
            let shown = if default { GateConfig::default() } else { config };
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Config loading: explicit path > ./docgate.json > defaults
// ---------------------------------------------------------------------------

fn load_config(explicit_path: Option<&std::path::Path>) -> Result<GateConfig> {
    if let Some(path) = explicit_path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        tracing::info!("Loading config from {}", path.display());
        return GateConfig::from_json(&content);
    }

    if std::path::Path::new("docgate.json").exists() {
        let content = std::fs::read_to_string("docgate.json")
            .context("Failed to read ./docgate.json")?;
        tracing::info!("Loading config from ./docgate.json");
        return GateConfig::from_json(&content);
    }

    Ok(GateConfig::default())
}

// ---------------------------------------------------------------------------
// serve — bind and run the HTTP application
// ---------------------------------------------------------------------------

async fn serve(mut config: GateConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = build_state(&config).context("Failed to build gate state")?;
    let app = build_app(state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Docgate listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {e}");
        return;
    }
    tracing::info!("Shutting down");
}

// ---------------------------------------------------------------------------
// scan — one-shot filtering from the command line
// ---------------------------------------------------------------------------

fn scan(
    config: &GateConfig,
    text: Option<String>,
    mode: &str,
    document_type: Option<&str>,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let state = build_state(config).context("Failed to build gate state")?;
    let report = match document_type {
        Some(doc_type) => state.policy.apply(&text, doc_type),
        None => {
            // Reject bad modes up front so the CLI exits non-zero instead
            // of printing an error report.
            let mode: FilterMode = mode
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            state.filter.apply(&text, mode, true)
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
