//! facetdoc-web - entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facetdoc_core::config::Config;
use facetdoc_text::TantivyIndexes;
use facetdoc_web::{create_router, AppState};

/// Lists and adds documents in a full-text search index.
#[derive(Parser, Debug)]
#[command(name = "facetdoc-web")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind (overrides server.host).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides server.port).
    #[arg(short, long)]
    port: Option<u16>,

    /// Root directory for on-disk indexes (overrides index.dir).
    #[arg(long, env = "FACETDOC_INDEX_DIR")]
    index_dir: Option<String>,

    /// Index the UI reads and writes (overrides index.name).
    #[arg(long)]
    index_name: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = Config::load().context("loading configuration")?;
    let mut settings = config.settings()?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(dir) = args.index_dir {
        settings.index.dir = Some(dir);
    }
    if let Some(name) = args.index_name {
        settings.index.name = name;
    }

    let base = std::env::current_dir().context("resolving working directory")?;
    let indexes = TantivyIndexes::from_settings(&settings.index, &base);
    match indexes.root() {
        Some(root) => tracing::info!("Storing indexes under {}", root.display()),
        None => tracing::warn!("No index.dir configured, documents are kept in memory only"),
    }

    let state = AppState::new(Arc::new(indexes), settings.index.name.as_str());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", settings.server.host, settings.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
