//! # Sentinel Server
//!
//! Web dashboard serving cached COVID-19 statistics and news headlines.
//!
//! ## Overview
//!
//! - **Snapshots**: the latest local and national statistics plus a news
//!   log, refreshed by scheduled fetches and rendered on every page view
//! - **Scheduled updates**: one-off or repeating refreshes submitted
//!   through the page form and reconciled per render
//! - **Seeded startup**: both external APIs are fetched once before the
//!   listener binds; either failing is fatal

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sentinel_core::providers::{CovidApiProvider, NewsApiProvider};
use sentinel_server::{AppState, Config, routes, startup};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "sentinel-server")]
#[command(about = "COVID-19 statistics and news dashboard")]
struct Cli {
    /// Bind host, overriding SERVER_HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overriding SERVER_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server_host = host;
    }
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    info!("program launched");

    let stats_provider = Arc::new(CovidApiProvider::new(&config.stats_api_base));
    let news_provider = Arc::new(NewsApiProvider::new(
        &config.news_api_base,
        &config.news_api_key,
    ));
    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    let state = AppState::new(config, stats_provider, news_provider);

    if let Err(err) = startup::seed_snapshots(&state).await {
        error!(error = %err, "startup fetch failed, terminating");
        return Err(err);
    }
    info!("snapshots seeded");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "dashboard listening");

    axum::serve(listener, routes::create_router(state)).await?;
    Ok(())
}
