mod api;
mod blackout;
mod cache;
mod calendar;
mod config;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::cache::calendar_cache::CalendarCache;
use crate::calendar::sources::{SourceKind, calendar_source};
use crate::config::bridge_config::BridgeConfig;

#[derive(Debug, Clone, Parser)]
struct Args {
    #[arg(long, env = "CALENDAR_SOURCE", value_enum, default_value = "trading-economics")]
    pub source: SourceKind,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("news_blackout_bridge=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = BridgeConfig::from_env().context("failed to load bridge configuration")?;
    info!(?config, source = %args.source, "starting news blackout bridge");

    if config.bridge_token.is_none() {
        warn!("BRIDGE_TOKEN not set; every status request will be rejected");
    }

    let source = calendar_source(args.source, &config)?;
    let cache = CalendarCache::new(source, config.cache_ttl);
    let state = AppState::new(config.bridge_token.clone(), config.default_window, cache);

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
