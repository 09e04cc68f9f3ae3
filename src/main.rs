//! weather-api: cached weather forecast service.
//!
//! HTTP service that serves tomorrow.io forecasts for a named location
//! through a 12-hour S3 cache:
//! 1. Reads the cached forecast object for the location
//! 2. Serves it when younger than the TTL
//! 3. Otherwise fetches fresh data and writes it back for future requests

mod config;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use tracing::{error, info, warn};

use forecast_cache::ForecastService;
use object_store::S3Store;
use routes::{build_router, AppState};
use tomorrow_client::TomorrowClient;

/// Cached weather forecast API
#[derive(Parser)]
#[command(name = "weather-api", about = "Cached weather forecast API")]
struct Cli {
    /// Validate configuration and exit.
    #[arg(long)]
    check_config: bool,

    /// Fetch the forecast for a location once, print it, and exit.
    #[arg(long, value_name = "LOCATION")]
    fetch: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "weather_api=info,forecast_cache=info,object_store=info,tomorrow_client=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check_config {
        info!(
            "Configuration OK: bucket={}, region={}, ttl={}s, default_location={}",
            cfg.bucket, cfg.aws_region, cfg.timing.cache_ttl_secs, cfg.default_location
        );
        return;
    }

    let api_key_present = !cfg.api_key.trim().is_empty();
    if !api_key_present {
        warn!("API_KEY is not set; forecast requests will fail until it is configured");
    }

    let store = Arc::new(S3Store::from_env(cfg.bucket.clone(), cfg.aws_region.clone()).await);
    let source = Arc::new(TomorrowClient::new(
        cfg.api_key.clone(),
        cfg.timing.upstream_timeout_secs,
    ));
    let service = ForecastService::new(
        store,
        source,
        Duration::seconds(cfg.timing.cache_ttl_secs as i64),
    );

    // ── One-shot fetch mode ──────────────────────────────────────────
    if let Some(location) = cli.fetch {
        if !api_key_present {
            error!("API_KEY is required for --fetch");
            std::process::exit(1);
        }
        match service.get_forecast(&location).await {
            Ok(payload) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
                );
            }
            Err(e) => {
                error!("Forecast fetch failed for {}: {}", location, e);
                std::process::exit(1);
            }
        }
        return;
    }

    // ── HTTP server ──────────────────────────────────────────────────
    let state = Arc::new(AppState {
        service,
        api_key_present,
        default_location: cfg.default_location.clone(),
    });
    let app = build_router(state);

    let addr: SocketAddr = match format!("{}:{}", cfg.bind, cfg.port).parse() {
        Ok(a) => a,
        Err(e) => {
            error!("Invalid bind address {}:{}: {}", cfg.bind, cfg.port, e);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!(
        "🌤️  weather-api listening on {} (bucket={}, ttl={}s)",
        addr, cfg.bucket, cfg.timing.cache_ttl_secs
    );

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("weather-api shut down.");
}
