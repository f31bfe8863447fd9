mod config;
mod routes;
mod stats;

use axum::routing::get;
use clap::Parser;
use config::Config;
use routes::AppState;
use rtp_core::CalibratedState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// HTTP outcome generator calibrated to a target RTP.
#[derive(Parser)]
#[command(name = "rtp-server")]
struct Args {
    /// Target win rate in (0, 1]. Overrides the config file.
    #[arg(long)]
    rtp: Option<f64>,

    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Listen address. Overrides the config file.
    #[arg(long)]
    listen_addr: Option<String>,

    /// Seed for a reproducible outcome sequence
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let args = Args::parse();

    let config = if args.config.exists() {
        match Config::load(&args.config) {
            Ok(c) => {
                tracing::info!(path = %args.config.display(), "loaded config");
                c
            }
            Err(e) => {
                tracing::error!(error = %e, path = %args.config.display(), "failed to load config");
                std::process::exit(1);
            }
        }
    } else {
        tracing::info!(path = %args.config.display(), "no config file found, using defaults");
        Config::default()
    };
    let config = config.with_overrides(args.rtp, args.listen_addr, args.seed);

    // Calibration runs once, before the listener is bound.
    let generator = match CalibratedState::initialize_with(
        config.generator.rtp,
        config.generator.partition_size,
        config.generator.calibrator(),
    ) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!(error = %e, "invalid generator configuration");
            std::process::exit(1);
        }
    };

    let prom_handle = match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()
    {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "failed to install prometheus recorder");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(generator, config.generator.seed));

    let app = routes::router(Arc::clone(&state)).route(
        "/metrics",
        get(move || {
            let h = prom_handle.clone();
            async move { h.render() }
        }),
    );
    let app = routes::with_layers(app, config.server.request_timeout());

    let addr = config.server.listen_addr.clone();
    tracing::info!(
        addr = %addr,
        rtp = config.generator.rtp,
        gamma = state.generator.gamma(),
        partition_size = config.generator.partition_size,
        seeded = config.generator.seed.is_some(),
        "rtp server starting"
    );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, addr = %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal(shutdown_clone).await;
    });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!(served = state.stats.served(), "rtp server shut down");
}

/// Listen for SIGINT (Ctrl+C) or SIGTERM and cancel the shutdown token.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                ctrl_c.await.ok();
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }

    tracing::info!("shutdown signal received, draining connections...");
    token.cancel();
}
