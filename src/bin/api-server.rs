//! Cyclewatch API Server
//!
//! HTTP API with health check, metrics, current signal state, the latest
//! evaluation and a manual evaluation trigger.

use cyclewatch::config::Config;
use cyclewatch::core::http::start_server;
use cyclewatch::jobs::JobContext;
use cyclewatch::logging;
use cyclewatch::metrics::Metrics;
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let env = cyclewatch::config::get_environment();
    info!("Starting Cyclewatch API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);
    let jobs = Arc::new(JobContext::from_config(Config::from_env()?, Some(metrics.clone())).await);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, Some(jobs), metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
