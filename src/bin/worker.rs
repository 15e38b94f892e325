//! Cyclewatch Worker
//!
//! Runs the daily evaluation cycle on the `EVAL_CRON` schedule.

use cyclewatch::config::Config;
use cyclewatch::core::DailyScheduler;
use cyclewatch::jobs::JobContext;
use cyclewatch::logging;
use cyclewatch::metrics::Metrics;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let env = cyclewatch::config::get_environment();
    info!("Starting Cyclewatch Worker");
    info!(environment = %env, cron = %config.eval_cron, "Environment");

    let metrics = Arc::new(Metrics::new()?);
    let cron_expr = config.eval_cron.clone();
    let ctx = Arc::new(JobContext::from_config(config, Some(metrics)).await);

    let scheduler = DailyScheduler::new(ctx, &cron_expr)?;
    if let Some(next) = scheduler.next_run() {
        info!(next_run = %next, "Next evaluation scheduled");
    }
    scheduler.start().await?;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
