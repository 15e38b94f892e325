//! Cron-based scheduler driving the daily evaluation cycle

use crate::jobs::{run_today, JobContext};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Runs one daily cycle per cron tick.
pub struct DailyScheduler {
    ctx: Arc<JobContext>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl DailyScheduler {
    /// `cron_expr` uses the six-field format: second minute hour day month weekday.
    pub fn new(
        ctx: Arc<JobContext>,
        cron_expr: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(cron = %cron_expr, "DailyScheduler: created");

        Ok(Self {
            ctx,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn next_run(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.schedule.upcoming(chrono::Utc).next()
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = self.ctx.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("DailyScheduler: started, waiting for cron schedule...");

            loop {
                match schedule.upcoming(chrono::Utc).next() {
                    Some(next_tick) => {
                        let now = chrono::Utc::now();
                        if next_tick > now {
                            info!(next_run = %next_tick, "DailyScheduler: sleeping until next run");
                            let duration = (next_tick - now).to_std().unwrap_or_default();
                            tokio::time::sleep(duration).await;
                        }
                    }
                    None => {
                        tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                        continue;
                    }
                }

                info!("DailyScheduler: cron tick, running daily cycle");
                match run_today(&ctx).await {
                    Ok(evaluation) => {
                        info!(
                            date = %evaluation.date,
                            alerts = evaluation.alerts.len(),
                            "DailyScheduler: cycle completed"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "DailyScheduler: cycle failed");
                    }
                }
            }
        });

        *self.handle.write().await = Some(handle);
        info!("DailyScheduler: started successfully");
        Ok(())
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("DailyScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
