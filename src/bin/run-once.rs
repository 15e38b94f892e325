//! Cyclewatch single run
//!
//! Runs one daily cycle (today, or the date given as the first argument) and
//! prints the evaluation as JSON.

use chrono::NaiveDate;
use cyclewatch::config::Config;
use cyclewatch::jobs::{run_daily_cycle, JobContext};
use cyclewatch::logging;
use dotenvy::dotenv;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let date = match env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .map_err(|e| format!("Invalid date '{}': {}", arg, e))?,
        None => chrono::Utc::now().date_naive(),
    };

    info!(date = %date, "Running single evaluation");
    let ctx = JobContext::from_config(Config::from_env()?, None).await;
    let evaluation = run_daily_cycle(&ctx, date).await?;

    println!("{}", serde_json::to_string_pretty(&evaluation)?);

    if !evaluation.data_quality.is_complete() {
        info!(
            btc_issues = ?evaluation.data_quality.btc_issues,
            mstr_issues = ?evaluation.data_quality.mstr_issues,
            "Evaluation incomplete, report would not be sent"
        );
    }

    Ok(())
}
