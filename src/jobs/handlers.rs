//! Daily cycle: fetch inputs, evaluate, persist.

use crate::jobs::context::JobContext;
use crate::models::evaluation::{DailyEvaluation, DailyInputs};
use crate::models::price::PricePoint;
use crate::models::signal::{SignalName, SignalState};
use crate::signals::{InMemoryStateStore, StateStore};
use chrono::{NaiveDate, Utc};
use std::time::Instant;
use tracing::{error, info, warn};

pub type JobResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

async fn fetch_closes(ctx: &JobContext, asset: &str, symbol: &str) -> (Vec<PricePoint>, Option<String>) {
    match ctx
        .data_provider
        .daily_closes(symbol, ctx.config.price_history_days)
        .await
    {
        Ok(points) => {
            info!(asset = asset, symbol = symbol, points = points.len(), "Fetched price history");
            (points, None)
        }
        Err(e) => {
            warn!(asset = asset, symbol = symbol, error = %e, "Price history unavailable");
            if let Some(metrics) = &ctx.metrics {
                metrics
                    .provider_failures_total
                    .with_label_values(&[ctx.data_provider.name()])
                    .inc();
            }
            (Vec::new(), Some(format!("{}: {}", asset, e)))
        }
    }
}

/// Fetch the day's inputs. Provider failures leave that asset's series
/// empty and are returned as messages.
pub async fn fetch_inputs(ctx: &JobContext, date: NaiveDate) -> (DailyInputs, Vec<String>) {
    let (btc_prices, btc_error) = fetch_closes(ctx, "BTC", &ctx.config.btc_symbol).await;
    let (mstr_prices, mstr_error) = fetch_closes(ctx, "MSTR", &ctx.config.mstr_symbol).await;

    let btc_mvrv = ctx.config.btc_mvrv_on(date);
    if btc_mvrv.is_none() && ctx.config.btc_mvrv.is_some() {
        warn!(
            date = %date,
            observed_on = ?ctx.config.btc_mvrv_date,
            "Configured MVRV is not dated for this cycle, treating as missing"
        );
    }
    let mstr_iv_rank = ctx.config.mstr_iv_rank_on(date);
    if mstr_iv_rank.is_none() && ctx.config.mstr_iv_rank.is_some() {
        warn!(
            date = %date,
            observed_on = ?ctx.config.mstr_iv_rank_date,
            "Configured IV rank is not dated for this cycle, treating as missing"
        );
    }

    let inputs = DailyInputs {
        date,
        btc_prices: btc_prices
            .into_iter()
            .filter(|p| p.timestamp <= date)
            .collect(),
        btc_mvrv,
        mstr_prices: mstr_prices
            .into_iter()
            .filter(|p| p.timestamp <= date)
            .collect(),
        mstr_iv_rank,
    };

    (inputs, btc_error.into_iter().chain(mstr_error).collect())
}

/// Evaluate already-fetched inputs under the cycle lock and persist the
/// result. State is only committed when the whole evaluation succeeds.
pub async fn run_with_inputs(ctx: &JobContext, inputs: &DailyInputs) -> JobResult<DailyEvaluation> {
    let start = Instant::now();
    let mut store = ctx.store.lock().await;

    if let Some(db) = &ctx.database {
        *store = InMemoryStateStore::from_states(db.load_states().await?);
    }

    let mut working = store.clone();
    let evaluation = match ctx.engine.evaluate_daily(inputs, &mut working) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            error!(date = %inputs.date, error = %e, "Daily evaluation failed");
            if let Some(metrics) = &ctx.metrics {
                metrics.evaluations_total.with_label_values(&["failed"]).inc();
            }
            return Err(e.into());
        }
    };

    if let Some(db) = &ctx.database {
        db.persist_run(&working.states(), &evaluation).await?;
    }
    *store = working;
    drop(store);

    *ctx.latest.write().await = Some(evaluation.clone());

    if let Some(metrics) = &ctx.metrics {
        metrics.record_evaluation(&evaluation);
        metrics
            .evaluation_duration_seconds
            .observe(start.elapsed().as_secs_f64());
    }

    Ok(evaluation)
}

/// Full cycle for `date`: fetch, evaluate, persist.
pub async fn run_daily_cycle(ctx: &JobContext, date: NaiveDate) -> JobResult<DailyEvaluation> {
    let start = Instant::now();
    info!(date = %date, "Daily cycle started");

    let (inputs, fetch_errors) = fetch_inputs(ctx, date).await;
    let mut evaluation = run_with_inputs(ctx, &inputs).await?;
    evaluation.errors.splice(0..0, fetch_errors);

    info!(
        date = %date,
        duration_ms = start.elapsed().as_millis() as u64,
        complete = evaluation.data_quality.is_complete(),
        "Daily cycle finished"
    );
    Ok(evaluation)
}

pub async fn run_today(ctx: &JobContext) -> JobResult<DailyEvaluation> {
    run_daily_cycle(ctx, Utc::now().date_naive()).await
}

/// Current state of every signal; never-evaluated signals are inactive.
pub async fn current_states(ctx: &JobContext) -> JobResult<Vec<SignalState>> {
    let store = match &ctx.database {
        Some(db) => InMemoryStateStore::from_states(db.load_states().await?),
        None => ctx.store.lock().await.clone(),
    };

    SignalName::ALL
        .iter()
        .map(|name| store.load_state(*name).map_err(Into::into))
        .collect()
}

pub async fn latest_evaluation(ctx: &JobContext) -> JobResult<Option<DailyEvaluation>> {
    if let Some(evaluation) = ctx.latest.read().await.clone() {
        return Ok(Some(evaluation));
    }
    match &ctx.database {
        Some(db) => db.latest_snapshot().await,
        None => Ok(None),
    }
}
