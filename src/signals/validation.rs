//! Input and data-quality checks for a daily run.

use crate::error::{CoreError, Result};
use crate::models::indicators::IndicatorReading;
use crate::models::price::PricePoint;
use crate::models::valuation::ValuationResult;

/// Model prices outside this range indicate a broken reference input.
pub const MODEL_PRICE_RANGE: (f64, f64) = (1.0, 10_000.0);

/// Reject a price series the indicators cannot be computed from:
/// empty, non-positive or non-finite closes, or dates out of order.
pub fn validate_price_series(asset: &str, prices: &[PricePoint]) -> Result<()> {
    if prices.is_empty() {
        return Err(CoreError::invalid(format!("{}: no price data", asset)));
    }

    if let Some(bad) = prices
        .iter()
        .find(|p| !p.close.is_finite() || p.close <= 0.0)
    {
        return Err(CoreError::invalid(format!(
            "{}: invalid close {} on {}",
            asset, bad.close, bad.timestamp
        )));
    }

    if let Some(w) = prices.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
        return Err(CoreError::invalid(format!(
            "{}: prices not strictly ascending ({} then {})",
            asset, w[0].timestamp, w[1].timestamp
        )));
    }

    Ok(())
}

fn check_positive(issues: &mut Vec<String>, label: &str, value: Option<f64>) {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => {}
        Some(v) => issues.push(format!("Invalid {}: {}", label, v)),
        None => issues.push(format!("Missing {}", label)),
    }
}

/// BTC quality issues. The Pi-Cycle reading is optional and never an issue.
pub fn btc_issues(reading: &IndicatorReading) -> Vec<String> {
    let mut issues = Vec::new();
    check_positive(&mut issues, "price", reading.price);
    check_positive(&mut issues, "MVRV", reading.mvrv);
    check_positive(&mut issues, "weekly RSI", reading.weekly_rsi);
    check_positive(&mut issues, "EMA 200", reading.ema200);
    issues
}

pub fn mstr_issues(valuation: Option<&ValuationResult>, iv_rank: Option<f64>) -> Vec<String> {
    let mut issues = Vec::new();

    match valuation {
        Some(v) => {
            let (low, high) = MODEL_PRICE_RANGE;
            if !(low < v.model_price && v.model_price < high) {
                issues.push(format!("Invalid model price: {:.2}", v.model_price));
            }
            if !v.deviation_pct.is_finite() {
                issues.push("Missing deviation percentage".to_string());
            }
        }
        None => issues.push("Missing valuation".to_string()),
    }

    if iv_rank.is_none() {
        issues.push("Missing IV rank".to_string());
    }

    issues
}
