//! RSI (Relative Strength Index) on weekly closes
//!
//! RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss,
//! with Wilder smoothing of the averages.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{CoreError, Result};
use crate::models::indicators::RsiIndicator;
use crate::models::price::{closes, PricePoint};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Friday on or after `date`; weeks run Saturday through Friday.
pub fn week_ending_friday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday() as i64;
    let friday = chrono::Weekday::Fri.num_days_from_monday() as i64;
    date + Duration::days((friday - weekday).rem_euclid(7))
}

/// Resample ascending daily closes to one point per Friday-anchored week.
///
/// The last close inside each week becomes the weekly close, stamped with the
/// week's Friday. A trailing partial week is kept.
pub fn resample_weekly(prices: &[PricePoint]) -> Vec<PricePoint> {
    let mut weekly: Vec<PricePoint> = Vec::new();
    for point in prices {
        let week = week_ending_friday(point.timestamp);
        match weekly.last_mut() {
            Some(last) if last.timestamp == week => last.close = point.close,
            _ => weekly.push(PricePoint::new(week, point.close)),
        }
    }
    weekly
}

/// Wilder RSI over an ordered series.
///
/// Averages are seeded with the simple mean of the first `period` deltas and
/// smoothed through the remaining ones. A zero average loss yields 100.
pub fn rsi(series: &[f64], period: usize) -> Result<f64> {
    if period == 0 {
        return Err(CoreError::invalid("RSI period must be >= 1"));
    }
    if series.len() < period + 1 {
        return Err(CoreError::insufficient("rsi", period + 1, series.len()));
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = series
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    let p = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / p;

    for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
    }

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - (100.0 / (1.0 + rs)))
}

/// Weekly RSI from daily closes.
pub fn calculate_weekly_rsi(prices: &[PricePoint], period: usize) -> Result<RsiIndicator> {
    let weekly = resample_weekly(prices);
    let value = rsi(&closes(&weekly), period).map_err(|e| match e {
        CoreError::InsufficientData {
            required,
            available,
            ..
        } => CoreError::insufficient("weekly_rsi", required, available),
        other => other,
    })?;

    Ok(RsiIndicator {
        value,
        period,
        weeks: weekly.len(),
    })
}
