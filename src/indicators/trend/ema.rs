//! EMA (Exponential Moving Average) indicator

use crate::error::{CoreError, Result};
use crate::indicators::math;
use crate::models::indicators::EmaIndicator;
use crate::models::price::{closes, PricePoint};

/// EMA over an ordered series; needs at least `period` points.
pub fn ema(series: &[f64], period: usize) -> Result<f64> {
    if period == 0 {
        return Err(CoreError::invalid("EMA period must be >= 1"));
    }
    math::ema(series, period).ok_or(CoreError::insufficient("ema", period, series.len()))
}

/// Calculate EMA for a specific period from daily closes
pub fn calculate_ema(prices: &[PricePoint], period: usize) -> Result<EmaIndicator> {
    let value = ema(&closes(prices), period)?;
    Ok(EmaIndicator { value, period })
}
