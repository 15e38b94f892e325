//! Shared builders for unit tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use cyclewatch::models::evaluation::DailyInputs;
use cyclewatch::models::price::PricePoint;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Day `n` counted from 2024-01-01.
pub fn day(n: i64) -> NaiveDate {
    date(2024, 1, 1) + Duration::days(n)
}

/// Consecutive daily points starting at `start`.
pub fn series_from(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(start + Duration::days(i as i64), c))
        .collect()
}

pub fn linear(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// 350 flat closes at 100 followed by `jump_days` closes at 3300. The
/// 111DMA first reaches 2x the 350DMA on the tenth day at 3300.
pub fn pi_cycle_cross_series(jump_days: usize) -> Vec<f64> {
    let mut closes = vec![100.0; 350];
    closes.extend(std::iter::repeat(3300.0).take(jump_days));
    closes
}

/// Inputs for `date = last BTC point` with a full BTC history and a short
/// MSTR history.
pub fn inputs_for(btc: &[f64], mvrv: Option<f64>, mstr: &[f64], iv_rank: Option<f64>) -> DailyInputs {
    let btc_prices = series_from(day(0), btc);
    let date = btc_prices.last().map(|p| p.timestamp).unwrap_or(day(0));
    let mstr_start = date - Duration::days(mstr.len().saturating_sub(1) as i64);
    DailyInputs {
        date,
        btc_prices,
        btc_mvrv: mvrv,
        mstr_prices: series_from(mstr_start, mstr),
        mstr_iv_rank: iv_rank,
    }
}
