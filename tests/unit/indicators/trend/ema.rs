//! Unit tests for EMA indicator

use crate::fixtures::{day, linear, series_from};
use cyclewatch::indicators::trend::ema::{calculate_ema, ema};
use cyclewatch::CoreError;

#[test]
fn ema_rejects_zero_period() {
    assert!(matches!(ema(&[1.0, 2.0], 0), Err(CoreError::InvalidInput(_))));
}

#[test]
fn ema_short_series_is_insufficient_data() {
    let series = linear(199, 100.0, 1.0);
    assert_eq!(
        ema(&series, 200),
        Err(CoreError::InsufficientData {
            indicator: "ema",
            required: 200,
            available: 199,
        })
    );
}

#[test]
fn ema_of_constant_series_equals_constant() {
    let series = vec![100.0; 250];
    let value = ema(&series, 200).unwrap();
    assert!((value - 100.0).abs() < 1e-9);
}

#[test]
fn ema_is_seeded_with_sma() {
    assert_eq!(ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 5).unwrap(), 3.0);
}

#[test]
fn ema_applies_smoothing_after_seed() {
    // seed 2.0, alpha 0.5: 4 -> 3, 5 -> 4, 6 -> 5
    let value = ema(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
    assert!((value - 5.0).abs() < 1e-12);
}

#[test]
fn ema_lags_a_rising_series() {
    let series = linear(300, 100.0, 1.0);
    let value = ema(&series, 200).unwrap();
    let last = *series.last().unwrap();
    assert!(value < last);
    assert!(value > series[0]);
}

#[test]
fn calculate_ema_reports_period() {
    let prices = series_from(day(0), &vec![50.0; 200]);
    let indicator = calculate_ema(&prices, 200).unwrap();
    assert_eq!(indicator.period, 200);
    assert!((indicator.value - 50.0).abs() < 1e-9);
}
