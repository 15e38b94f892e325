//! Unit tests for configuration

use chrono::NaiveDate;
use cyclewatch::config::{Config, GracePeriods};
use cyclewatch::CoreError;
use std::env;

#[test]
fn defaults_match_documented_thresholds() {
    let config = Config::default();
    assert_eq!(config.grace, GracePeriods { btc_buy: 30, btc_sell: 30, pi_cycle_top: 30 });
    assert_eq!(config.thresholds.buy_mvrv_below, 1.0);
    assert_eq!(config.thresholds.sell_mvrv_above, 3.0);
    assert_eq!(config.thresholds.buy_rsi_below, 30.0);
    assert_eq!(config.thresholds.sell_rsi_above, 70.0);
    assert_eq!(config.volatility.low_below, 25.0);
    assert_eq!(config.volatility.high_above, 75.0);
    assert_eq!(config.periods.ema, 200);
    assert_eq!(config.periods.rsi, 14);
    assert!(config.polygon_api_key.is_none());
    assert!(config.btc_mvrv_date.is_none());
}

#[test]
fn negative_grace_windows_are_invalid() {
    let grace = GracePeriods { btc_sell: -1, ..GracePeriods::default() };
    assert!(grace.validate().is_err());
    assert!(GracePeriods::default().validate().is_ok());
}

// The only test in this binary that touches the process environment
#[test]
fn from_env_overrides_ignores_garbage_and_rejects_negative_grace() {
    env::set_var("BTC_SELL_GRACE_DAYS", "14");
    env::set_var("IV_HIGH_ABOVE", " 80 ");
    env::set_var("PRICE_HISTORY_DAYS", "not-a-number");
    env::set_var("BTC_MVRV", "2.4");
    env::set_var("BTC_MVRV_DATE", "2025-06-01");
    env::set_var("MSTR_IV_RANK", "45");
    env::set_var("POLYGON_API_KEY", "");

    let config = Config::from_env().unwrap();

    assert_eq!(config.grace.btc_sell, 14);
    assert_eq!(config.grace.btc_buy, 30);
    assert_eq!(config.volatility.high_above, 80.0);
    assert_eq!(config.price_history_days, Config::default().price_history_days);
    assert_eq!(config.btc_mvrv, Some(2.4));
    assert!(config.polygon_api_key.is_none());

    let observed = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    assert_eq!(config.btc_mvrv_date, Some(observed));
    assert_eq!(config.btc_mvrv_on(observed), Some(2.4));
    assert_eq!(config.btc_mvrv_on(observed.succ_opt().unwrap()), None);
    // An undated IV rank never applies to a cycle.
    assert_eq!(config.mstr_iv_rank, Some(45.0));
    assert_eq!(config.mstr_iv_rank_on(observed), None);

    env::set_var("PI_CYCLE_GRACE_DAYS", "-3");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(ref msg) if msg.contains("PI_CYCLE_GRACE_DAYS")));

    for key in [
        "BTC_SELL_GRACE_DAYS",
        "IV_HIGH_ABOVE",
        "PRICE_HISTORY_DAYS",
        "BTC_MVRV",
        "BTC_MVRV_DATE",
        "MSTR_IV_RANK",
        "PI_CYCLE_GRACE_DAYS",
        "POLYGON_API_KEY",
    ] {
        env::remove_var(key);
    }
}
