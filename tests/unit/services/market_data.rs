//! Unit tests for provider helpers

use crate::fixtures::day;
use cyclewatch::models::price::PricePoint;
use cyclewatch::services::market_data::dedup_daily;
use cyclewatch::services::{CoinGeckoProvider, ProviderError, RetryPolicy};
use std::time::Duration;

#[test]
fn dedup_keeps_last_value_per_day_in_order() {
    let points = vec![
        PricePoint::new(day(2), 30.0),
        PricePoint::new(day(0), 10.0),
        PricePoint::new(day(1), 20.0),
        PricePoint::new(day(2), 31.0),
    ];

    assert_eq!(
        dedup_daily(points),
        vec![
            PricePoint::new(day(0), 10.0),
            PricePoint::new(day(1), 20.0),
            PricePoint::new(day(2), 31.0),
        ]
    );
}

#[test]
fn only_rate_limits_and_server_errors_are_retried() {
    let status = |status| ProviderError::Status {
        status,
        body: String::new(),
    };
    assert!(status(503).is_retryable());
    assert!(status(429).is_retryable());
    assert!(!status(404).is_retryable());
    assert!(!ProviderError::Api("ERROR".into()).is_retryable());
    assert!(!ProviderError::Empty("MSTR".into()).is_retryable());
}

#[test]
fn retry_policy_defaults() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_times, 3);
    assert_eq!(policy.min_delay, Duration::from_secs(2));
    assert_eq!(RetryPolicy::none().max_times, 0);
}

#[test]
fn coingecko_only_knows_bitcoin() {
    assert_eq!(CoinGeckoProvider::coin_id("X:BTCUSD"), Some("bitcoin"));
    assert_eq!(CoinGeckoProvider::coin_id("btc"), Some("bitcoin"));
    assert_eq!(CoinGeckoProvider::coin_id("MSTR"), None);
}

#[test]
fn exhausted_lists_every_failure() {
    let err = ProviderError::Exhausted(vec!["polygon: boom".into(), "coingecko: bust".into()]);
    assert_eq!(err.to_string(), "all providers failed: polygon: boom; coingecko: bust");
}
