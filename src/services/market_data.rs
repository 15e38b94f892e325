//! Market data provider interface for daily close history.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::price::PricePoint;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("api error: {0}")]
    Api(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("no price data returned for {0}")]
    Empty(String),

    #[error("symbol {symbol} not supported by {provider}")]
    Unsupported { provider: String, symbol: String },

    #[error("all providers failed: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

impl ProviderError {
    /// Transport failures, rate limits and server errors are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Ascending daily closes covering roughly the last `days` days.
    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError>;
}

/// Retry policy shared by the HTTP providers.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub max_times: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            max_times: 3,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            max_times: 0,
        }
    }

    pub fn backoff(&self) -> backon::ExponentialBuilder {
        backon::ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_times)
    }
}

/// Collapse points to one per date (last wins) in ascending order.
pub fn dedup_daily(points: impl IntoIterator<Item = PricePoint>) -> Vec<PricePoint> {
    points
        .into_iter()
        .map(|p| (p.timestamp, p.close))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect()
}
