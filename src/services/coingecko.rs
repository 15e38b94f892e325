//! CoinGecko market chart provider (BTC only)

use async_trait::async_trait;
use backon::Retryable;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use super::market_data::{dedup_daily, MarketDataProvider, ProviderError, RetryPolicy};
use crate::models::price::PricePoint;

#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[unix_millis, price]` pairs.
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl CoinGeckoProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// CoinGecko coin id for a ticker.
    pub fn coin_id(symbol: &str) -> Option<&'static str> {
        match symbol.to_ascii_uppercase().as_str() {
            "BTC" | "BTCUSD" | "X:BTCUSD" | "BITCOIN" => Some("bitcoin"),
            _ => None,
        }
    }

    async fn fetch_once(&self, coin: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        let url = format!("{}/api/v3/coins/{}/market_chart", self.base_url, coin);
        let days = days.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chart: MarketChart = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let points = chart
            .prices
            .into_iter()
            .map(|(ts, price)| {
                DateTime::from_timestamp_millis(ts as i64)
                    .map(|dt| PricePoint::new(dt.date_naive(), price))
                    .ok_or_else(|| ProviderError::Decode(format!("invalid timestamp {}", ts)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if points.is_empty() {
            return Err(ProviderError::Empty(coin.to_string()));
        }

        // The trailing point is the live price; it replaces today's close
        Ok(dedup_daily(points))
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        let coin = Self::coin_id(symbol).ok_or_else(|| ProviderError::Unsupported {
            provider: self.name().to_string(),
            symbol: symbol.to_string(),
        })?;

        let points = (|| self.fetch_once(coin, days))
            .retry(self.retry.backoff())
            .when(ProviderError::is_retryable)
            .notify(|e: &ProviderError, delay: std::time::Duration| {
                warn!(
                    provider = "coingecko",
                    symbol = symbol,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying CoinGecko request"
                );
            })
            .await?;

        debug!(provider = "coingecko", symbol = symbol, points = points.len(), "Fetched daily closes");
        Ok(points)
    }
}
