//! Polygon.io daily aggregates provider

use async_trait::async_trait;
use backon::Retryable;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::market_data::{dedup_daily, MarketDataProvider, ProviderError, RetryPolicy};
use crate::models::price::PricePoint;

#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    status: String,
    #[serde(default)]
    results: Vec<AggregateBar>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AggregateBar {
    /// Bar start, unix millis.
    t: i64,
    c: f64,
}

pub struct PolygonProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl PolygonProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(i64::from(days));
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url, symbol, from, to
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "50000"),
                ("apiKey", self.api_key.as_str()),
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

        let payload: AggregatesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        // Delayed data is still usable for daily closes
        if payload.status != "OK" && payload.status != "DELAYED" {
            return Err(ProviderError::Api(
                payload.error.unwrap_or(payload.status),
            ));
        }

        let points = payload
            .results
            .into_iter()
            .map(|bar| {
                DateTime::from_timestamp_millis(bar.t)
                    .map(|ts| PricePoint::new(ts.date_naive(), bar.c))
                    .ok_or_else(|| ProviderError::Decode(format!("invalid timestamp {}", bar.t)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if points.is_empty() {
            return Err(ProviderError::Empty(symbol.to_string()));
        }

        Ok(dedup_daily(points))
    }
}

#[async_trait]
impl MarketDataProvider for PolygonProvider {
    fn name(&self) -> &str {
        "polygon"
    }

    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        let points = (|| self.fetch_once(symbol, days))
            .retry(self.retry.backoff())
            .when(ProviderError::is_retryable)
            .notify(|e: &ProviderError, delay: std::time::Duration| {
                warn!(
                    provider = "polygon",
                    symbol = symbol,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying Polygon request"
                );
            })
            .await?;

        debug!(provider = "polygon", symbol = symbol, points = points.len(), "Fetched daily closes");
        Ok(points)
    }
}
