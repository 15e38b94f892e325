//! Ordered provider chain: the first provider returning data wins.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::market_data::{MarketDataProvider, ProviderError};
use crate::models::price::PricePoint;

pub struct FallbackProvider {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl FallbackProvider {
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }
}

#[async_trait]
impl MarketDataProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        let mut failures = Vec::new();

        for (index, provider) in self.providers.iter().enumerate() {
            match provider.daily_closes(symbol, days).await {
                Ok(points) => {
                    if index > 0 {
                        info!(
                            provider = provider.name(),
                            symbol = symbol,
                            "Fallback provider succeeded"
                        );
                    }
                    return Ok(points);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        symbol = symbol,
                        error = %e,
                        "Provider failed, trying next"
                    );
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(ProviderError::Exhausted(failures))
    }
}
