//! External market data sources.

pub mod coingecko;
pub mod fallback;
pub mod market_data;
pub mod polygon;

pub use coingecko::CoinGeckoProvider;
pub use fallback::FallbackProvider;
pub use market_data::{MarketDataProvider, ProviderError, RetryPolicy};
pub use polygon::PolygonProvider;
