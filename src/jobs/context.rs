//! Job context for dependency injection

use crate::config::Config;
use crate::db::PostgresDatabase;
use crate::metrics::Metrics;
use crate::models::evaluation::DailyEvaluation;
use crate::services::market_data::MarketDataProvider;
use crate::services::{CoinGeckoProvider, FallbackProvider, PolygonProvider};
use crate::signals::{InMemoryStateStore, SignalEngine};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Provider chain from configuration: Polygon when an API key is set, then
/// CoinGecko for BTC.
pub fn build_provider(config: &Config) -> Arc<dyn MarketDataProvider> {
    let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();
    match &config.polygon_api_key {
        Some(key) => providers.push(Arc::new(PolygonProvider::new(
            config.polygon_base_url.clone(),
            key.clone(),
        ))),
        None => warn!("POLYGON_API_KEY not set, MSTR prices will be unavailable"),
    }
    providers.push(Arc::new(CoinGeckoProvider::new(
        config.coingecko_base_url.clone(),
    )));
    Arc::new(FallbackProvider::new(providers))
}

/// Shared dependencies for daily cycles.
///
/// `store` doubles as the cycle lock: a run holds it from state load to
/// persist, so evaluations never interleave. Without a database it is the
/// only copy of signal state.
pub struct JobContext {
    pub config: Config,
    pub engine: SignalEngine,
    pub data_provider: Arc<dyn MarketDataProvider>,
    pub database: Option<Arc<PostgresDatabase>>,
    pub metrics: Option<Arc<Metrics>>,
    pub store: Mutex<InMemoryStateStore>,
    pub latest: RwLock<Option<DailyEvaluation>>,
}

impl JobContext {
    pub fn new(
        config: Config,
        data_provider: Arc<dyn MarketDataProvider>,
        database: Option<Arc<PostgresDatabase>>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self::with_engine(
            SignalEngine::new(config.clone()),
            config,
            data_provider,
            database,
            metrics,
        )
    }

    pub fn with_engine(
        engine: SignalEngine,
        config: Config,
        data_provider: Arc<dyn MarketDataProvider>,
        database: Option<Arc<PostgresDatabase>>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            config,
            engine,
            data_provider,
            database,
            metrics,
            store: Mutex::new(InMemoryStateStore::new()),
            latest: RwLock::new(None),
        }
    }

    /// Production wiring: provider chain from `config` and an optional
    /// Postgres connection. Without a database, state lives in memory.
    pub async fn from_config(config: Config, metrics: Option<Arc<Metrics>>) -> Self {
        let data_provider = build_provider(&config);
        let database = match PostgresDatabase::new().await {
            Ok(db) => {
                info!("Postgres connected");
                Some(Arc::new(db))
            }
            Err(e) => {
                warn!(error = %e, "Postgres unavailable, signal state will not survive restarts");
                None
            }
        };
        Self::new(config, data_provider, database, metrics)
    }
}
