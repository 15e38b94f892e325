//! Test utilities for worker integration tests

use cyclewatch::config::Config;
use cyclewatch::jobs::JobContext;
use cyclewatch::metrics::Metrics;
use std::sync::Arc;

use crate::test_utils::{job_context_with, test_config, StaticProvider};

/// Job context with metrics over static price data
#[allow(dead_code)]
pub struct TestWorker {
    pub job_context: Arc<JobContext>,
    pub metrics: Arc<Metrics>,
}

impl TestWorker {
    pub fn new() -> Self {
        Self::with_provider(StaticProvider::full())
    }

    pub fn with_provider(provider: StaticProvider) -> Self {
        Self::with_config(test_config(), provider)
    }

    pub fn with_config(config: Config, provider: StaticProvider) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let job_context = job_context_with(config, provider, Some(metrics.clone()));
        Self {
            job_context,
            metrics,
        }
    }
}
