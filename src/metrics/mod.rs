//! Prometheus metrics for the evaluation service.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use crate::models::evaluation::DailyEvaluation;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub evaluations_total: IntCounterVec,
    pub evaluation_duration_seconds: Histogram,
    pub signal_active: IntGaugeVec,
    pub signal_transitions_total: IntCounterVec,
    pub provider_failures_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("cyclewatch".to_string()), None)?;

        let http_requests_total =
            IntCounter::with_opts(Opts::new("http_requests_total", "Total HTTP requests"))?;
        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        let evaluations_total = IntCounterVec::new(
            Opts::new("evaluations_total", "Daily evaluation runs by outcome"),
            &["outcome"],
        )?;
        let evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "evaluation_duration_seconds",
                "Duration of a full daily cycle including data fetch",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        let signal_active = IntGaugeVec::new(
            Opts::new("signal_active", "1 when the signal is active"),
            &["signal"],
        )?;
        let signal_transitions_total = IntCounterVec::new(
            Opts::new("signal_transitions_total", "Signal activations and deactivations"),
            &["signal", "kind"],
        )?;
        let provider_failures_total = IntCounterVec::new(
            Opts::new("provider_failures_total", "Market data fetch failures"),
            &["provider"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(signal_active.clone()))?;
        registry.register(Box::new(signal_transitions_total.clone()))?;
        registry.register(Box::new(provider_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            evaluations_total,
            evaluation_duration_seconds,
            signal_active,
            signal_transitions_total,
            provider_failures_total,
        })
    }

    /// Update gauges and counters from a finished evaluation.
    pub fn record_evaluation(&self, evaluation: &DailyEvaluation) {
        let outcome = if evaluation.data_quality.is_complete() {
            "complete"
        } else {
            "partial"
        };
        self.evaluations_total.with_label_values(&[outcome]).inc();

        for report in &evaluation.signals {
            let name = report.state.name.as_str();
            self.signal_active
                .with_label_values(&[name])
                .set(i64::from(report.state.active));
            let kind = match report.transition {
                crate::models::signal::Transition::Activated => Some("activated"),
                crate::models::signal::Transition::Deactivated { .. } => Some("deactivated"),
                _ => None,
            };
            if let Some(kind) = kind {
                self.signal_transitions_total
                    .with_label_values(&[name, kind])
                    .inc();
            }
        }
    }

    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
