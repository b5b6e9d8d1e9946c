//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for navguard:
//! - Decision counts by area and outcome
//! - Denial counts by kind
//! - Evaluation latency
//! - Route registry size and version

use prometheus::{
    CounterVec, Histogram, HistogramOpts, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector for navguard
#[derive(Clone)]
pub struct Metrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Decisions produced, by area and outcome
    pub decisions_total: CounterVec,
    /// Non-allow decisions, by denial kind
    pub denials_total: CounterVec,
    /// Time spent evaluating one navigation attempt
    pub evaluation_duration_seconds: Histogram,
    /// Routes in the latest registry snapshot
    pub registry_routes: IntGauge,
    /// Version of the latest registry snapshot
    pub registry_version: IntGauge,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let decisions_total = CounterVec::new(
            Opts::new(
                "navguard_decisions_total",
                "Total number of navigation decisions",
            ),
            &["area", "outcome"],
        )?;

        let denials_total = CounterVec::new(
            Opts::new(
                "navguard_denials_total",
                "Total number of denied or redirected navigations",
            ),
            &["kind"],
        )?;

        let evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "navguard_evaluation_duration_seconds",
                "Navigation evaluation duration in seconds",
            )
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005]),
        )?;

        let registry_routes = IntGauge::new(
            "navguard_registry_routes",
            "Number of routes in the latest registry snapshot",
        )?;

        let registry_version = IntGauge::new(
            "navguard_registry_version",
            "Version of the latest registry snapshot",
        )?;

        registry.register(Box::new(decisions_total.clone()))?;
        registry.register(Box::new(denials_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(registry_routes.clone()))?;
        registry.register(Box::new(registry_version.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            decisions_total,
            denials_total,
            evaluation_duration_seconds,
            registry_routes,
            registry_version,
        })
    }

    /// Get the Prometheus registry for exporting metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one navigation decision
    pub fn record_decision(
        &self,
        area: &str,
        outcome: &str,
        denial_kind: Option<&str>,
        duration_secs: f64,
    ) {
        self.decisions_total
            .with_label_values(&[area, outcome])
            .inc();
        if let Some(kind) = denial_kind {
            self.denials_total.with_label_values(&[kind]).inc();
        }
        self.evaluation_duration_seconds.observe(duration_secs);
    }

    /// Update registry gauges after a snapshot is committed
    pub fn update_registry(&self, routes: usize, version: u64) {
        self.registry_routes.set(routes as i64);
        self.registry_version.set(version as i64);
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
