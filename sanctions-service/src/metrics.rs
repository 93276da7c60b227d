//! Prometheus metrics for collection runs
//!
//! # Metrics
//!
//! - `sanctions_source_collections_total{source,status}` - Per-source outcomes
//! - `sanctions_source_entities{source}` - Entities contributed by the last run
//! - `sanctions_snapshot_entities` - Entities in the last persisted snapshot
//! - `sanctions_snapshots_persisted_total` - Snapshots written

use crate::observer::CollectionObserver;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tracing::warn;

/// Metrics collector
#[derive(Clone)]
pub struct CollectionMetrics {
    /// Per-source outcomes
    pub source_collections: IntCounterVec,

    /// Entities contributed per source
    pub source_entities: IntGaugeVec,

    /// Entities in the current snapshot
    pub snapshot_entities: IntGauge,

    /// Snapshots written
    pub snapshots_persisted: IntCounter,

    registry: Arc<Registry>,
}

impl CollectionMetrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let source_collections = IntCounterVec::new(
            Opts::new("sanctions_source_collections_total", "Per-source collection outcomes"),
            &["source", "status"],
        )?;
        registry.register(Box::new(source_collections.clone()))?;

        let source_entities = IntGaugeVec::new(
            Opts::new("sanctions_source_entities", "Entities contributed by the last run"),
            &["source"],
        )?;
        registry.register(Box::new(source_entities.clone()))?;

        let snapshot_entities = IntGauge::new(
            "sanctions_snapshot_entities",
            "Entities in the last persisted snapshot",
        )?;
        registry.register(Box::new(snapshot_entities.clone()))?;

        let snapshots_persisted = IntCounter::new(
            "sanctions_snapshots_persisted_total",
            "Snapshots written to the storage slot",
        )?;
        registry.register(Box::new(snapshots_persisted.clone()))?;

        Ok(Self {
            source_collections,
            source_entities,
            snapshot_entities,
            snapshots_persisted,
            registry,
        })
    }

    /// Text exposition format
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            warn!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl CollectionObserver for CollectionMetrics {
    fn source_succeeded(&self, source: &str, count: usize) {
        self.source_collections.with_label_values(&[source, "success"]).inc();
        self.source_entities.with_label_values(&[source]).set(count as i64);
    }

    fn source_fell_back(&self, source: &str, count: usize, _error: &str) {
        self.source_collections.with_label_values(&[source, "fallback"]).inc();
        self.source_entities.with_label_values(&[source]).set(count as i64);
    }

    fn snapshot_persisted(&self, total_entities: usize) {
        self.snapshots_persisted.inc();
        self.snapshot_entities.set(total_entities as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_record_outcomes() {
        let metrics = CollectionMetrics::new().unwrap();
        metrics.source_succeeded("OFAC", 12);
        metrics.source_fell_back("EU", 2, "timeout");
        metrics.snapshot_persisted(14);

        assert_eq!(metrics.source_collections.with_label_values(&["OFAC", "success"]).get(), 1);
        assert_eq!(metrics.source_collections.with_label_values(&["EU", "fallback"]).get(), 1);
        assert_eq!(metrics.snapshot_entities.get(), 14);

        let text = metrics.render();
        assert!(text.contains("sanctions_snapshots_persisted_total 1"));
        assert!(text.contains("sanctions_source_entities{source=\"OFAC\"} 12"));
    }

    #[test]
    fn test_independent_registries() {
        // Two collectors must not clash on registration
        assert!(CollectionMetrics::new().is_ok());
        assert!(CollectionMetrics::new().is_ok());
    }
}
