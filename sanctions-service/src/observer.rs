//! Collection progress notifications
//!
//! Advisory only: nothing in the pipeline depends on an observer
//! succeeding or even being present.

use std::sync::Arc;
use tracing::{info, warn};

pub trait CollectionObserver: Send + Sync {
    fn source_started(&self, _source: &str) {}

    fn source_succeeded(&self, _source: &str, _count: usize) {}

    fn source_fell_back(&self, _source: &str, _count: usize, _error: &str) {}

    fn snapshot_persisted(&self, _total_entities: usize) {}
}

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CollectionObserver for TracingObserver {
    fn source_started(&self, source: &str) {
        info!("📥 Collecting {} data...", source);
    }

    fn source_succeeded(&self, source: &str, count: usize) {
        info!("✅ {}: {} entities collected", source, count);
    }

    fn source_fell_back(&self, source: &str, count: usize, error: &str) {
        warn!("⚠️  {}: using {} sample entities ({})", source, count, error);
    }

    fn snapshot_persisted(&self, total_entities: usize) {
        info!("💾 Data saved: {} entities", total_entities);
    }
}

/// Fan-out to several observers
#[derive(Clone, Default)]
pub struct Observers(Vec<Arc<dyn CollectionObserver>>);

impl Observers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, observer: Arc<dyn CollectionObserver>) -> Self {
        self.0.push(observer);
        self
    }
}

impl CollectionObserver for Observers {
    fn source_started(&self, source: &str) {
        self.0.iter().for_each(|o| o.source_started(source));
    }

    fn source_succeeded(&self, source: &str, count: usize) {
        self.0.iter().for_each(|o| o.source_succeeded(source, count));
    }

    fn source_fell_back(&self, source: &str, count: usize, error: &str) {
        self.0.iter().for_each(|o| o.source_fell_back(source, count, error));
    }

    fn snapshot_persisted(&self, total_entities: usize) {
        self.0.iter().for_each(|o| o.snapshot_persisted(total_entities));
    }
}
