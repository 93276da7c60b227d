//! Sanctions list ingestion and screening
//!
//! Collects sanctions lists from several issuers, normalizes them into a
//! single entity schema, persists one consolidated snapshot and answers
//! risk-scored queries against it.
//!
//! # Pipeline
//!
//! - **Feed parser**: OFAC SDN XML into entities, all-or-nothing
//! - **Placeholder generator**: fixed sample sets for issuers without a feed
//! - **Source collector**: fetch-or-fallback per source, failures isolated
//! - **Snapshot builder**: merge outcomes, overwrite the storage slot
//! - **Risk scoring**: at query time, via `risk_engine`

#![forbid(unsafe_code)]

pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod ofac;
pub mod placeholder;
pub mod query;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod types;

pub use collector::{PlaceholderSource, RealFeedSource, Source, SourceCollector};
pub use config::Config;
pub use error::{Result, ServiceError};
pub use metrics::CollectionMetrics;
pub use observer::{CollectionObserver, TracingObserver};
pub use query::{HealthStatus, ScoredEntity, SearchQuery, SearchResults, Statistics};
pub use service::{RefreshSummary, SanctionsService};
pub use snapshot::SnapshotBuilder;
pub use store::SnapshotStore;
pub use types::{Address, Entity, JurisdictionStatus, Snapshot, SourceOutcome};
