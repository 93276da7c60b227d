use crate::collector::SourceCollector;
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::observer::{CollectionObserver, Observers, TracingObserver};
use crate::query::{self, HealthStatus, ScoredEntity, SearchQuery, SearchResults, Statistics};
use crate::snapshot::SnapshotBuilder;
use crate::store::SnapshotStore;
use crate::types::Snapshot;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use risk_engine::RiskScorer;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub total_entities: usize,
    pub last_update: DateTime<Utc>,
}

// Clears the in-progress flag however the run ends
struct CollectionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for CollectionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the current snapshot and the single collection slot
pub struct SanctionsService {
    config: Config,
    collector: SourceCollector,
    builder: SnapshotBuilder,
    scorer: RiskScorer,
    observers: Observers,
    current: RwLock<Option<Arc<Snapshot>>>,
    collecting: AtomicBool,
}

impl SanctionsService {
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let collector = SourceCollector::from_config(&config)?;
        Ok(Self::with_collector(config, collector))
    }

    pub fn with_collector(config: Config, collector: SourceCollector) -> Self {
        let builder = SnapshotBuilder::new(SnapshotStore::new(config.snapshot_path()));
        Self {
            config,
            collector,
            builder,
            scorer: RiskScorer::new(),
            observers: Observers::new().with(Arc::new(TracingObserver)),
            current: RwLock::new(None),
            collecting: AtomicBool::new(false),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CollectionObserver>) -> Self {
        self.observers = self.observers.with(observer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the stored snapshot, or collect a first one when there is none
    pub async fn initialize(&self) -> Result<()> {
        match self.builder.store().load().await {
            Ok(Some(snapshot)) => {
                info!("✅ Data loaded: {} entities", snapshot.total_entities);
                *self.current.write() = Some(Arc::new(snapshot));
                Ok(())
            }
            Ok(None) => {
                info!("🔄 No stored snapshot, collecting data for the first time...");
                self.refresh().await.map(|_| ())
            }
            Err(e) => {
                warn!("Stored snapshot unusable ({}), collecting fresh data", e);
                self.refresh().await.map(|_| ())
            }
        }
    }

    /// Run the full pipeline. Rejected while another run is active.
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let _guard = self.try_begin_collection()?;

        info!("🌍 Collecting global sanctions data...");
        let now = Utc::now();
        let outcomes = self.collector.collect_all(now, &self.observers).await;
        let snapshot = self
            .builder
            .build_and_persist(outcomes, now, &self.observers)
            .await?;

        let summary = RefreshSummary {
            total_entities: snapshot.total_entities,
            last_update: snapshot.collection_date,
        };
        *self.current.write() = Some(Arc::new(snapshot));

        Ok(summary)
    }

    fn try_begin_collection(&self) -> Result<CollectionGuard<'_>> {
        self.collecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ServiceError::AlreadyInProgress)?;
        Ok(CollectionGuard {
            flag: &self.collecting,
        })
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.current.read().clone().ok_or(ServiceError::DataNotReady)
    }

    pub fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        self.search_at(query, Utc::now())
    }

    pub fn search_at(&self, query: &SearchQuery, now: DateTime<Utc>) -> Result<SearchResults> {
        let snapshot = self.snapshot()?;
        Ok(query::search(
            &snapshot,
            query,
            &self.scorer,
            now,
            self.config.search.default_limit,
        ))
    }

    pub fn entity(&self, id: &str) -> Result<ScoredEntity> {
        let snapshot = self.snapshot()?;
        let entity = snapshot
            .find(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        Ok(query::score(&self.scorer, entity, Utc::now()))
    }

    pub fn statistics(&self) -> Result<Statistics> {
        let snapshot = self.snapshot()?;
        Ok(query::statistics(&snapshot))
    }

    pub fn health(&self) -> HealthStatus {
        let current = self.current.read().clone();
        HealthStatus {
            status: "healthy".to_string(),
            data_loaded: current.is_some(),
            total_entities: current.as_ref().map_or(0, |s| s.total_entities),
            jurisdictions: current.as_ref().map_or(0, |s| s.jurisdictions.len()),
            last_update: current.as_ref().map(|s| s.collection_date),
            is_loading: self.is_collecting(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
