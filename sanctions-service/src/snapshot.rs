use crate::error::Result;
use crate::observer::CollectionObserver;
use crate::store::SnapshotStore;
use crate::types::{JurisdictionStatus, Snapshot, SourceOutcome};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Merges per-source outcomes into one snapshot and writes it to the slot
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    store: SnapshotStore,
}

impl SnapshotBuilder {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Concatenate outcomes in the order given. No sorting happens here.
    pub fn build(outcomes: Vec<(String, SourceOutcome)>, collection_date: DateTime<Utc>) -> Snapshot {
        let mut jurisdictions: BTreeMap<String, JurisdictionStatus> = BTreeMap::new();
        let mut entities = Vec::with_capacity(outcomes.iter().map(|(_, o)| o.count()).sum());

        for (code, outcome) in outcomes {
            let status = JurisdictionStatus {
                count: outcome.count(),
                success: outcome.success(),
                error: outcome.error().map(str::to_string),
            };

            // A code listed twice keeps the totals consistent by merging
            match jurisdictions.entry(code) {
                Entry::Vacant(slot) => {
                    slot.insert(status);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    existing.count += status.count;
                    existing.success &= status.success;
                    if existing.error.is_none() {
                        existing.error = status.error;
                    }
                }
            }

            entities.extend(outcome.into_data());
        }

        Snapshot {
            collection_date,
            total_entities: entities.len(),
            jurisdictions,
            entities,
        }
    }

    /// Build, replace the persisted snapshot, and hand it back
    pub async fn build_and_persist(
        &self,
        outcomes: Vec<(String, SourceOutcome)>,
        collection_date: DateTime<Utc>,
        observer: &dyn CollectionObserver,
    ) -> Result<Snapshot> {
        let snapshot = Self::build(outcomes, collection_date);
        self.store.save(&snapshot).await?;
        observer.snapshot_persisted(snapshot.total_entities);
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::RecordingObserver;
    use crate::placeholder::placeholder_entities;

    fn outcomes(now: DateTime<Utc>) -> Vec<(String, SourceOutcome)> {
        vec![
            (
                "OFAC".to_string(),
                SourceOutcome::fell_back(placeholder_entities("OFAC", now), "feed down"),
            ),
            ("EU".to_string(), SourceOutcome::succeeded(placeholder_entities("EU", now))),
            ("Japan".to_string(), SourceOutcome::succeeded(placeholder_entities("Japan", now))),
        ]
    }

    #[test]
    fn test_build_totals_and_order() {
        let now = Utc::now();
        let snapshot = SnapshotBuilder::build(outcomes(now), now);

        assert_eq!(snapshot.total_entities, 4);
        assert!(snapshot.check_consistency().is_ok());
        assert_eq!(snapshot.collection_date, now);

        let ids: Vec<&str> = snapshot.entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["OFAC001", "EU001", "EU002", "JP001"]);

        assert_eq!(
            snapshot.jurisdictions["OFAC"],
            JurisdictionStatus {
                count: 1,
                success: false,
                error: Some("feed down".to_string()),
            }
        );
        assert_eq!(snapshot.jurisdictions["EU"].error, None);
    }

    #[test]
    fn test_duplicate_codes_stay_consistent() {
        let now = Utc::now();
        let snapshot = SnapshotBuilder::build(
            vec![
                ("EU".to_string(), SourceOutcome::succeeded(placeholder_entities("EU", now))),
                ("EU".to_string(), SourceOutcome::fell_back(placeholder_entities("EU", now), "x")),
            ],
            now,
        );

        assert!(snapshot.check_consistency().is_ok());
        assert_eq!(snapshot.jurisdictions["EU"].count, 4);
        assert!(!snapshot.jurisdictions["EU"].success);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SnapshotBuilder::build(Vec::new(), Utc::now());
        assert_eq!(snapshot.total_entities, 0);
        assert!(snapshot.check_consistency().is_ok());
    }

    mod properties {
        use super::*;
        use crate::types::Entity;
        use proptest::prelude::*;

        /// Strategy for generating source codes; a small pool forces duplicates
        fn code_strategy() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("OFAC".to_string()),
                Just("EU".to_string()),
                Just("UN".to_string()),
                Just("Japan".to_string()),
            ]
        }

        /// Strategy for generating (code, succeeded, entity count) per source
        fn source_strategy() -> impl Strategy<Value = (String, bool, usize)> {
            (code_strategy(), any::<bool>(), 0usize..6)
        }

        fn tagged_entities(code: &str, position: usize, n: usize, now: DateTime<Utc>) -> Vec<Entity> {
            let template = placeholder_entities("UN", now).remove(0);
            (0..n)
                .map(|i| Entity {
                    id: format!("{}-{}-{}", code, position, i),
                    jurisdiction: code.to_string(),
                    ..template.clone()
                })
                .collect()
        }

        fn outcome(code: &str, position: usize, succeeded: bool, n: usize, now: DateTime<Utc>) -> SourceOutcome {
            let data = tagged_entities(code, position, n, now);
            if succeeded {
                SourceOutcome::succeeded(data)
            } else {
                SourceOutcome::fell_back(data, "feed down")
            }
        }

        proptest! {
            #[test]
            fn prop_outcome_count_matches_data(
                (code, succeeded, n) in source_strategy(),
            ) {
                let outcome = outcome(&code, 0, succeeded, n, Utc::now());
                prop_assert_eq!(outcome.count(), outcome.data().len());
                prop_assert_eq!(outcome.success(), outcome.error().is_none());
            }

            #[test]
            fn prop_snapshot_totals_are_consistent(
                sources in prop::collection::vec(source_strategy(), 0..10),
            ) {
                let now = Utc::now();
                let outcomes: Vec<(String, SourceOutcome)> = sources
                    .iter()
                    .enumerate()
                    .map(|(position, (code, succeeded, n))| {
                        (code.clone(), outcome(code, position, *succeeded, *n, now))
                    })
                    .collect();

                let snapshot = SnapshotBuilder::build(outcomes, now);
                let counted: usize = snapshot.jurisdictions.values().map(|j| j.count).sum();

                prop_assert_eq!(snapshot.total_entities, snapshot.entities.len());
                prop_assert_eq!(snapshot.total_entities, counted);
                prop_assert!(snapshot.check_consistency().is_ok());

                // Entities appear grouped by source, in the order the sources were given
                let expected: Vec<String> = sources
                    .iter()
                    .enumerate()
                    .flat_map(|(position, (code, _, n))| {
                        (0..*n).map(move |i| format!("{}-{}-{}", code, position, i))
                    })
                    .collect();
                let ids: Vec<String> = snapshot.entities.iter().map(|e| e.id.clone()).collect();
                prop_assert_eq!(ids, expected);

                // A code is successful only if every listing of it succeeded
                for (code, status) in &snapshot.jurisdictions {
                    let all_ok = sources.iter().filter(|(c, _, _)| c == code).all(|(_, ok, _)| *ok);
                    prop_assert_eq!(status.success, all_ok);
                    prop_assert_eq!(status.error.is_none(), all_ok);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_build_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let builder = SnapshotBuilder::new(SnapshotStore::new(dir.path().join("latest.json")));
        let observer = RecordingObserver::default();
        let now = Utc::now();

        let snapshot = builder.build_and_persist(outcomes(now), now, &observer).await.unwrap();
        let stored = builder.store().load().await.unwrap().unwrap();

        assert_eq!(stored, snapshot);
        assert_eq!(*observer.events.lock(), vec!["persisted 4"]);
    }
}
