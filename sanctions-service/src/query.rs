//! Read-side operations over an immutable snapshot

use crate::types::{Entity, Snapshot};
use chrono::{DateTime, Utc};
use risk_engine::{RiskAssessment, RiskLevel, RiskScorer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Search parameters; every filter is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    /// Case-insensitive text over name, programs and address city/country
    #[serde(alias = "q")]
    pub query: Option<String>,

    /// Exact jurisdiction match
    pub jurisdiction: Option<String>,

    /// Exact type match
    #[serde(rename = "type")]
    pub entity_type: Option<String>,

    /// Applied after scoring
    pub risk_level: Option<RiskLevel>,

    /// Maximum results; the configured default when absent
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn text(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            ..Default::default()
        }
    }

    pub fn jurisdiction(jurisdiction: &str) -> Self {
        Self {
            jurisdiction: Some(jurisdiction.to_string()),
            ..Default::default()
        }
    }
}

/// An entity with its assessment as of the query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEntity {
    #[serde(flatten)]
    pub entity: Entity,
    pub risk_analysis: RiskAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// Matches before truncation
    pub total: usize,
    pub showing: usize,
    pub results: Vec<ScoredEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_entities: usize,
    pub by_jurisdiction: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_program: BTreeMap<String, usize>,
    pub real_data_count: usize,
    pub sample_data_count: usize,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub data_loaded: bool,
    pub total_entities: usize,
    /// Jurisdictions in the current snapshot
    pub jurisdictions: usize,
    pub last_update: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub version: String,
}

fn filter_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn score(scorer: &RiskScorer, entity: &Entity, now: DateTime<Utc>) -> ScoredEntity {
    ScoredEntity {
        risk_analysis: scorer.assess(&entity.risk_profile(), now),
        entity: entity.clone(),
    }
}

/// Filter, score, order by descending score and truncate.
///
/// Equal scores keep snapshot order.
pub fn search(
    snapshot: &Snapshot,
    query: &SearchQuery,
    scorer: &RiskScorer,
    now: DateTime<Utc>,
    default_limit: usize,
) -> SearchResults {
    let needle = filter_value(&query.query).map(str::to_lowercase);
    let jurisdiction = filter_value(&query.jurisdiction);
    let entity_type = filter_value(&query.entity_type);

    let mut results: Vec<ScoredEntity> = snapshot
        .entities
        .iter()
        .filter(|e| needle.as_deref().map_or(true, |n| e.matches_text(n)))
        .filter(|e| jurisdiction.map_or(true, |j| e.jurisdiction == j))
        .filter(|e| entity_type.map_or(true, |t| e.entity_type == t))
        .map(|e| score(scorer, e, now))
        .filter(|s| query.risk_level.map_or(true, |level| s.risk_analysis.level == level))
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.risk_analysis.score.cmp(&a.risk_analysis.score));

    let total = results.len();
    results.truncate(query.limit.unwrap_or(default_limit));

    SearchResults {
        total,
        showing: results.len(),
        results,
    }
}

pub fn statistics(snapshot: &Snapshot) -> Statistics {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_program: BTreeMap<String, usize> = BTreeMap::new();
    let mut real_data_count = 0;

    for entity in &snapshot.entities {
        if entity.is_real {
            real_data_count += 1;
        }
        if !entity.entity_type.is_empty() {
            *by_type.entry(entity.entity_type.clone()).or_default() += 1;
        }
        for program in &entity.programs {
            *by_program.entry(program.clone()).or_default() += 1;
        }
    }

    Statistics {
        total_entities: snapshot.total_entities,
        by_jurisdiction: snapshot
            .jurisdictions
            .iter()
            .map(|(code, status)| (code.clone(), status.count))
            .collect(),
        by_type,
        by_program,
        real_data_count,
        sample_data_count: snapshot.entities.len() - real_data_count,
        last_update: snapshot.collection_date,
    }
}
