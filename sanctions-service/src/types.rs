use chrono::{DateTime, Utc};
use risk_engine::{Jurisdiction, RiskProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sanctioned individual, organization or vessel in the unified schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    pub jurisdiction: String,
    pub source: String,
    pub source_url: String,
    pub last_updated: DateTime<Utc>,
    pub is_real: bool,
}

impl Entity {
    /// Scoring inputs for the risk engine
    pub fn risk_profile(&self) -> RiskProfile {
        RiskProfile {
            jurisdiction: Jurisdiction::from(self.jurisdiction.as_str()),
            entity_type: self.entity_type.clone(),
            program_count: self.programs.len(),
            address_count: self.addresses.len(),
            is_real: self.is_real,
            last_updated: self.last_updated,
        }
    }

    /// Case-insensitive substring match on name, programs and address city/country.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.programs.iter().any(|p| p.to_lowercase().contains(needle))
            || self.addresses.iter().any(|a| {
                a.country.to_lowercase().contains(needle) || a.city.to_lowercase().contains(needle)
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address1: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(city: &str, country: &str) -> Self {
        Self {
            city: city.to_string(),
            country: country.to_string(),
            ..Default::default()
        }
    }
}

/// Result of collecting a single source.
///
/// `count` is always the length of `data`; a failed source still carries
/// its placeholder records.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    success: bool,
    data: Vec<Entity>,
    error: Option<String>,
}

impl SourceOutcome {
    pub fn succeeded(data: Vec<Entity>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn fell_back(data: Vec<Entity>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[Entity] {
        &self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_data(self) -> Vec<Entity> {
        self.data
    }
}

/// Per-source entry of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionStatus {
    pub count: usize,
    pub success: bool,
    pub error: Option<String>,
}

/// Immutable consolidation of all sources from one collection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub collection_date: DateTime<Utc>,
    pub total_entities: usize,
    pub jurisdictions: BTreeMap<String, JurisdictionStatus>,
    pub entities: Vec<Entity>,
}

impl Snapshot {
    /// Verify `totalEntities == sum(counts) == len(entities)`
    pub fn check_consistency(&self) -> Result<(), String> {
        let summed: usize = self.jurisdictions.values().map(|j| j.count).sum();
        if summed != self.total_entities || self.entities.len() != self.total_entities {
            return Err(format!(
                "totalEntities={}, sum of jurisdiction counts={}, entities={}",
                self.total_entities,
                summed,
                self.entities.len()
            ));
        }
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
