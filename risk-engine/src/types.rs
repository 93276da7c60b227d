//! Core types for risk engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create new risk score, clamped to 0-100
    pub fn new(score: u32) -> Self {
        Self(score.min(100) as u8)
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }

    /// Check if critical risk (>= 85)
    pub fn is_critical(&self) -> bool {
        self.0 >= 85
    }

    /// Check if high risk (70-84)
    pub fn is_high_risk(&self) -> bool {
        (70..85).contains(&self.0)
    }

    /// Check if medium risk (50-69)
    pub fn is_medium_risk(&self) -> bool {
        (50..70).contains(&self.0)
    }

    /// Check if low risk (< 50)
    pub fn is_low_risk(&self) -> bool {
        self.0 < 50
    }
}

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
    /// Critical risk
    Critical,
}

impl RiskLevel {
    /// Wire name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Parse a wire name, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            "CRITICAL" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    /// Display colour used by screening front-ends
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "#dc3545",
            RiskLevel::High => "#fd7e14",
            RiskLevel::Medium => "#ffc107",
            RiskLevel::Low => "#28a745",
        }
    }

    /// Recommendation sentence for analysts
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Immediate blocking required. Freeze all assets and transactions.",
            RiskLevel::High => "Detailed analysis mandatory. Enhanced Due Diligence required.",
            RiskLevel::Medium => "Continuous monitoring. Verify periodically and document.",
            RiskLevel::Low => "Low risk. Routine monitoring sufficient.",
        }
    }

    /// Compliance action mandated by the level
    pub fn compliance_action(&self) -> ComplianceAction {
        match self {
            RiskLevel::Critical => ComplianceAction::BlockImmediately,
            RiskLevel::High => ComplianceAction::EnhancedDueDiligence,
            RiskLevel::Medium => ComplianceAction::ContinuousMonitoring,
            RiskLevel::Low => ComplianceAction::RoutineMonitoring,
        }
    }
}

impl From<RiskScore> for RiskLevel {
    fn from(score: RiskScore) -> Self {
        if score.is_critical() {
            RiskLevel::Critical
        } else if score.is_high_risk() {
            RiskLevel::High
        } else if score.is_medium_risk() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compliance action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceAction {
    /// Freeze assets, stop all activity
    BlockImmediately,
    /// Enhanced due diligence
    EnhancedDueDiligence,
    /// Periodic verification
    ContinuousMonitoring,
    /// Routine monitoring only
    RoutineMonitoring,
}

/// Issuing jurisdiction of a sanctions list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    /// US Office of Foreign Assets Control
    Ofac,
    /// United Nations Security Council
    Un,
    /// European Union
    Eu,
    /// UK HM Treasury
    Uk,
    /// Global Affairs Canada
    Canada,
    /// Australian DFAT
    Australia,
    /// Japan METI
    Japan,
    /// Any other issuer
    Other(String),
}

impl Jurisdiction {
    /// Source identifier as used in snapshots
    pub fn as_str(&self) -> &str {
        match self {
            Jurisdiction::Ofac => "OFAC",
            Jurisdiction::Un => "UN",
            Jurisdiction::Eu => "EU",
            Jurisdiction::Uk => "UK",
            Jurisdiction::Canada => "Canada",
            Jurisdiction::Australia => "Australia",
            Jurisdiction::Japan => "Japan",
            Jurisdiction::Other(name) => name,
        }
    }

    /// Risk weight of the issuing jurisdiction
    pub fn weight(&self) -> u32 {
        match self {
            Jurisdiction::Ofac => 35,
            Jurisdiction::Un => 30,
            Jurisdiction::Eu => 25,
            Jurisdiction::Uk => 20,
            Jurisdiction::Canada | Jurisdiction::Australia => 15,
            Jurisdiction::Japan | Jurisdiction::Other(_) => 10,
        }
    }
}

impl From<&str> for Jurisdiction {
    fn from(value: &str) -> Self {
        match value {
            "OFAC" => Jurisdiction::Ofac,
            "UN" => Jurisdiction::Un,
            "EU" => Jurisdiction::Eu,
            "UK" => Jurisdiction::Uk,
            "Canada" => Jurisdiction::Canada,
            "Australia" => Jurisdiction::Australia,
            "Japan" => Jurisdiction::Japan,
            other => Jurisdiction::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring inputs extracted from a sanctioned entity
#[derive(Debug, Clone, PartialEq)]
pub struct RiskProfile {
    /// Issuing jurisdiction
    pub jurisdiction: Jurisdiction,

    /// Entity classification ("Individual", "Entity", "Vessel", ...)
    pub entity_type: String,

    /// Number of sanctions programs
    pub program_count: usize,

    /// Number of known addresses
    pub address_count: usize,

    /// Whether the record came from a real feed
    pub is_real: bool,

    /// When the record was last collected
    pub last_updated: DateTime<Utc>,
}

/// Risk assessment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Risk score
    pub score: RiskScore,

    /// Risk level
    pub level: RiskLevel,

    /// Display colour for the level
    pub color: String,

    /// Per-factor justification, in scoring order
    pub factors: Vec<String>,

    /// Analyst recommendation
    pub recommendation: String,

    /// Mandated compliance action
    pub compliance_action: ComplianceAction,
}
