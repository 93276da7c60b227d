//! Risk scoring engine

use crate::{RiskAssessment, RiskLevel, RiskProfile, RiskScore};
use chrono::{DateTime, Utc};
use tracing::trace;

const MAX_PROGRAM_SCORE: u32 = 25;
const PER_PROGRAM_SCORE: u32 = 8;
const INDIVIDUAL_SCORE: u32 = 20;
const NON_INDIVIDUAL_SCORE: u32 = 15;
const MAX_ADDRESS_SCORE: u32 = 15;
const PER_ADDRESS_SCORE: u32 = 3;
const REAL_DATA_SCORE: u32 = 10;
const MAX_RECENCY_SCORE: i64 = 5;
const RECENCY_PERIOD_DAYS: i64 = 30;

/// Risk scorer
///
/// Stateless and reentrant: the same profile scored at the same instant
/// always yields the same assessment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    /// Create new risk scorer
    pub fn new() -> Self {
        Self
    }

    /// Assess an entity profile as of `now`
    pub fn assess(&self, profile: &RiskProfile, now: DateTime<Utc>) -> RiskAssessment {
        let mut factors = Vec::with_capacity(6);
        let mut total = 0u32;

        let jurisdiction_score = profile.jurisdiction.weight();
        total += jurisdiction_score;
        factors.push(format!("Jurisdiction {}: +{}", profile.jurisdiction, jurisdiction_score));

        let program_score = Self::program_score(profile.program_count);
        total += program_score;
        factors.push(format!(
            "Sanctions programs ({}): +{}",
            profile.program_count, program_score
        ));

        let type_score = Self::type_score(&profile.entity_type);
        total += type_score;
        factors.push(format!("Type {}: +{}", profile.entity_type, type_score));

        let address_score = Self::address_score(profile.address_count);
        total += address_score;
        factors.push(format!(
            "Multiple addresses ({}): +{}",
            profile.address_count, address_score
        ));

        let real_data_score = if profile.is_real { REAL_DATA_SCORE } else { 0 };
        total += real_data_score;
        factors.push(format!("Real data: +{}", real_data_score));

        let recency_score = Self::recency_score(profile.last_updated, now);
        total += recency_score;
        factors.push(format!("Recent update: +{}", recency_score));

        let score = RiskScore::new(total);
        let level = RiskLevel::from(score);

        trace!(score = score.score(), level = %level, "Scored {}", profile.jurisdiction);

        RiskAssessment {
            score,
            level,
            color: level.color().to_string(),
            factors,
            recommendation: level.recommendation().to_string(),
            compliance_action: level.compliance_action(),
        }
    }

    fn program_score(count: usize) -> u32 {
        let raw = (count as u64).saturating_mul(PER_PROGRAM_SCORE as u64);
        raw.min(MAX_PROGRAM_SCORE as u64) as u32
    }

    fn type_score(entity_type: &str) -> u32 {
        if entity_type == "Individual" {
            INDIVIDUAL_SCORE
        } else {
            NON_INDIVIDUAL_SCORE
        }
    }

    fn address_score(count: usize) -> u32 {
        let raw = (count as u64).saturating_mul(PER_ADDRESS_SCORE as u64);
        raw.min(MAX_ADDRESS_SCORE as u64) as u32
    }

    // Records stamped in the future count as updated today
    fn recency_score(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
        let days = (now - last_updated).num_days().max(0);
        (MAX_RECENCY_SCORE - days / RECENCY_PERIOD_DAYS).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComplianceAction, Jurisdiction};
    use chrono::Duration;

    fn profile(
        jurisdiction: &str,
        entity_type: &str,
        programs: usize,
        addresses: usize,
        is_real: bool,
        last_updated: DateTime<Utc>,
    ) -> RiskProfile {
        RiskProfile {
            jurisdiction: Jurisdiction::from(jurisdiction),
            entity_type: entity_type.to_string(),
            program_count: programs,
            address_count: addresses,
            is_real,
            last_updated,
        }
    }

    #[test]
    fn test_real_ofac_individual_is_critical() {
        let now = Utc::now();
        let assessment = RiskScorer::new().assess(&profile("OFAC", "Individual", 2, 1, true, now), now);

        assert_eq!(assessment.score.score(), 89);
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert_eq!(assessment.compliance_action, ComplianceAction::BlockImmediately);
        assert_eq!(
            assessment.factors,
            vec![
                "Jurisdiction OFAC: +35",
                "Sanctions programs (2): +16",
                "Type Individual: +20",
                "Multiple addresses (1): +3",
                "Real data: +10",
                "Recent update: +5",
            ]
        );
    }

    #[test]
    fn test_stale_japanese_entity_is_low() {
        let now = Utc::now();
        let assessment = RiskScorer::new().assess(
            &profile("Japan", "Entity", 0, 0, false, now - Duration::days(200)),
            now,
        );

        assert_eq!(assessment.score.score(), 25);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.compliance_action, ComplianceAction::RoutineMonitoring);
        assert_eq!(assessment.recommendation, "Low risk. Routine monitoring sufficient.");
    }

    #[test]
    fn test_caps_and_clamp() {
        let now = Utc::now();
        let assessment = RiskScorer::new().assess(&profile("OFAC", "Individual", 10, 40, true, now), now);

        // 35 + 25 + 20 + 15 + 10 + 5 = 110
        assert_eq!(assessment.score.score(), 100);
        assert!(assessment.factors[1].ends_with("+25"));
        assert!(assessment.factors[3].ends_with("+15"));
    }

    #[test]
    fn test_recency_decay() {
        let now = Utc::now();
        let scorer = RiskScorer::new();
        let recency = |days: i64| {
            let p = profile("EU", "Entity", 0, 0, false, now - Duration::days(days));
            scorer.assess(&p, now).factors[5].clone()
        };

        assert_eq!(recency(0), "Recent update: +5");
        assert_eq!(recency(29), "Recent update: +5");
        assert_eq!(recency(30), "Recent update: +4");
        assert_eq!(recency(149), "Recent update: +1");
        assert_eq!(recency(150), "Recent update: +0");
        assert_eq!(recency(-3), "Recent update: +5");
    }

    #[test]
    fn test_unknown_jurisdiction_weight() {
        let now = Utc::now();
        let assessment = RiskScorer::new().assess(&profile("Narnia", "Vessel", 1, 0, false, now), now);

        assert_eq!(assessment.factors[0], "Jurisdiction Narnia: +10");
        assert_eq!(assessment.score.score(), 10 + 8 + 15 + 5);
        assert_eq!(assessment.level, RiskLevel::Low);
    }
}
