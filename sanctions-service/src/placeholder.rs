//! Hand-authored sample records for sources without a real feed integration

use crate::config::OFAC_SDN_URL;
use crate::types::{Address, Entity};
use chrono::{DateTime, Utc};
use risk_engine::Jurisdiction;

struct Sample {
    id: &'static str,
    name: &'static str,
    entity_type: &'static str,
    programs: &'static [&'static str],
    city: &'static str,
    country: &'static str,
}

struct SampleSet {
    source: &'static str,
    source_url: &'static str,
    samples: &'static [Sample],
}

const OFAC: SampleSet = SampleSet {
    source: "US Treasury OFAC (Sample)",
    source_url: OFAC_SDN_URL,
    samples: &[Sample {
        id: "OFAC001",
        name: "Sample OFAC Target",
        entity_type: "Individual",
        programs: &["SDGT"],
        city: "Unknown",
        country: "Various",
    }],
};

const EU: SampleSet = SampleSet {
    source: "European Union Consolidated List",
    source_url: "https://webgate.ec.europa.eu/fsd/fsf",
    samples: &[
        Sample {
            id: "EU001",
            name: "European Sanctions Entity Alpha",
            entity_type: "Entity",
            programs: &["EU Restrictive Measures", "Asset Freeze"],
            city: "Brussels",
            country: "Various",
        },
        Sample {
            id: "EU002",
            name: "Jean-Pierre Dubois",
            entity_type: "Individual",
            programs: &["EU Asset Freeze", "Travel Ban"],
            city: "Paris",
            country: "France",
        },
    ],
};

const UN: SampleSet = SampleSet {
    source: "UN Security Council Consolidated List",
    source_url: "https://scsanctions.un.org/",
    samples: &[Sample {
        id: "UN001",
        name: "United Nations Sanctions Target",
        entity_type: "Individual",
        programs: &["UN Security Council 1267", "Al-Qaeda Sanctions"],
        city: "Unknown",
        country: "Various",
    }],
};

const UK: SampleSet = SampleSet {
    source: "UK HM Treasury Consolidated List",
    source_url: "https://www.gov.uk/government/publications/financial-sanctions-consolidated-list-of-targets",
    samples: &[Sample {
        id: "UK001",
        name: "British Financial Sanctions Target",
        entity_type: "Entity",
        programs: &["UK Financial Sanctions", "Asset Freeze"],
        city: "London",
        country: "United Kingdom",
    }],
};

const CANADA: SampleSet = SampleSet {
    source: "Global Affairs Canada",
    source_url: "https://www.international.gc.ca/world-monde/international_relations-relations_internationales/sanctions/index.aspx",
    samples: &[Sample {
        id: "CA001",
        name: "Canadian Sanctions Target",
        entity_type: "Individual",
        programs: &["Special Economic Measures", "Freezing Assets"],
        city: "Ottawa",
        country: "Canada",
    }],
};

const AUSTRALIA: SampleSet = SampleSet {
    source: "Australian Department of Foreign Affairs",
    source_url: "https://www.dfat.gov.au/international-relations/security/sanctions",
    samples: &[Sample {
        id: "AU001",
        name: "Australian Sanctions Target",
        entity_type: "Entity",
        programs: &["Autonomous Sanctions", "Targeted Financial Sanctions"],
        city: "Canberra",
        country: "Australia",
    }],
};

const JAPAN: SampleSet = SampleSet {
    source: "Japan Ministry of Economy, Trade and Industry",
    source_url: "https://www.meti.go.jp/policy/external_economy/trade_control/",
    samples: &[Sample {
        id: "JP001",
        name: "Japanese Export Control Target",
        entity_type: "Individual",
        programs: &["METI Export Control", "Foreign Exchange Control"],
        city: "Tokyo",
        country: "Japan",
    }],
};

/// Sample records for a source, stamped with `now`.
///
/// Unknown sources yield an empty list.
pub fn placeholder_entities(source_id: &str, now: DateTime<Utc>) -> Vec<Entity> {
    let jurisdiction = Jurisdiction::from(source_id);

    let set = match &jurisdiction {
        Jurisdiction::Eu => EU,
        Jurisdiction::Un => UN,
        Jurisdiction::Uk => UK,
        Jurisdiction::Canada => CANADA,
        Jurisdiction::Australia => AUSTRALIA,
        Jurisdiction::Japan => JAPAN,
        Jurisdiction::Ofac => OFAC,
        Jurisdiction::Other(_) => return Vec::new(),
    };

    set.samples
        .iter()
        .map(|sample| Entity {
            id: sample.id.to_string(),
            name: sample.name.to_string(),
            entity_type: sample.entity_type.to_string(),
            programs: sample.programs.iter().map(|p| p.to_string()).collect(),
            addresses: vec![Address::new(sample.city, sample.country)],
            jurisdiction: jurisdiction.as_str().to_string(),
            source: set.source.to_string(),
            source_url: set.source_url.to_string(),
            last_updated: now,
            is_real: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sources_have_samples() {
        let now = Utc::now();
        let expected = [
            ("OFAC", 1),
            ("EU", 2),
            ("UN", 1),
            ("UK", 1),
            ("Canada", 1),
            ("Australia", 1),
            ("Japan", 1),
        ];

        for (source, count) in expected {
            let entities = placeholder_entities(source, now);
            assert_eq!(entities.len(), count, "{}", source);
            for entity in &entities {
                assert_eq!(entity.jurisdiction, source);
                assert!(!entity.is_real);
                assert_eq!(entity.last_updated, now);
                assert!(!entity.programs.is_empty());
            }
        }
    }

    #[test]
    fn test_unknown_source_is_empty() {
        assert!(placeholder_entities("Atlantis", Utc::now()).is_empty());
    }

    #[test]
    fn test_samples_are_fixed() {
        let now = Utc::now();
        assert_eq!(placeholder_entities("EU", now), placeholder_entities("EU", now));

        let eu = placeholder_entities("EU", now);
        assert_eq!(eu[1].name, "Jean-Pierre Dubois");
        assert_eq!(eu[1].addresses[0], Address::new("Paris", "France"));
    }

    #[test]
    fn test_ofac_sample() {
        let ofac = placeholder_entities("OFAC", Utc::now());

        assert_eq!(ofac[0].id, "OFAC001");
        assert_eq!(ofac[0].programs, vec!["SDGT"]);
        assert_eq!(ofac[0].source, "US Treasury OFAC (Sample)");
        assert_eq!(ofac[0].source_url, OFAC_SDN_URL);
        assert_eq!(ofac[0].addresses, vec![Address::new("Unknown", "Various")]);
    }
}
