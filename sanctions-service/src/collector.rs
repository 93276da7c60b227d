use crate::config::Config;
use crate::error::Result;
use crate::observer::CollectionObserver;
use crate::ofac::OfacFeed;
use crate::placeholder::placeholder_entities;
use crate::types::{Entity, SourceOutcome};
use chrono::{DateTime, Utc};
use tracing::debug;

/// A source backed by a real, downloadable feed
#[derive(Debug, Clone)]
pub struct RealFeedSource {
    code: String,
    name: String,
    feed: OfacFeed,
}

impl RealFeedSource {
    pub fn ofac(feed: OfacFeed) -> Self {
        Self {
            code: "OFAC".to_string(),
            name: "OFAC (US Treasury)".to_string(),
            feed,
        }
    }

    /// Never yields an empty outcome: any feed failure falls back to samples
    pub async fn collect(&self, now: DateTime<Utc>) -> SourceOutcome {
        match self.feed.fetch(now).await {
            Ok(entities) => SourceOutcome::succeeded(entities),
            Err(e) => SourceOutcome::fell_back(placeholder_entities(&self.code, now), e.to_string()),
        }
    }
}

/// A source without a feed integration yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSource {
    code: String,
    name: String,
}

impl PlaceholderSource {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    pub async fn collect(&self, now: DateTime<Utc>) -> SourceOutcome {
        match self.collect_from_publisher(now).await {
            Ok(entities) => SourceOutcome::succeeded(entities),
            Err(e) => SourceOutcome::fell_back(placeholder_entities(&self.code, now), e.to_string()),
        }
    }

    // Publisher integrations are not wired yet; the sample set stands in
    async fn collect_from_publisher(&self, now: DateTime<Utc>) -> Result<Vec<Entity>> {
        debug!("No feed integration for {}, serving sample data", self.code);
        Ok(placeholder_entities(&self.code, now))
    }
}

#[derive(Debug, Clone)]
pub enum Source {
    RealFeed(RealFeedSource),
    PlaceholderOnly(PlaceholderSource),
}

impl Source {
    pub fn code(&self) -> &str {
        match self {
            Source::RealFeed(s) => &s.code,
            Source::PlaceholderOnly(s) => &s.code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Source::RealFeed(s) => &s.name,
            Source::PlaceholderOnly(s) => &s.name,
        }
    }

    pub async fn collect(&self, now: DateTime<Utc>) -> SourceOutcome {
        match self {
            Source::RealFeed(s) => s.collect(now).await,
            Source::PlaceholderOnly(s) => s.collect(now).await,
        }
    }
}

/// Runs every configured source, in configuration order
#[derive(Debug, Clone)]
pub struct SourceCollector {
    sources: Vec<Source>,
}

impl SourceCollector {
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// OFAC first, then every placeholder-only source
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut sources = vec![Source::RealFeed(RealFeedSource::ofac(OfacFeed::new(&config.ofac)?))];
        sources.extend(
            config
                .placeholder_sources
                .iter()
                .map(|s| Source::PlaceholderOnly(PlaceholderSource::new(&s.code, &s.name))),
        );
        Ok(Self::new(sources))
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// One outcome per source; a failing source never stops the others
    pub async fn collect_all(
        &self,
        now: DateTime<Utc>,
        observer: &dyn CollectionObserver,
    ) -> Vec<(String, SourceOutcome)> {
        let mut outcomes = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            observer.source_started(source.name());

            let outcome = source.collect(now).await;
            match outcome.error() {
                None => observer.source_succeeded(source.code(), outcome.count()),
                Some(error) => observer.source_fell_back(source.code(), outcome.count(), error),
            }

            outcomes.push((source.code().to_string(), outcome));
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::observer::testing::RecordingObserver;
    use std::path::PathBuf;

    fn unreachable_ofac() -> RealFeedSource {
        let config = FeedConfig {
            path: Some(PathBuf::from("/nonexistent/sdn.xml")),
            ..FeedConfig::default()
        };
        RealFeedSource::ofac(OfacFeed::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_real_feed_failure_falls_back_to_samples() {
        let now = Utc::now();
        let outcome = unreachable_ofac().collect(now).await;

        assert!(!outcome.success());
        assert!(outcome.error().is_some());
        assert_eq!(outcome.count(), 1);
        assert_eq!(outcome.data(), placeholder_entities("OFAC", now).as_slice());
    }

    #[tokio::test]
    async fn test_placeholder_source_succeeds_with_samples() {
        let now = Utc::now();
        let outcome = PlaceholderSource::new("EU", "European Union").collect(now).await;

        assert!(outcome.success());
        assert_eq!(outcome.count(), 2);
        assert_eq!(outcome.into_data(), placeholder_entities("EU", now));
    }

    #[tokio::test]
    async fn test_unknown_placeholder_source_is_empty() {
        let outcome = PlaceholderSource::new("Atlantis", "Atlantis").collect(Utc::now()).await;

        assert!(outcome.success());
        assert_eq!(outcome.count(), 0);
    }

    #[tokio::test]
    async fn test_collect_all_keeps_configuration_order() {
        let collector = SourceCollector::new(vec![
            Source::RealFeed(unreachable_ofac()),
            Source::PlaceholderOnly(PlaceholderSource::new("UN", "United Nations")),
            Source::PlaceholderOnly(PlaceholderSource::new("EU", "European Union")),
        ]);
        let observer = RecordingObserver::default();

        let outcomes = collector.collect_all(Utc::now(), &observer).await;
        let codes: Vec<&str> = outcomes.iter().map(|(code, _)| code.as_str()).collect();

        assert_eq!(codes, vec!["OFAC", "UN", "EU"]);
        assert!(!outcomes[0].1.success());
        assert!(outcomes[1].1.success());
        assert_eq!(
            *observer.events.lock(),
            vec![
                "start OFAC (US Treasury)",
                "fallback OFAC 1",
                "start United Nations",
                "ok UN 1",
                "start European Union",
                "ok EU 2",
            ]
        );
    }

    #[test]
    fn test_from_config_order() {
        let collector = SourceCollector::from_config(&Config::default()).unwrap();
        let codes: Vec<&str> = collector.sources().iter().map(|s| s.code()).collect();

        assert_eq!(codes, vec!["OFAC", "EU", "UN", "UK", "Canada", "Australia", "Japan"]);
        assert!(matches!(collector.sources()[0], Source::RealFeed(_)));
    }
}
