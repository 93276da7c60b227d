//! Risk Engine for sanctions screening
//!
//! Deterministic, multi-factor risk scoring of sanctioned entities.
//! Scores are computed on demand at query time and never stored, so the
//! recency factor always reflects the moment of the query.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;
pub mod scoring;

pub use types::*;
pub use scoring::RiskScorer;
