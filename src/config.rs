use serde::{Deserialize, Serialize};

use crate::{combi::CandidateGeneration, error::ConfigError, types::ItemsetLength};

pub const DEFAULT_MIN_SUPPORT: f64 = 0.2;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Parameters of a mining run.
///
/// Missing fields take their defaults when deserialized, so a caller may
/// supply only the thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub min_support: f64,
    pub min_confidence: f64,
    /// Largest itemset size to look for; unbounded when `None`.
    pub max_len: Option<ItemsetLength>,
    pub candidate_generation: CandidateGeneration,
    pub recommendation_limit: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_len: None,
            candidate_generation: CandidateGeneration::default(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            ..Self::default()
        }
    }

    pub fn with_max_len(mut self, max_len: ItemsetLength) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_candidate_generation(mut self, generation: CandidateGeneration) -> Self {
        self.candidate_generation = generation;
        self
    }

    pub fn with_recommendation_limit(mut self, limit: usize) -> Self {
        self.recommendation_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(ConfigError::MinSupport(self.min_support));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::MinConfidence(self.min_confidence));
        }
        if self.max_len == Some(0) {
            return Err(ConfigError::ZeroMaxLen);
        }
        if self.recommendation_limit == 0 {
            return Err(ConfigError::ZeroRecommendationLimit);
        }
        Ok(())
    }
}
