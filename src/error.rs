use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_support must lie in (0, 1], got {0}")]
    MinSupport(f64),
    #[error("min_confidence must lie in [0, 1], got {0}")]
    MinConfidence(f64),
    #[error("max_len must be at least 1")]
    ZeroMaxLen,
    #[error("recommendation_limit must be at least 1")]
    ZeroRecommendationLimit,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unknown strategy `{0}`, expected `levelwise` or `intersection`")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
