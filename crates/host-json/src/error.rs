use thiserror::Error;

/// Errors produced by the deterministic JSON codec (spec §4.2, §6).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("nested table error")]
    NestedTable,
    #[error("cannot encode NaN or Infinity")]
    NonFiniteNumber,
    #[error("json parse error: {0}")]
    Parse(String),
    #[error("invalid bignum envelope")]
    InvalidBignumEnvelope,
    #[error("invalid utf-8 escape")]
    InvalidEscape,
    #[error("duplicate object key: {0}")]
    DuplicateKey(String),
}

pub type Result<T> = std::result::Result<T, JsonError>;
