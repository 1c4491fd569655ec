use thiserror::Error;

/// Errors raised by the host-call bridge and stateful-variable layer
/// (spec §6, §7).
///
/// The teacher threads a boolean "is this script-catchable" flag alongside
/// its `Error` enum; this host collapses that into the discriminant itself
/// so a `pcall` boundary can match on the variant directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Raised by ordinary contract-level failures: `pcall` captures these
    /// and resumes the caller with `(false, message)`.
    #[error("{0}")]
    Catchable(String),

    /// Raised by host-integrity failures (resource exhaustion, corrupted
    /// state, protocol violations): unwinds past every `pcall` boundary.
    #[error("{0}")]
    Uncatchable(String),
}

impl HostError {
    pub fn catchable(message: impl Into<String>) -> Self {
        HostError::Catchable(message.into())
    }

    pub fn uncatchable(message: impl Into<String>) -> Self {
        HostError::Uncatchable(message.into())
    }

    pub fn is_catchable(&self) -> bool {
        matches!(self, HostError::Catchable(_))
    }

    pub fn message(&self) -> &str {
        match self {
            HostError::Catchable(m) | HostError::Uncatchable(m) => m,
        }
    }
}

impl From<host_bignum::BignumError> for HostError {
    fn from(err: host_bignum::BignumError) -> Self {
        HostError::Catchable(err.to_string())
    }
}

impl From<host_json::JsonError> for HostError {
    fn from(err: host_json::JsonError) -> Self {
        HostError::Catchable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
