use thiserror::Error;

/// Errors surfaced by the contract-facing modules, layered on top of
/// `host_vm::HostError` with a few DB-bridge- and crypto-specific variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error(transparent)]
    Host(#[from] host_vm::HostError),

    #[error("no such prepared statement: {0}")]
    UnknownStatement(u32),

    #[error("no such result set: {0}")]
    UnknownResultSet(u32),

    #[error("write operation attempted on a read-only snapshot")]
    ReadOnlySnapshot,

    #[error("ecdsa signature verification failed")]
    SignatureInvalid,

    #[error("malformed merkle proof list")]
    MalformedProof,
}

impl ContractError {
    pub fn catchable(message: impl Into<String>) -> Self {
        host_vm::HostError::catchable(message).into()
    }

    pub fn uncatchable(message: impl Into<String>) -> Self {
        host_vm::HostError::uncatchable(message).into()
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
