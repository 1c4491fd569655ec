use thiserror::Error;

/// Errors produced by bignum operations.
///
/// Messages are bit-exact with spec §6 so the host-call bridge can surface
/// them to contract code without rewriting strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BignumError {
    #[error("bignum not enough memory")]
    NotEnoughMemory,
    #[error("bignum invalid number string")]
    InvalidNumberString,
    #[error("bignum divide by zero")]
    DivideByZero,
    #[error("bignum over max limit")]
    OverMaxLimit,
    #[error("bignum under min limit")]
    UnderMinLimit,
    #[error("bignum not allowed negative value")]
    NotAllowedNegative,
}

pub type Result<T> = std::result::Result<T, BignumError>;
