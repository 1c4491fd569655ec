use thiserror::Error;

/// Errors produced while building or parsing an IPC frame (spec §4.3).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpcError {
    #[error("ipc frame truncated: needed {needed} more bytes at position {position}")]
    Truncated { position: usize, needed: usize },

    #[error("ipc frame item index {0} out of bounds")]
    IndexOutOfBounds(usize),

    #[error("ipc frame item type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: char, found: char },

    #[error("ipc frame contains unknown item type tag {0:#x}")]
    UnknownItemType(u8),

    #[error("ipc frame string is not valid utf-8")]
    InvalidUtf8,

    #[error("ipc frame item has invalid length {0}")]
    MalformedItem(i32),
}

pub type Result<T> = std::result::Result<T, IpcError>;
