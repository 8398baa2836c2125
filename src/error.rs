//! Error types for bitgrid-compress

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("empty envelope")]
    EmptyEnvelope,

    #[error("unknown compression method tag {0}")]
    UnknownMethod(u8),

    #[error("truncated input: need at least {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("buffer too short for grid: expected {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("grid dimensions {width}x{height} exceed the configured cell limit")]
    DimensionsTooLarge { width: usize, height: usize },

    #[error("input of {0} bytes is too large to encode")]
    InputTooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
