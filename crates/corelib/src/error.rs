//! Typed errors for values parsed from user input.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("unknown light type '{0}'")]
    UnknownLightKind(String),
    #[error("primitive index {0} out of range (0..=9)")]
    PrimitiveOutOfRange(u32),
}

pub type CoreResult<T> = Result<T, CoreError>;
