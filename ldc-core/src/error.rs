use thiserror::Error;

/// Errors raised by the lens distortion core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdcError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LdcError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LdcError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LdcError>;
