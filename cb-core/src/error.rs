use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CbError {
    /// A file the content block cannot work without is absent or unreadable.
    MissingRequiredFile(String),
    /// A file was present but its content does not have the expected shape.
    InvalidDescriptor(String),
    Serialization(String),
    Filesystem(String),
    Io(#[from] std::io::Error),
    Other(#[from] anyhow::Error),
}

impl Display for CbError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CbError::MissingRequiredFile(s) => write!(f, "Missing required file: {}", s),
            CbError::InvalidDescriptor(s) => write!(f, "Invalid content block descriptor: {}", s),
            CbError::Serialization(s) => write!(f, "Serialization error: {}", s),
            CbError::Filesystem(s) => write!(f, "Filesystem error: {}", s),
            CbError::Io(e) => write!(f, "I/O error: {}", e),
            CbError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl From<serde_yaml_ng::Error> for CbError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        CbError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CbError {
    fn from(err: serde_json::Error) -> Self {
        CbError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CbError>;
