//! Module for reading and writing transportation problem definitions
pub mod json;

use thiserror::Error;

use crate::transport::model::TransportError;

/// Errors associated with reading and writing problem definitions
#[derive(Error, Debug)]
pub enum IoError {
    /// Error when the problem file could not be read
    #[error("Could not read problem file: {0}")]
    FileNotFound(String),
    /// Error when the problem document could not be parsed
    #[error("Could not parse problem document: {0}")]
    DeserializeError(String),
    /// Error when the problem document could not be serialized
    #[error("Could not serialize problem document: {0}")]
    SerializeError(String),
    /// Error when the problem file could not be written
    #[error("Could not write problem file: {0}")]
    WriteError(String),
    /// Error when the parsed document does not describe a valid model
    #[error(transparent)]
    InvalidModel(#[from] TransportError),
}
