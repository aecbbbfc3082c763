//! Source error types.

use pipedict_model::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The backing store could not produce the table.
    #[error("data for '{node}' is unavailable: {reason}")]
    Unavailable { node: String, reason: String },

    /// A fixture did not fit its own schema.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SourceError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable { node, reason } => {
                format!("Could not load '{node}': {reason}")
            }
            Self::Model(error) => format!("The table data is malformed: {error}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
