//! Session error types.

use thiserror::Error;

use pipedict_model::ModelError;
use pipedict_source::SourceError;
use pipedict_validate::ValidationError;
use pipedict_view::EditRejected;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no table is loaded")]
    NoActiveTable,

    #[error("no row is selected")]
    NoRowSelected,

    #[error("row {position} is not visible ({visible} rows shown)")]
    RowOutOfRange { position: usize, visible: usize },

    #[error("invalid value for {column}: {reason}")]
    InvalidValue { column: String, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    EditRejected(#[from] EditRejected),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl SessionError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoActiveTable => {
                "Select a node in the tree to load its data first.".to_string()
            }
            Self::NoRowSelected => "Select a row first.".to_string(),
            Self::RowOutOfRange { position, visible } => {
                format!("There is no row {position}; {visible} rows are shown.")
            }
            Self::InvalidValue { column, reason } => {
                format!("'{column}' cannot take that value: {reason}")
            }
            Self::Model(ModelError::DuplicateColumnName(name)) => {
                format!("Column '{name}' already exists.")
            }
            Self::Model(error) => format!("The change was not applied: {error}"),
            Self::Validation(error) => error.user_message(),
            Self::EditRejected(error) => format!("This cell cannot be edited: {error}"),
            Self::Source(error) => error.user_message(),
        }
    }

    /// Remediation hint, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoActiveTable => Some("Use 'load NODE' to open a table."),
            Self::NoRowSelected => Some("Use 'select ROW' to pick a row."),
            Self::RowOutOfRange { .. } => Some("Use 'show' to list the visible rows."),
            Self::Model(ModelError::DuplicateColumnName(_)) => {
                Some("Choose a column name that is not in use.")
            }
            Self::Validation(_) => {
                Some("Fill in the required fields of the reported row and save again.")
            }
            Self::EditRejected(EditRejected::RowDisabled { .. }) => {
                Some("Set the row's status back to enabled to edit it.")
            }
            Self::InvalidValue { .. } => Some("Enter a value matching the column type."),
            Self::Source(_) => Some("Try loading the node again."),
            Self::Model(_) | Self::EditRejected(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
