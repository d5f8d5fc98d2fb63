use std::fmt;

use thiserror::Error;

/// Fields recovered before an extractor gave up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFields {
    pub company: String,
    pub job_title: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Company,
    JobTitle,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Company => f.write_str("company"),
            MissingField::JobTitle => f.write_str("job_title"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The message was understood but a required field could not be found.
    #[error("MissingField: {field}")]
    MissingField {
        field: MissingField,
        partial: PartialFields,
    },

    /// Neither the body structure nor the subject line matched a known layout.
    #[error("UnrecognizedFormat")]
    UnrecognizedFormat { partial: PartialFields },
}

impl ExtractionError {
    pub fn partial(&self) -> &PartialFields {
        match self {
            ExtractionError::MissingField { partial, .. } => partial,
            ExtractionError::UnrecognizedFormat { partial } => partial,
        }
    }
}
