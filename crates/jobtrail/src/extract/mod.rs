//! Per-parser field extraction.
//!
//! Each [`ParserType`] maps to one pure extraction function. Status comes
//! from the label assignment and the date from message metadata; the
//! extractors only recover the content fields.

pub mod applied;
pub mod error;
pub mod text;
pub mod viewed_rejected;

pub use error::{ExtractionError, MissingField, PartialFields};

use crate::config::{LabelAssignment, ParserType};
use crate::email::{ContentType, MessageMetadata};
use crate::record::{ApplicationRecord, UNKNOWN_LOCATION};

/// Content fields recovered from one message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub company: String,
    pub job_title: String,
    pub location: String,
}

impl ParserType {
    /// Body representation this parser works on.
    pub fn content_type(self) -> ContentType {
        match self {
            ParserType::Applied => ContentType::PlainText,
            ParserType::ViewedRejected => ContentType::Html,
        }
    }
}

/// Runs the extractor selected by `assignment` and completes the record
/// with status, date, subject and comment.
pub fn extract_record(
    assignment: &LabelAssignment,
    body: &str,
    metadata: &MessageMetadata,
) -> Result<ApplicationRecord, ExtractionError> {
    let fields = match assignment.parser_type {
        ParserType::Applied => applied::extract(body, metadata)?,
        ParserType::ViewedRejected => viewed_rejected::extract(body, metadata)?,
    };

    let location = if fields.location.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        fields.location
    };

    Ok(ApplicationRecord {
        company: fields.company,
        job_title: fields.job_title,
        status: assignment.status.clone(),
        date: metadata.received_on(),
        location,
        metadata_subject: metadata.subject.clone(),
        comment: generate_comment(&metadata.subject),
    })
}

pub fn generate_comment(subject: &str) -> String {
    let subject = subject.trim();
    if subject.is_empty() {
        "No subject found.".to_string()
    } else {
        format!("Email regarding: {}", subject)
    }
}
