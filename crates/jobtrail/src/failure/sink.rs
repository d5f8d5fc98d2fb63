use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Serialize, Serializer};

use crate::classifier::ClassificationError;
use crate::email::DecodeError;
use crate::extract::ExtractionError;
use crate::record::ApplicationStatus;

/// Why a message ended up in the failure log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    UnmappedLabel(ClassificationError),
    Decode(DecodeError),
    Extraction(ExtractionError),
    /// The worker handling the message went away without a result.
    WorkerLost,
}

impl FailureReason {
    /// Short machine-friendly name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::UnmappedLabel(_) => "UnmappedLabel",
            FailureReason::Decode(_) => "DecodeError",
            FailureReason::Extraction(ExtractionError::MissingField { .. }) => "MissingField",
            FailureReason::Extraction(ExtractionError::UnrecognizedFormat { .. }) => {
                "UnrecognizedFormat"
            }
            FailureReason::WorkerLost => "WorkerLost",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UnmappedLabel(e) => write!(f, "{}", e),
            FailureReason::Decode(e) => write!(f, "DecodeError: {}", e),
            FailureReason::Extraction(e) => write!(f, "{}", e),
            FailureReason::WorkerLost => {
                f.write_str("WorkerLost: worker stopped before finishing the message")
            }
        }
    }
}

impl Serialize for FailureReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whatever was known about the message when it failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    pub date: Option<NaiveDate>,
    pub company: String,
    pub job_title: String,
    pub location: String,
    pub status: Option<ApplicationStatus>,
    pub metadata: String,
    pub comment: String,
}

/// Where a message sat in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOrigin {
    pub message_id: String,
    pub label: String,
    /// 1-based position within the label's batch.
    pub row_number: usize,
    pub total_in_batch: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub timestamp: DateTime<Utc>,
    pub message_id: String,
    pub label: String,
    pub row_number: usize,
    pub total_in_batch: usize,
    pub reason: FailureReason,
    pub partial_date: Option<NaiveDate>,
    pub partial_company: String,
    pub partial_job_title: String,
    pub partial_location: String,
    pub partial_status: String,
    pub partial_metadata: String,
    pub partial_comment: String,
    pub source_batch_id: String,
    pub date_range: String,
}

/// Collects failure records for one run.
#[derive(Debug)]
pub struct FailureSink {
    source_batch_id: String,
    date_range: String,
    records: Mutex<Vec<FailureRecord>>,
}

impl FailureSink {
    pub fn new(source_batch_id: impl Into<String>, date_range: impl Into<String>) -> Self {
        Self {
            source_batch_id: source_batch_id.into(),
            date_range: date_range.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends one failure. Never fails.
    pub fn record(&self, origin: &MessageOrigin, reason: FailureReason, partial: PartialRecord) {
        warn!(
            "Message {} ({} {}/{}) failed: {}",
            origin.message_id, origin.label, origin.row_number, origin.total_in_batch, reason
        );

        let record = FailureRecord {
            timestamp: Utc::now(),
            message_id: origin.message_id.clone(),
            label: origin.label.clone(),
            row_number: origin.row_number,
            total_in_batch: origin.total_in_batch,
            reason,
            partial_date: partial.date,
            partial_company: partial.company,
            partial_job_title: partial.job_title,
            partial_location: partial.location,
            partial_status: partial.status.map(String::from).unwrap_or_default(),
            partial_metadata: partial.metadata,
            partial_comment: partial.comment,
            source_batch_id: self.source_batch_id.clone(),
            date_range: self.date_range.clone(),
        };

        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failures in the order they were recorded.
    pub fn finalize(&self) -> Vec<FailureRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
