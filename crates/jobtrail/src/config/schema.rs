use serde::{Deserialize, Serialize};

use super::date_range::DateRange;
use crate::record::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub labels: Vec<LabelAssignment>,
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

fn default_output_directory() -> String {
    "data/processed".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            worker_count: default_worker_count(),
            output_directory: default_output_directory(),
            date_range: DateRange::All,
            labels: vec![
                LabelAssignment::new(
                    "LinkedIn/Applied",
                    ApplicationStatus::Applied,
                    1,
                    ParserType::Applied,
                ),
                LabelAssignment::new(
                    "LinkedIn/Viewed",
                    ApplicationStatus::Viewed,
                    2,
                    ParserType::ViewedRejected,
                ),
                LabelAssignment::new(
                    "LinkedIn/Rejected",
                    ApplicationStatus::Rejected,
                    3,
                    ParserType::ViewedRejected,
                ),
            ],
        }
    }
}

/// Binds a mail label to the status it signals and the extractor that
/// understands its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAssignment {
    pub label_name: String,
    pub status: ApplicationStatus,
    /// Higher wins when the same application recurs under several labels.
    pub priority: i32,
    pub parser_type: ParserType,
}

impl LabelAssignment {
    pub fn new(
        label_name: impl Into<String>,
        status: ApplicationStatus,
        priority: i32,
        parser_type: ParserType,
    ) -> Self {
        Self {
            label_name: label_name.into(),
            status,
            priority,
            parser_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserType {
    /// Plain-text confirmation that an application was sent.
    Applied,
    /// HTML notification that an application was viewed or rejected.
    ViewedRejected,
}
