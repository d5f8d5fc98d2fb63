//! The business record produced by extraction and merged by consolidation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Location used when a message does not name one.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Application status as assigned by a label.
///
/// The three well-known statuses get their own variants; anything else a
/// label configuration names is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Applied,
    Viewed,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Viewed => "Viewed",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Other(name) => name,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Applied" => ApplicationStatus::Applied,
            "Viewed" => ApplicationStatus::Viewed,
            "Rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(value),
        }
    }
}

impl From<&str> for ApplicationStatus {
    fn from(value: &str) -> Self {
        ApplicationStatus::from(value.to_string())
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job application, as extracted from a message or merged from many.
///
/// Field order matches the columns of the written report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub company: String,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub metadata_subject: String,
    pub comment: String,
}

impl ApplicationRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.company, &self.job_title)
    }

    /// True when the location carries no information.
    pub fn location_is_blank(&self) -> bool {
        is_blank_location(&self.location)
    }
}

pub(crate) fn is_blank_location(location: &str) -> bool {
    let trimmed = location.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_LOCATION)
}

/// Normalized `(company, job_title)` pair identifying one application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    company: String,
    job_title: String,
}

impl IdentityKey {
    pub fn new(company: &str, job_title: &str) -> Self {
        Self {
            company: normalize(company),
            job_title: normalize(job_title),
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
