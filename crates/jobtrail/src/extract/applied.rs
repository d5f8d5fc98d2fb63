//! Extractor for plain-text "application sent" confirmations.
//!
//! The body lists the job title, company and location on consecutive
//! non-empty lines, usually right after a "Your application was sent to
//! {company}" line. The subject carries the same phrase and is used to
//! check, or recover, the company.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::error::{ExtractionError, MissingField, PartialFields};
use super::text::{collapse_whitespace, trim_subject_value};
use super::ExtractedFields;
use crate::email::MessageMetadata;
use crate::record::IdentityKey;

const ANCHOR: &str = "your application was sent to";

static RE_SENT_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)your application was sent to\s+(.+?)\s*$").unwrap());

pub fn extract(body: &str, metadata: &MessageMetadata) -> Result<ExtractedFields, ExtractionError> {
    let lines: Vec<&str> = body.lines().collect();
    let anchor_index = lines
        .iter()
        .position(|line| line.to_lowercase().contains(ANCHOR));

    let anchor_company = anchor_index
        .and_then(|i| RE_SENT_TO.captures(lines[i].trim()))
        .map(|caps| trim_subject_value(&caps[1]))
        .filter(|c| !c.is_empty());

    let start = anchor_index.map(|i| i + 1).unwrap_or(0);
    let mut fields = lines[start..]
        .iter()
        .map(|line| collapse_whitespace(line))
        .filter(|line| !line.is_empty());

    let job_title = fields.next().unwrap_or_default();
    let body_company = fields.next().unwrap_or_default();
    let location = fields.next().unwrap_or_default();

    let subject_company = RE_SENT_TO
        .captures(&metadata.subject)
        .map(|caps| trim_subject_value(&caps[1]))
        .filter(|c| !c.is_empty());
    let hint = subject_company.or(anchor_company);

    let company = match (body_company.is_empty(), hint) {
        (false, Some(hint)) if !same_company(&body_company, &hint) => {
            debug!(
                "Message {}: body company '{}' disagrees with subject '{}', using subject",
                metadata.message_id, body_company, hint
            );
            hint
        }
        (false, _) => body_company,
        (true, Some(hint)) => hint,
        (true, None) => String::new(),
    };

    let partial = PartialFields {
        company: company.clone(),
        job_title: job_title.clone(),
        location: location.clone(),
    };

    if company.is_empty() {
        return Err(ExtractionError::MissingField {
            field: MissingField::Company,
            partial,
        });
    }
    if job_title.is_empty() {
        return Err(ExtractionError::MissingField {
            field: MissingField::JobTitle,
            partial,
        });
    }

    Ok(ExtractedFields {
        company,
        job_title,
        location,
    })
}

fn same_company(a: &str, b: &str) -> bool {
    IdentityKey::new(a, "") == IdentityKey::new(b, "")
}
