//! Extractor for HTML "application viewed" / "application rejected"
//! notifications.
//!
//! The provider's templates render the job card as a link styled with the
//! brand colour (the title) followed by a paragraph "Company · Location".
//! Both are located by those markers rather than by position, and the
//! subject line is the fallback when the markup does not match.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::error::{ExtractionError, MissingField, PartialFields};
use super::text::{decode_quoted_printable, text_content, trim_subject_value};
use super::ExtractedFields;
use crate::email::MessageMetadata;

/// An element whose inline `style` attribute sets the brand colour.
/// Stylesheet rules in `<style>` blocks do not count.
static RE_TITLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:a|td|span|p)\b[^>]*\bstyle\s*=\s*["'][^"'>]*color:\s*#0a66c2[^"'>]*["'][^>]*>(.*?)</(?:a|td|span|p)\s*>"#,
    )
    .unwrap()
});
static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").unwrap());
static RE_VIEWED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)your application was viewed by\s+(.+?)\s*$").unwrap());
static RE_APPLICATION_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)your application to\s+(.+?)\s+at\s+(.+?)\s*$").unwrap()
});

const SEPARATOR: char = '·';

pub fn extract(html: &str, metadata: &MessageMetadata) -> Result<ExtractedFields, ExtractionError> {
    let html = decode_quoted_printable(html);

    let mut job_title = find_title(&html).unwrap_or_default();
    let (mut company, location) = find_company_and_location(&html).unwrap_or_default();

    if job_title.is_empty() || company.is_empty() {
        debug!(
            "Message {}: job card incomplete (title={:?}, company={:?}), trying subject",
            metadata.message_id, job_title, company
        );
        let (subject_title, subject_company) = parse_subject(&metadata.subject);
        if job_title.is_empty() {
            job_title = subject_title.unwrap_or_default();
        }
        if company.is_empty() {
            company = subject_company.unwrap_or_default();
        }
    }

    let partial = PartialFields {
        company: company.clone(),
        job_title: job_title.clone(),
        location: location.clone(),
    };

    match (company.is_empty(), job_title.is_empty()) {
        (true, true) => Err(ExtractionError::UnrecognizedFormat { partial }),
        (true, false) => Err(ExtractionError::MissingField {
            field: MissingField::Company,
            partial,
        }),
        (false, true) => Err(ExtractionError::MissingField {
            field: MissingField::JobTitle,
            partial,
        }),
        (false, false) => Ok(ExtractedFields {
            company,
            job_title,
            location,
        }),
    }
}

fn find_title(html: &str) -> Option<String> {
    RE_TITLE_BLOCK
        .captures_iter(html)
        .map(|caps| text_content(&caps[1]))
        .find(|title| !title.is_empty())
}

fn find_company_and_location(html: &str) -> Option<(String, String)> {
    RE_PARAGRAPH
        .captures_iter(html)
        .map(|caps| text_content(&caps[1]))
        .find_map(|text| {
            let (company, location) = text.split_once(SEPARATOR)?;
            let company = company.trim();
            if company.is_empty() {
                return None;
            }
            Some((company.to_string(), location.trim().to_string()))
        })
}

/// Returns `(job_title, company)` from whichever subject template matches.
fn parse_subject(subject: &str) -> (Option<String>, Option<String>) {
    if let Some(caps) = RE_APPLICATION_TO.captures(subject) {
        return (
            Some(trim_subject_value(&caps[1])),
            Some(trim_subject_value(&caps[2])),
        );
    }
    if let Some(caps) = RE_VIEWED_BY.captures(subject) {
        return (None, Some(trim_subject_value(&caps[1])));
    }
    (None, None)
}
