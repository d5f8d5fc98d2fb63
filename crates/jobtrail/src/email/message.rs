//! Provider message model.

use std::collections::HashMap;
use std::sync::LazyLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::debug;
use mail_parser::{HeaderName, Message, MessageParser, MimeHeaders, PartType};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{DecodeError, Result};

/// Internal dates before this year are treated as bogus.
const MIN_PLAUSIBLE_YEAR: i32 = 2004;

/// Nested parts deeper than this are ignored when converting raw messages.
const MAX_PART_DEPTH: usize = 32;

static RE_HEADER_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());
static RE_DAY_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s+([A-Za-z]{3})[A-Za-z]*\.?\s+(\d{4})").unwrap());

/// A message as delivered by the provider. Never mutated by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    /// Receipt time in milliseconds since the epoch, as a decimal string.
    #[serde(default)]
    pub internal_date: Option<String>,
    pub payload: MessagePart,
    /// Bodies stored outside the payload, keyed by attachment id
    /// (base64url-encoded, resolved by the fetch layer).
    #[serde(default)]
    pub attachments: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    pub mime_type: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: MessageBody,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    /// Inline base64url-encoded content.
    #[serde(default)]
    pub data: Option<String>,
    /// Reference to content stored outside the payload.
    #[serde(default)]
    pub attachment_id: Option<String>,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl MessagePart {
    pub fn is_multipart(&self) -> bool {
        self.mime_type.to_ascii_lowercase().starts_with("multipart/") || !self.parts.is_empty()
    }

    /// Parts carrying a filename are attachments, never body candidates.
    pub fn is_attachment(&self) -> bool {
        !self.filename.trim().is_empty()
    }
}

impl RawMessage {
    /// Looks up a top-level header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn subject(&self) -> &str {
        self.header("Subject").map(str::trim).unwrap_or_default()
    }

    pub fn internal_date(&self) -> Option<DateTime<Utc>> {
        let millis = self.internal_date.as_deref()?.trim().parse::<i64>().ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }

    /// Metadata view of this message as seen under `label`.
    pub fn metadata(&self, label: &str) -> MessageMetadata {
        MessageMetadata {
            message_id: self.id.clone(),
            label: label.to_string(),
            internal_date: self.internal_date(),
            subject: self.subject().to_string(),
            date_header: self.header("Date").map(str::to_string),
        }
    }

    /// Builds a message from raw RFC 822 bytes, re-encoding each leaf body
    /// as base64url so it decodes exactly like a provider payload. The
    /// `Date` header is kept as written and there is no internal date, so
    /// the received day is the sender's calendar day.
    pub fn from_rfc822(id: impl Into<String>, raw: &[u8]) -> Result<Self> {
        let id = id.into();
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| DecodeError::Unparseable(format!("message {} is not RFC 822", id)))?;

        let mut payload = convert_part(&message, 0, 0).ok_or_else(|| {
            DecodeError::Unparseable(format!("message {} has no root part", id))
        })?;

        if let Some(subject) = message.subject() {
            payload.headers.push(Header {
                name: "Subject".to_string(),
                value: subject.to_string(),
            });
        }

        if let Some(date) = message.header_raw(HeaderName::Date) {
            payload.headers.push(Header {
                name: "Date".to_string(),
                value: date.trim().to_string(),
            });
        }

        debug!(
            "Converted raw message {} ({} top-level parts)",
            id,
            payload.parts.len()
        );

        Ok(Self {
            id,
            internal_date: None,
            payload,
            attachments: HashMap::new(),
        })
    }
}

fn convert_part(message: &Message<'_>, index: usize, depth: usize) -> Option<MessagePart> {
    if depth > MAX_PART_DEPTH {
        return None;
    }
    let part = message.parts.get(index)?;

    let mime_type = part
        .content_type()
        .map(|ct| match ct.subtype() {
            Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
            None => ct.ctype().to_string(),
        })
        .unwrap_or_else(|| "text/plain".to_string())
        .to_ascii_lowercase();

    let filename = part.attachment_name().unwrap_or_default().to_string();

    let (data, parts) = match &part.body {
        PartType::Text(text) | PartType::Html(text) => {
            (Some(URL_SAFE_NO_PAD.encode(text.as_bytes())), Vec::new())
        }
        PartType::Binary(bytes) | PartType::InlineBinary(bytes) => {
            (Some(URL_SAFE_NO_PAD.encode(bytes)), Vec::new())
        }
        PartType::Message(_) => (None, Vec::new()),
        PartType::Multipart(children) => (
            None,
            children
                .iter()
                .filter_map(|child| convert_part(message, *child as usize, depth + 1))
                .collect(),
        ),
    };

    Some(MessagePart {
        mime_type,
        filename,
        headers: Vec::new(),
        body: MessageBody {
            size: data.as_ref().map(|d| d.len() as u64).unwrap_or(0),
            data,
            attachment_id: None,
        },
        parts,
    })
}

/// Message facts extractors may rely on. Dates come only from here,
/// never from body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadata {
    pub message_id: String,
    pub label: String,
    pub internal_date: Option<DateTime<Utc>>,
    pub subject: String,
    pub date_header: Option<String>,
}

impl MessageMetadata {
    /// Calendar date the message was received.
    ///
    /// The provider's internal date wins; the `Date` header is the fallback.
    pub fn received_on(&self) -> Option<NaiveDate> {
        if let Some(internal) = self.internal_date {
            if internal.year() >= MIN_PLAUSIBLE_YEAR {
                return Some(internal.date_naive());
            }
        }
        self.date_header.as_deref().and_then(parse_date_header)
    }
}

/// Parses an RFC 2822 `Date` header into the sender's calendar date.
pub fn parse_date_header(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }

    let without_comment = RE_HEADER_COMMENT.replace(value, "");
    if let Ok(dt) = DateTime::parse_from_rfc2822(&without_comment) {
        return Some(dt.date_naive());
    }

    let caps = RE_DAY_MONTH_YEAR.captures(value)?;
    let fragment = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&fragment, "%d %b %Y").ok()
}
