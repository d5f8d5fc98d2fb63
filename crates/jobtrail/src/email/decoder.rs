//! Payload decoding: find the body part of a given content type and turn
//! its base64url content into text.

use std::fmt;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use log::{debug, warn};

use super::error::{DecodeError, Result};
use super::message::{MessagePart, RawMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    PlainText,
    Html,
}

impl ContentType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ContentType::PlainText => "text/plain",
            ContentType::Html => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Decodes the body of `message` for the requested content type.
///
/// With no preference, `text/plain` is tried before `text/html`. Invalid
/// UTF-8 is replaced rather than rejected, so the only failure is the
/// absence of any matching part.
pub fn decode_body(message: &RawMessage, requested: Option<ContentType>) -> Result<String> {
    match requested {
        Some(content_type) => decode_content(message, content_type),
        None => decode_content(message, ContentType::PlainText)
            .or_else(|_| decode_content(message, ContentType::Html)),
    }
}

fn decode_content(message: &RawMessage, content_type: ContentType) -> Result<String> {
    let part = find_candidate(&message.payload, content_type.mime_type()).ok_or_else(|| {
        DecodeError::NoMatchingPart {
            content_type: content_type.mime_type().to_string(),
        }
    })?;

    let encoded = match (&part.body.data, &part.body.attachment_id) {
        (Some(data), _) => Some(data.as_str()),
        (None, Some(attachment_id)) => {
            let stored = message.attachments.get(attachment_id).map(String::as_str);
            if stored.is_none() {
                warn!(
                    "Message {}: body {} references missing attachment {}",
                    message.id, content_type, attachment_id
                );
            }
            stored
        }
        (None, None) => None,
    };

    let Some(encoded) = encoded else {
        debug!("Message {}: {} part has no body", message.id, content_type);
        return Ok(String::new());
    };

    let bytes = decode_base64url(encoded).unwrap_or_else(|| {
        warn!(
            "Message {}: {} body is not valid base64, using it verbatim",
            message.id, content_type
        );
        encoded.as_bytes().to_vec()
    });

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Depth-first, document-order search for the first non-attachment part
/// whose type matches. A non-multipart root is its own sole candidate.
fn find_candidate<'a>(part: &'a MessagePart, mime_type: &str) -> Option<&'a MessagePart> {
    if part.is_multipart() {
        return part
            .parts
            .iter()
            .find_map(|child| find_candidate(child, mime_type));
    }

    if part.mime_type.trim().eq_ignore_ascii_case(mime_type) && !part.is_attachment() {
        Some(part)
    } else {
        None
    }
}

/// Lenient base64url: whitespace and padding are ignored and the standard
/// alphabet is accepted too.
fn decode_base64url(data: &str) -> Option<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(cleaned)
        .or_else(|_| STANDARD_NO_PAD.decode(cleaned))
        .ok()
}
