//! Payload decoding error types.

use thiserror::Error;

/// Errors that can occur while turning a message payload into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No part of the message has the requested content type.
    #[error("no {content_type} part found in message")]
    NoMatchingPart { content_type: String },

    /// A raw RFC 822 message could not be parsed at all.
    #[error("failed to parse raw message: {0}")]
    Unparseable(String),
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
