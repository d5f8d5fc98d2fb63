//! Message payloads as delivered by the mail provider, and their decoding.
//!
//! The fetch layer hands over either provider JSON payloads (a tree of
//! MIME parts with base64url bodies) or raw RFC 822 bytes; both end up as
//! a [`RawMessage`] that [`decode_body`] can walk.

pub mod decoder;
pub mod error;
pub mod message;

pub use decoder::{decode_body, ContentType};
pub use error::DecodeError;
pub use message::{Header, MessageBody, MessageMetadata, MessagePart, RawMessage};
