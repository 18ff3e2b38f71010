//! HTTP protocol binding.
//!
//! Maps events to and from HTTP headers and bodies in either content mode:
//!
//! - **`binary`**: attributes travel as `ce-<name>` headers, the payload's
//!   content type as `Content-Type`, and the coder-encoded payload as the body
//! - **`structured`**: an event format serializes the whole event into the
//!   body and `Content-Type` names that format
//! - **`message`**: the header/body container both modes read and write
//!
//! # Mode detection
//!
//! ```text
//!        ┌────────────────────┐
//!        │  incoming message  │
//!        └─────────┬──────────┘
//!                  │ Content-Type is a registered event format?
//!          ┌───────┴────────┐
//!          │ yes            │ no
//!          ▼                ▼
//!   ┌──────────────┐  ┌──────────────┐
//!   │  structured  │  │    binary    │
//!   └──────────────┘  └──────────────┘
//! ```
//!
//! Structured messages may mirror attributes into `ce-` headers; detection
//! and decoding ignore those copies.

pub mod binary;
pub mod message;
pub mod structured;

use std::collections::{BTreeMap, HashMap};

use crate::config::{BindingMode, HttpConfig};
use crate::data::CoderRegistry;
use crate::error::Result;
use crate::event::{CloudEvent, attribute};
use crate::formats::FormatRegistry;

pub use binary::BinaryHttpBinding;
pub use message::{HttpMessage, HttpMessageBuilder};
pub use structured::StructuredHttpBinding;

pub const CONTENT_TYPE: &str = "Content-Type";

/// Prefix of attribute headers.
pub const CE_PREFIX: &str = "ce-";

/// Turns event attributes into `ce-` headers.
///
/// `datacontenttype` is skipped: in binary mode it is carried by
/// `Content-Type`, and in structured mode `Content-Type` names the format.
pub fn attributes_to_headers(attributes: &BTreeMap<&'static str, String>) -> HashMap<String, String> {
    attributes
        .iter()
        .filter(|(name, _)| **name != attribute::DATA_CONTENT_TYPE)
        .map(|(name, value)| (format!("{CE_PREFIX}{name}"), value.clone()))
        .collect()
}

/// Whether `message` should be read in binary mode, i.e. its `Content-Type`
/// does not name a registered event format.
pub fn looks_like_binary(message: &HttpMessage, formats: &FormatRegistry) -> bool {
    !message
        .content_type()
        .is_some_and(|content_type| formats.is_registered(content_type))
}

/// Decodes an event from a message in whichever mode it uses.
pub fn from_http(
    message: &HttpMessage,
    coders: &CoderRegistry,
    formats: &FormatRegistry,
) -> Result<CloudEvent> {
    if looks_like_binary(message, formats) {
        tracing::debug!(ce_headers = message.has_ce_headers(), "Decoding binary-mode message");
        BinaryHttpBinding::from_http(message, coders)
    } else {
        tracing::debug!(content_type = ?message.content_type(), "Decoding structured-mode message");
        StructuredHttpBinding::from_http(message, formats, coders)
    }
}

/// Encodes an event in the mode and format named by `config`.
pub fn to_http(
    event: &CloudEvent,
    config: &HttpConfig,
    coders: &CoderRegistry,
    formats: &FormatRegistry,
) -> Result<HttpMessage> {
    match config.mode {
        BindingMode::Binary => BinaryHttpBinding::to_http(event, coders),
        BindingMode::Structured => {
            let format = formats.resolve_id(&config.format)?;
            StructuredHttpBinding::to_http(
                event,
                format,
                formats,
                coders,
                config.include_attributes_in_headers,
            )
        }
    }
}
