//! Error types shared by every layer of the crate.
//!
//! All failures are synchronous and permanent: they describe malformed input
//! or a missing registration, never a transient condition worth retrying.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The string is not a `type/subtype[+suffix][;key=value]*` media type.
    #[error("invalid MIME type `{raw}`: {reason}")]
    InvalidMimeType { raw: String, reason: &'static str },

    /// A [`MimeTypeMap`](crate::mime::MimeTypeMap) has no entry for the key.
    #[error("no entry for MIME type `{0}`")]
    KeyNotFound(String),

    /// No data coder is registered for the content type.
    #[error("no data coder registered for content type `{0}`")]
    UnknownContentType(String),

    /// Data is present but nothing says how it is represented.
    #[error("{0} requires a content type")]
    MissingContentType(&'static str),

    /// The payload does not conform to its declared schema.
    #[error("data does not conform to schema `{schema}`: {reason}")]
    Validation { schema: String, reason: String },

    /// A required CloudEvents attribute is absent from the message.
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),

    #[error("structured message has no body")]
    MissingBody,

    /// No event format is registered for the content type.
    #[error("no event format registered for content type `{0}`")]
    UnknownFormat(String),

    /// Required or constant envelope fields were violated.
    #[error("invalid event: {0}")]
    EventValidation(String),

    /// A data coder or other extension failed in its own terms.
    #[error("data coder failed: {0:#}")]
    Coder(#[source] anyhow::Error),

    #[error("invalid timestamp `{value}`: {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
