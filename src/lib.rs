//! eventkit - CloudEvents data model and transcoding
//!
//! Core library for building CloudEvents, encoding their payloads by content
//! type, and moving them through event formats and the HTTP binding.
//!
//! Coders and formats are looked up in explicit registries
//! ([`CoderRegistry`], [`FormatRegistry`]) that callers construct once and
//! pass by reference.

pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod formats;
pub mod http;
pub mod mime;

pub use data::{CloudEventData, CoderRegistry, DataCoder, DecodedData, EncodedData};
pub use error::{Error, Result};
pub use event::{CloudEvent, CloudEventBuilder};
pub use formats::{EventFormat, FormatId, FormatRegistry, JsonFormat};
pub use mime::{MimeType, MimeTypeMap, parse_mime_type};
