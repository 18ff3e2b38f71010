//! Event payloads and the coders that translate them.
//!
//! A [`CloudEventData`] holds a payload in decoded form together with its
//! content type and optional schema reference. Producing wire bytes is
//! always delegated to the [`DataCoder`] registered for the content type in
//! a [`CoderRegistry`]; nothing here guesses a representation.

pub mod coder;
pub mod json;
pub mod text;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::mime::{DEFAULT_CHARSET, parse_mime_type};

pub use coder::{CoderRegistry, DataCoder};
pub use json::{JSON_CONTENT_TYPE, JsonCoder, SchemaValidator};
pub use text::{TEXT_CONTENT_TYPE, TextCoder};

/// Decoded payload. Opaque to this layer; coders decide what it means.
pub type DecodedData = serde_json::Value;

/// Payload as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedData {
    Text(String),
    Binary(Bytes),
}

impl EncodedData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            EncodedData::Text(text) => text.as_bytes(),
            EncodedData::Binary(bytes) => &bytes[..],
        }
    }

    /// Borrows the payload as UTF-8 text, failing for non-UTF-8 bytes.
    pub fn as_text(&self) -> Result<&str> {
        match self {
            EncodedData::Text(text) => Ok(text.as_str()),
            EncodedData::Binary(bytes) => Ok(std::str::from_utf8(bytes)?),
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            EncodedData::Text(text) => Bytes::from(text),
            EncodedData::Binary(bytes) => bytes,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, EncodedData::Binary(_))
    }
}

impl From<String> for EncodedData {
    fn from(text: String) -> Self {
        EncodedData::Text(text)
    }
}

impl From<&str> for EncodedData {
    fn from(text: &str) -> Self {
        EncodedData::Text(text.to_string())
    }
}

impl From<Bytes> for EncodedData {
    fn from(bytes: Bytes) -> Self {
        EncodedData::Binary(bytes)
    }
}

impl From<Vec<u8>> for EncodedData {
    fn from(bytes: Vec<u8>) -> Self {
        EncodedData::Binary(Bytes::from(bytes))
    }
}

/// Payload of a [`CloudEvent`](crate::event::CloudEvent).
///
/// The content type is normalized when it is assigned, so it is always
/// either unset or a canonical media type name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudEventData {
    data: Option<DecodedData>,
    data_content_type: Option<String>,
    data_schema: Option<String>,
}

impl CloudEventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: impl Into<DecodedData>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the content type, normalizing it. Fails for malformed media types.
    pub fn with_content_type(mut self, content_type: &str) -> Result<Self> {
        self.set_data_content_type(Some(content_type))?;
        Ok(self)
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.data_schema = Some(schema.into());
        self
    }

    pub fn data(&self) -> Option<&DecodedData> {
        self.data.as_ref()
    }

    pub fn data_content_type(&self) -> Option<&str> {
        self.data_content_type.as_deref()
    }

    pub fn data_schema(&self) -> Option<&str> {
        self.data_schema.as_deref()
    }

    pub fn set_data(&mut self, data: Option<DecodedData>) {
        self.data = data;
    }

    pub fn set_data_content_type(&mut self, content_type: Option<&str>) -> Result<()> {
        self.data_content_type = content_type.map(normalize_content_type).transpose()?;
        Ok(())
    }

    pub fn set_data_schema(&mut self, schema: Option<String>) {
        self.data_schema = schema;
    }

    /// Looks up the coder for `content_type`.
    pub fn get_coder<'a>(coders: &'a CoderRegistry, content_type: &str) -> Result<&'a dyn DataCoder> {
        coders.resolve(content_type)
    }

    /// Encodes the payload with the coder for its content type.
    ///
    /// Computed on every call. Returns `Ok(None)` when there is no payload
    /// and fails with [`Error::MissingContentType`] when there is a payload
    /// but no content type.
    pub fn encoded_data(&self, coders: &CoderRegistry) -> Result<Option<EncodedData>> {
        let Some(data) = &self.data else {
            return Ok(None);
        };

        let content_type = self
            .data_content_type
            .as_deref()
            .ok_or(Error::MissingContentType("encoding event data"))?;

        let coder = Self::get_coder(coders, content_type)?;
        coder.encode(data, content_type).map(Some)
    }

    /// Decodes `encoded` with the coder for `content_type`, validating the
    /// result against `schema` when one is given.
    pub fn from_encoded(
        coders: &CoderRegistry,
        encoded: &EncodedData,
        content_type: &str,
        schema: Option<&str>,
    ) -> Result<Self> {
        let content_type = normalize_content_type(content_type)?;
        let coder = Self::get_coder(coders, &content_type)?;

        let data = coder.decode(encoded, &content_type)?;
        if schema.is_some() {
            coder.validate(&data, &content_type, schema)?;
        }

        Ok(Self {
            data: Some(data),
            data_content_type: Some(content_type),
            data_schema: schema.map(str::to_string),
        })
    }

    /// Runs the coder's validation over the current payload.
    ///
    /// There is nothing to validate without a payload.
    pub fn validate_data(&self, coders: &CoderRegistry) -> Result<()> {
        let Some(data) = &self.data else {
            return Ok(());
        };

        let content_type = self
            .data_content_type
            .as_deref()
            .ok_or(Error::MissingContentType("validating event data"))?;

        Self::get_coder(coders, content_type)?.validate(data, content_type, self.data_schema.as_deref())
    }
}

fn normalize_content_type(content_type: &str) -> Result<String> {
    Ok(parse_mime_type(content_type, Some(DEFAULT_CHARSET))?.name())
}
