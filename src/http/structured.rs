use bytes::Bytes;

use crate::data::CoderRegistry;
use crate::error::{Error, Result};
use crate::event::CloudEvent;
use crate::formats::{FormatId, FormatRegistry};
use crate::http::message::HttpMessage;
use crate::http::{CONTENT_TYPE, attributes_to_headers};

/// Structured content mode: the whole event serialized into the body by an
/// event format.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredHttpBinding;

impl StructuredHttpBinding {
    /// Serializes `event` with `format` and labels the body with the format's
    /// content type.
    ///
    /// With `include_attributes_in_headers` the attributes are also copied to
    /// `ce-` headers for intermediaries; [`from_http`](Self::from_http) never
    /// reads them back.
    pub fn to_http(
        event: &CloudEvent,
        format: FormatId,
        formats: &FormatRegistry,
        coders: &CoderRegistry,
        include_attributes_in_headers: bool,
    ) -> Result<HttpMessage> {
        let content_type = formats
            .format_content_type(format)
            .ok_or(Error::MissingContentType("structured-mode event format"))?;
        let body = formats.format(format)?.encode(event, coders)?;

        let mut message = HttpMessage::new();
        if include_attributes_in_headers {
            message.extend_headers(attributes_to_headers(&event.attributes()));
        }
        message.set_header(CONTENT_TYPE, content_type);
        message.body = Some(Bytes::from(body));

        tracing::debug!(
            id = event.id(),
            event_type = event.event_type(),
            content_type,
            include_attributes_in_headers,
            "Encoded event in structured mode"
        );
        Ok(message)
    }

    /// Decodes the body with the format registered for `Content-Type`.
    pub fn from_http(
        message: &HttpMessage,
        formats: &FormatRegistry,
        coders: &CoderRegistry,
    ) -> Result<CloudEvent> {
        let content_type = message
            .content_type()
            .ok_or(Error::MissingContentType("structured-mode HTTP message"))?;
        let format = formats.resolve(content_type)?;

        let body = message.non_empty_body().ok_or(Error::MissingBody)?;
        format.decode(std::str::from_utf8(body)?, coders)
    }
}
