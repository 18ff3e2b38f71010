use crate::data::{CloudEventData, CoderRegistry, EncodedData};
use crate::error::{Error, Result};
use crate::event::{CloudEvent, attribute, parse_time};
use crate::http::message::HttpMessage;
use crate::http::{CONTENT_TYPE, attributes_to_headers};

/// Binary content mode: attributes in `ce-` headers, payload as the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryHttpBinding;

impl BinaryHttpBinding {
    /// Maps `event` onto headers and a coder-encoded body.
    ///
    /// The payload's content type becomes `Content-Type`. Fails with
    /// [`Error::MissingContentType`] when there is a payload without one.
    pub fn to_http(event: &CloudEvent, coders: &CoderRegistry) -> Result<HttpMessage> {
        let mut message = HttpMessage::new();
        message.extend_headers(attributes_to_headers(&event.attributes()));

        if let Some(data) = event.data() {
            if let Some(content_type) = data.data_content_type() {
                message.set_header(CONTENT_TYPE, content_type);
            }
            message.body = data.encoded_data(coders)?.map(EncodedData::into_bytes);
        }

        tracing::debug!(
            id = event.id(),
            event_type = event.event_type(),
            has_body = message.body.is_some(),
            "Encoded event in binary mode"
        );
        Ok(message)
    }

    /// Rebuilds an event from `ce-` headers and the body.
    ///
    /// A body is decoded with the coder for `Content-Type` and validated
    /// against `ce-dataschema` when present. Without a `Content-Type` an
    /// empty body counts as no body, and any other body is an error.
    pub fn from_http(message: &HttpMessage, coders: &CoderRegistry) -> Result<CloudEvent> {
        let required = |name: &'static str| {
            message
                .ce_attribute(name)
                .map(str::to_string)
                .ok_or(Error::MissingAttribute(name))
        };

        let mut builder = CloudEvent::builder()
            .spec_version(required(attribute::SPEC_VERSION)?)
            .id(required(attribute::ID)?)
            .source(required(attribute::SOURCE)?)
            .event_type(required(attribute::TYPE)?);

        builder = match message.ce_attribute(attribute::TIME) {
            Some(time) => builder.time(parse_time(time)?),
            None => builder.without_time(),
        };
        if let Some(subject) = message.ce_attribute(attribute::SUBJECT) {
            builder = builder.subject(subject);
        }

        let content_type = message.content_type();
        let schema = message.ce_attribute(attribute::DATA_SCHEMA);

        let body = match content_type {
            Some(_) => message.body.as_ref(),
            None => message.non_empty_body(),
        };

        let data = match body {
            Some(body) => {
                let content_type =
                    content_type.ok_or(Error::MissingContentType("binary-mode HTTP body"))?;
                Some(CloudEventData::from_encoded(
                    coders,
                    &EncodedData::Binary(body.clone()),
                    content_type,
                    schema,
                )?)
            }
            None if content_type.is_none() && schema.is_none() => None,
            None => {
                let mut data = CloudEventData::new();
                data.set_data_content_type(content_type)?;
                data.set_data_schema(schema.map(str::to_string));
                Some(data)
            }
        };

        if let Some(data) = data {
            builder = builder.data(data);
        }
        builder.build()
    }
}
