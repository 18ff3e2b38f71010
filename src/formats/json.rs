//! JSON event format (`application/cloudevents+json`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize};

use crate::data::{CloudEventData, CoderRegistry, DecodedData, EncodedData};
use crate::error::{Error, Result};
use crate::event::{CloudEvent, attribute, format_time, parse_time};
use crate::formats::EventFormat;
use crate::mime::MimeType;

pub const JSON_FORMAT_CONTENT_TYPE: &str = "application/cloudevents+json";

/// Name the JSON format is declared under in the default registry.
pub const JSON_FORMAT_NAME: &str = "json";

/// Wire shape of an event. Field order is the order keys are written in.
#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    specversion: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataschema: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    data: Option<DecodedData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_base64: Option<String>,
}

/// A key that is present decodes to `Some`, even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<DecodedData>, D::Error> {
    DecodedData::deserialize(deserializer).map(Some)
}

/// Structured JSON encoding of a whole event.
///
/// Payloads with a JSON content type are embedded as `data` structurally;
/// other payloads go into `data` when the coder produced text and into
/// `data_base64` when it produced bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl EventFormat for JsonFormat {
    fn encode(&self, event: &CloudEvent, coders: &CoderRegistry) -> Result<String> {
        let mut wire = JsonEvent {
            id: Some(event.id().to_string()),
            source: Some(event.source().to_string()),
            specversion: Some(event.spec_version().to_string()),
            event_type: Some(event.event_type().to_string()),
            subject: event.subject().map(str::to_string),
            time: event.time().map(format_time),
            datacontenttype: event.data_content_type().map(str::to_string),
            dataschema: event.data_schema().map(str::to_string),
            ..JsonEvent::default()
        };

        let encoded = match event.data() {
            Some(data) => data.encoded_data(coders)?,
            None => None,
        };

        if let Some(encoded) = encoded {
            let is_json = match event.data_content_type() {
                Some(content_type) => content_type.parse::<MimeType>()?.is_json(),
                None => false,
            };

            if is_json {
                wire.data = Some(serde_json::from_slice(encoded.as_bytes())?);
            } else {
                match encoded {
                    EncodedData::Text(text) => wire.data = Some(DecodedData::String(text)),
                    EncodedData::Binary(bytes) => wire.data_base64 = Some(BASE64.encode(&bytes)),
                }
            }
        }

        Ok(serde_json::to_string(&wire)?)
    }

    fn decode(&self, raw: &str, coders: &CoderRegistry) -> Result<CloudEvent> {
        let wire: JsonEvent = serde_json::from_str(raw)?;

        let mut builder = CloudEvent::builder()
            .spec_version(wire.specversion.ok_or(Error::MissingAttribute(attribute::SPEC_VERSION))?)
            .id(wire.id.ok_or(Error::MissingAttribute(attribute::ID))?)
            .source(wire.source.ok_or(Error::MissingAttribute(attribute::SOURCE))?)
            .event_type(wire.event_type.ok_or(Error::MissingAttribute(attribute::TYPE))?);

        builder = match wire.time {
            Some(time) => builder.time(parse_time(&time)?),
            None => builder.without_time(),
        };
        if let Some(subject) = wire.subject {
            builder = builder.subject(subject);
        }

        let content_type = wire.datacontenttype;
        let schema = wire.dataschema;

        let data = match (wire.data, wire.data_base64) {
            (Some(_), Some(_)) => {
                return Err(Error::EventValidation(
                    "`data` and `data_base64` are mutually exclusive".to_string(),
                ));
            }
            (None, Some(encoded)) => {
                let content_type = content_type
                    .as_deref()
                    .ok_or(Error::MissingContentType("decoding `data_base64`"))?;
                let encoded = EncodedData::from(BASE64.decode(encoded)?);
                Some(CloudEventData::from_encoded(
                    coders,
                    &encoded,
                    content_type,
                    schema.as_deref(),
                )?)
            }
            (None, None) if content_type.is_none() && schema.is_none() => None,
            (data, None) => {
                let mut event_data = CloudEventData::new();
                event_data.set_data(data);
                event_data.set_data_content_type(content_type.as_deref())?;
                event_data.set_data_schema(schema);
                Some(event_data)
            }
        };

        if let Some(data) = data {
            builder = builder.data(data);
        }
        builder.build()
    }
}
