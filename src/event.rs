//! The CloudEvents envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::data::CloudEventData;
use crate::error::{Error, Result};

/// The only CloudEvents specification version this crate speaks.
pub const SPEC_VERSION: &str = "1.0";

/// CloudEvents context attribute names as they appear on the wire.
pub mod attribute {
    pub const ID: &str = "id";
    pub const SOURCE: &str = "source";
    pub const SPEC_VERSION: &str = "specversion";
    pub const TYPE: &str = "type";
    pub const TIME: &str = "time";
    pub const SUBJECT: &str = "subject";
    pub const DATA_CONTENT_TYPE: &str = "datacontenttype";
    pub const DATA_SCHEMA: &str = "dataschema";
}

/// A CloudEvent: context attributes plus an optional payload.
///
/// `id`, `source` and `type` are never blank, and the spec version is fixed
/// at [`SPEC_VERSION`]. Equality compares every attribute and the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEvent {
    id: String,
    source: String,
    event_type: String,
    time: Option<DateTime<Utc>>,
    subject: Option<String>,
    data: Option<CloudEventData>,
}

impl CloudEvent {
    pub fn builder() -> CloudEventBuilder {
        CloudEventBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn spec_version(&self) -> &'static str {
        SPEC_VERSION
    }

    pub fn time(&self) -> Option<&DateTime<Utc>> {
        self.time.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn data(&self) -> Option<&CloudEventData> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut CloudEventData> {
        self.data.as_mut()
    }

    pub fn data_content_type(&self) -> Option<&str> {
        self.data.as_ref().and_then(CloudEventData::data_content_type)
    }

    pub fn data_schema(&self) -> Option<&str> {
        self.data.as_ref().and_then(CloudEventData::data_schema)
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> Result<()> {
        self.id = require_non_blank(attribute::ID, id.into())?;
        Ok(())
    }

    pub fn set_source(&mut self, source: impl Into<String>) -> Result<()> {
        self.source = require_non_blank(attribute::SOURCE, source.into())?;
        Ok(())
    }

    pub fn set_event_type(&mut self, event_type: impl Into<String>) -> Result<()> {
        self.event_type = require_non_blank(attribute::TYPE, event_type.into())?;
        Ok(())
    }

    /// Accepts only the version the event already has.
    pub fn set_spec_version(&mut self, spec_version: &str) -> Result<()> {
        check_spec_version(spec_version)
    }

    pub fn set_time(&mut self, time: Option<DateTime<Utc>>) {
        self.time = time;
    }

    pub fn set_subject(&mut self, subject: Option<String>) {
        self.subject = subject;
    }

    pub fn set_data(&mut self, data: Option<CloudEventData>) {
        self.data = data;
    }

    /// Context attributes keyed by their wire names.
    ///
    /// Unset optional attributes are left out. The payload itself is not an
    /// attribute; only its content type and schema appear here.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attributes = BTreeMap::from([
            (attribute::ID, self.id.clone()),
            (attribute::SOURCE, self.source.clone()),
            (attribute::SPEC_VERSION, SPEC_VERSION.to_string()),
            (attribute::TYPE, self.event_type.clone()),
        ]);

        if let Some(time) = &self.time {
            attributes.insert(attribute::TIME, format_time(time));
        }
        if let Some(subject) = &self.subject {
            attributes.insert(attribute::SUBJECT, subject.clone());
        }
        if let Some(content_type) = self.data_content_type() {
            attributes.insert(attribute::DATA_CONTENT_TYPE, content_type.to_string());
        }
        if let Some(schema) = self.data_schema() {
            attributes.insert(attribute::DATA_SCHEMA, schema.to_string());
        }

        attributes
    }
}

/// Builder for [`CloudEvent`].
///
/// `type` and `source` are required. `id` defaults to a random UUID and
/// `time` to the moment of [`build`](CloudEventBuilder::build) unless
/// [`without_time`](CloudEventBuilder::without_time) is called.
///
/// # Example
///
/// ```
/// use eventkit::event::CloudEvent;
///
/// let event = CloudEvent::builder()
///     .event_type("co.outcome.type")
///     .source("test")
///     .without_time()
///     .build()
///     .unwrap();
///
/// assert_eq!(event.spec_version(), "1.0");
/// assert!(event.time().is_none());
/// assert!(!event.id().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CloudEventBuilder {
    id: Option<String>,
    source: Option<String>,
    event_type: Option<String>,
    spec_version: Option<String>,
    time: Option<Option<DateTime<Utc>>>,
    subject: Option<String>,
    data: Option<CloudEventData>,
}

impl CloudEventBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn spec_version(mut self, spec_version: impl Into<String>) -> Self {
        self.spec_version = Some(spec_version.into());
        self
    }

    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(Some(time));
        self
    }

    /// Leaves `time` unset instead of stamping the build time.
    pub fn without_time(mut self) -> Self {
        self.time = Some(None);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn data(mut self, data: CloudEventData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn build(self) -> Result<CloudEvent> {
        if let Some(spec_version) = &self.spec_version {
            check_spec_version(spec_version)?;
        }

        let event_type = self.event_type.ok_or_else(|| missing(attribute::TYPE))?;
        let source = self.source.ok_or_else(|| missing(attribute::SOURCE))?;
        let id = self
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(CloudEvent {
            id: require_non_blank(attribute::ID, id)?,
            source: require_non_blank(attribute::SOURCE, source)?,
            event_type: require_non_blank(attribute::TYPE, event_type)?,
            time: self.time.unwrap_or_else(|| Some(Utc::now())),
            subject: self.subject,
            data: self.data,
        })
    }
}

/// RFC 3339 rendering used for the `time` attribute in every binding.
pub(crate) fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339()
}

pub(crate) fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|source| Error::InvalidTime {
            value: value.to_string(),
            source,
        })
}

pub(crate) fn check_spec_version(spec_version: &str) -> Result<()> {
    if spec_version == SPEC_VERSION {
        Ok(())
    } else {
        Err(Error::EventValidation(format!(
            "specversion must be {SPEC_VERSION}, got `{spec_version}`"
        )))
    }
}

fn missing(name: &str) -> Error {
    Error::EventValidation(format!("`{name}` is required"))
}

fn require_non_blank(name: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::EventValidation(format!("`{name}` must not be blank")));
    }
    Ok(value)
}
