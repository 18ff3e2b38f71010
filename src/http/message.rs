use std::collections::HashMap;

use bytes::Bytes;

use crate::http::{CE_PREFIX, CONTENT_TYPE};

/// Headers and body of an HTTP request or response carrying an event.
///
/// Header names are matched case-insensitively, and at most one header per
/// name is kept. The status line, method and path are the transport's
/// business and are not modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMessage {
    headers: HashMap<String, String>,
    /// Message body, absent when the event has no payload
    pub body: Option<Bytes>,
}

/// Builder for [`HttpMessage`].
///
/// # Example
///
/// ```
/// use eventkit::http::HttpMessage;
///
/// let message = HttpMessage::builder()
///     .header("content-type", "application/json")
///     .body(r#"{"hello":"world"}"#)
///     .build();
///
/// assert_eq!(message.content_type(), Some("application/json"));
/// ```
#[derive(Debug, Default)]
pub struct HttpMessageBuilder {
    message: HttpMessage,
}

impl HttpMessageBuilder {
    /// Adds or replaces a header, ignoring the case of its name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message.set_header(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.message.body = Some(body.into());
        self
    }

    pub fn build(self) -> HttpMessage {
        self.message
    }
}

impl HttpMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> HttpMessageBuilder {
        HttpMessageBuilder::default()
    }

    /// Header names as last written, with their values.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Retrieves a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, dropping any existing header whose name differs only
    /// in case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove_header(&name);
        self.headers.insert(name, value.into());
    }

    /// Sets every header in `headers` as [`set_header`](Self::set_header)
    /// would, later entries winning.
    pub fn extend_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set_header(name, value);
        }
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Value of the `ce-<attribute>` header.
    pub fn ce_attribute(&self, attribute: &str) -> Option<&str> {
        self.header(&format!("{CE_PREFIX}{attribute}"))
    }

    /// Whether any `ce-` prefixed header is present.
    pub fn has_ce_headers(&self) -> bool {
        self.headers.keys().any(|key| {
            key.get(..CE_PREFIX.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CE_PREFIX))
        })
    }

    /// The body, treating an empty one as absent.
    pub fn non_empty_body(&self) -> Option<&Bytes> {
        self.body.as_ref().filter(|body| !body.is_empty())
    }
}
