use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Charset injected into every parsed media type that does not declare one.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// RFC 2045 `tspecials`; none of these may appear in a token.
const TSPECIALS: &[char] = &[
    '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=',
];

/// A parsed, normalized media type.
///
/// Type, subtype, suffix and parameter keys/values are all lowercased, and
/// parameters are kept sorted by key. Equality and hashing cover that
/// normalized form, so `application/JSON; b=1 ; a=2` and
/// `application/json;a=2;b=1` are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType {
    type_name: String,
    subtype: String,
    suffix: Option<String>,
    parameters: BTreeMap<String, String>,
}

impl MimeType {
    /// Top-level type, e.g. `application`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Subtype with any `+suffix` removed, e.g. `cloudevents`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Structured syntax suffix, e.g. `json` for `application/cloudevents+json`.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Whether the payload is JSON, either directly (`application/json`) or
    /// through a `+json` structured syntax suffix.
    pub fn is_json(&self) -> bool {
        self.subtype == "json" || self.suffix.as_deref() == Some("json")
    }

    /// Canonical form: `type/subtype[+suffix]` followed by `;key=value` for
    /// each parameter in key order, without whitespace.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.subtype)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "+{suffix}")?;
        }
        for (key, value) in &self.parameters {
            write!(f, ";{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for MimeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_mime_type(s, Some(DEFAULT_CHARSET))
    }
}

/// Parses a media type string into its normalized form.
///
/// When the string carries no `charset` parameter, `default_charset` is
/// injected unless it is `None`.
///
/// # Example
///
/// ```
/// use eventkit::mime::parse_mime_type;
///
/// let mt = parse_mime_type("application/cloudevents+JSON; param=Value", Some("utf-8")).unwrap();
/// assert_eq!(mt.subtype(), "cloudevents");
/// assert_eq!(mt.suffix(), Some("json"));
/// assert_eq!(mt.name(), "application/cloudevents+json;charset=utf-8;param=value");
/// ```
pub fn parse_mime_type(raw: &str, default_charset: Option<&str>) -> Result<MimeType> {
    let invalid = |reason| Error::InvalidMimeType {
        raw: raw.to_string(),
        reason,
    };

    let (media, params) = match raw.split_once(';') {
        Some((media, params)) => (media, Some(params)),
        None => (raw, None),
    };

    let mut parts = media.split('/');
    let (Some(type_name), Some(subtype), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected exactly one `/` between type and subtype"));
    };
    let type_name = type_name.trim();
    let subtype = subtype.trim();

    if type_name.is_empty() || subtype.is_empty() {
        return Err(invalid("type and subtype must not be empty"));
    }

    let (subtype, suffix) = match subtype.rsplit_once('+') {
        Some((subtype, suffix)) if subtype.is_empty() || suffix.is_empty() => {
            return Err(invalid("subtype and suffix around `+` must not be empty"));
        }
        Some((subtype, suffix)) => (subtype, Some(suffix)),
        None => (subtype, None),
    };

    if !is_token(type_name) || !is_token(subtype) || !suffix.is_none_or(is_token) {
        return Err(invalid("type, subtype and suffix must be RFC 2045 tokens"));
    }

    let mut parameters = BTreeMap::new();

    for segment in params.into_iter().flat_map(|p| p.split(';')) {
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| invalid("parameter must be `key=value`"))?;

        let key = key.trim();
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        if value.contains('=') {
            return Err(invalid("parameter must contain exactly one `=`"));
        }
        if !is_token(key) || value.is_empty() {
            return Err(invalid("parameter key and value must not be empty"));
        }

        parameters.insert(key.to_ascii_lowercase(), value.to_lowercase());
    }

    if let Some(charset) = default_charset {
        parameters
            .entry("charset".to_string())
            .or_insert_with(|| charset.to_lowercase());
    }

    Ok(MimeType {
        type_name: type_name.to_ascii_lowercase(),
        subtype: subtype.to_ascii_lowercase(),
        suffix: suffix.map(str::to_ascii_lowercase),
        parameters,
    })
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_graphic() && !TSPECIALS.contains(&c))
}
