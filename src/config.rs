use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::formats::JSON_FORMAT_CONTENT_TYPE;

/// Library configuration, loaded from YAML.
///
/// ```yaml
/// http:
///   mode: structured
///   format: application/cloudevents+json
///   include_attributes_in_headers: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
}

/// How [`to_http`](crate::http::to_http) encodes outgoing events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub mode: BindingMode,
    /// Content type of the event format used in structured mode
    pub format: String,
    /// Mirror attributes into `ce-` headers in structured mode
    pub include_attributes_in_headers: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    #[default]
    Binary,
    Structured,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            mode: BindingMode::Binary,
            format: JSON_FORMAT_CONTENT_TYPE.to_string(),
            include_attributes_in_headers: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}
