use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::data::coder::DataCoder;
use crate::data::{DecodedData, EncodedData};
use crate::error::{Error, Result};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Checks a decoded JSON payload against one named schema.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, data: &DecodedData) -> anyhow::Result<()>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&DecodedData) -> anyhow::Result<()> + Send + Sync,
{
    fn validate(&self, data: &DecodedData) -> anyhow::Result<()> {
        self(data)
    }
}

/// Built-in coder for `application/json`.
///
/// Encodes to compact JSON text. Schemas are referenced by name; a name with
/// no registered [`SchemaValidator`] is accepted as-is.
#[derive(Clone, Default)]
pub struct JsonCoder {
    schemas: HashMap<String, Arc<dyn SchemaValidator>>,
}

impl JsonCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(
        mut self,
        schema: impl Into<String>,
        validator: impl SchemaValidator + 'static,
    ) -> Self {
        self.schemas.insert(schema.into(), Arc::new(validator));
        self
    }
}

impl DataCoder for JsonCoder {
    fn encode(&self, data: &DecodedData, _content_type: &str) -> Result<EncodedData> {
        Ok(EncodedData::Text(serde_json::to_string(data)?))
    }

    fn decode(&self, encoded: &EncodedData, _content_type: &str) -> Result<DecodedData> {
        Ok(serde_json::from_slice(encoded.as_bytes())?)
    }

    fn validate(&self, data: &DecodedData, content_type: &str, schema: Option<&str>) -> Result<()> {
        let Some(schema) = schema else {
            return Ok(());
        };

        let Some(validator) = self.schemas.get(schema) else {
            tracing::debug!(schema, content_type, "No validator for schema, accepting data");
            return Ok(());
        };

        validator.validate(data).map_err(|err| Error::Validation {
            schema: schema.to_string(),
            reason: format!("{err:#}"),
        })
    }
}

impl fmt::Debug for JsonCoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCoder")
            .field("schemas", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}
