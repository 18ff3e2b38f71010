//! Data coder strategy and the registry that selects one by content type.

use std::fmt;
use std::sync::Arc;

use crate::data::json::{JSON_CONTENT_TYPE, JsonCoder};
use crate::data::text::{TEXT_CONTENT_TYPE, TextCoder};
use crate::data::{DecodedData, EncodedData};
use crate::error::{Error, Result};
use crate::mime::MimeTypeMap;

/// Encodes, decodes and validates event payloads for one family of content
/// types.
///
/// Coders are stateless from the caller's point of view and are always
/// handed the canonical content-type name (see
/// [`MimeType::name`](crate::mime::MimeType::name)).
pub trait DataCoder: Send + Sync {
    fn encode(&self, data: &DecodedData, content_type: &str) -> Result<EncodedData>;

    fn decode(&self, encoded: &EncodedData, content_type: &str) -> Result<DecodedData>;

    /// Checks `data` against `schema`. Coders without schema support accept
    /// everything.
    fn validate(
        &self,
        _data: &DecodedData,
        _content_type: &str,
        _schema: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Coders keyed by content type.
///
/// [`CoderRegistry::default`] carries the built-in JSON and plain-text
/// coders; [`CoderRegistry::empty`] starts blank. Cloning takes a snapshot,
/// which is how tests swap in their own coders without touching anyone
/// else's registry.
#[derive(Clone)]
pub struct CoderRegistry {
    coders: MimeTypeMap<Arc<dyn DataCoder>>,
}

impl CoderRegistry {
    pub fn empty() -> Self {
        Self {
            coders: MimeTypeMap::new(),
        }
    }

    /// Registers `coder` for `content_type`, replacing any coder registered
    /// for an equivalent content type.
    pub fn register(&mut self, content_type: &str, coder: impl DataCoder + 'static) -> Result<()> {
        self.register_arc(content_type, Arc::new(coder))
    }

    pub fn register_arc(&mut self, content_type: &str, coder: Arc<dyn DataCoder>) -> Result<()> {
        if self.coders.insert(content_type, coder)?.is_some() {
            tracing::warn!(content_type, "Replaced previously registered data coder");
        } else {
            tracing::debug!(content_type, "Registered data coder");
        }
        Ok(())
    }

    /// Finds the coder for `content_type`.
    ///
    /// Fails with [`Error::UnknownContentType`] rather than falling back to
    /// any default coder.
    pub fn resolve(&self, content_type: &str) -> Result<&dyn DataCoder> {
        match self.coders.get(content_type) {
            Ok(coder) => {
                tracing::trace!(content_type, "Resolved data coder");
                Ok(coder.as_ref())
            }
            Err(Error::KeyNotFound(canonical)) => Err(Error::UnknownContentType(canonical)),
            Err(err) => Err(err),
        }
    }

    /// Canonical names of every registered content type.
    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.coders.keys()
    }
}

impl Default for CoderRegistry {
    fn default() -> Self {
        let builtins: [(&str, Arc<dyn DataCoder>); 2] = [
            (JSON_CONTENT_TYPE, Arc::new(JsonCoder::new())),
            (TEXT_CONTENT_TYPE, Arc::new(TextCoder)),
        ];

        let mut registry = Self::empty();
        for (content_type, coder) in builtins {
            if let Err(err) = registry.register_arc(content_type, coder) {
                tracing::error!(content_type, error = %err, "Failed to register built-in coder");
            }
        }
        registry
    }
}

impl fmt::Debug for CoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.coders.keys()).finish()
    }
}
