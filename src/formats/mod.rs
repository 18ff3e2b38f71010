//! Event formats: whole-event serializations such as JSON.
//!
//! Formats form a small hierarchy rooted at [`FormatRegistry::BASE`]. Each
//! kind either sets its own `format_content_type`, inherits its parent's, or
//! (at the base) leaves it unset. Reading walks up the parent chain, so an
//! override only reaches the kind that made it and the descendants that do
//! not override it themselves.
//!
//! Kinds that carry an [`EventFormat`] implementation are registered under
//! their content type whenever it is set, which is how structured HTTP
//! messages find the format for their `Content-Type`.

pub mod json;

use std::fmt;
use std::sync::Arc;

use crate::data::CoderRegistry;
use crate::error::{Error, Result};
use crate::event::CloudEvent;
use crate::mime::MimeTypeMap;

pub use json::{JSON_FORMAT_CONTENT_TYPE, JSON_FORMAT_NAME, JsonFormat};

/// Serializes whole events to and from one wire representation.
pub trait EventFormat: Send + Sync {
    fn encode(&self, event: &CloudEvent, coders: &CoderRegistry) -> Result<String>;

    fn decode(&self, raw: &str, coders: &CoderRegistry) -> Result<CloudEvent>;
}

/// Handle to a format kind inside one [`FormatRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatId(usize);

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a format kind gets its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeSetting {
    /// Only the base kind is ever unset.
    Unset,
    Inherited,
    /// Canonical media type name.
    Explicit(String),
}

#[derive(Clone)]
struct FormatKind {
    name: String,
    parent: Option<FormatId>,
    setting: ContentTypeSetting,
    format: Option<Arc<dyn EventFormat>>,
    registered_as: Option<String>,
}

/// Format hierarchy plus the content-type index of concrete formats.
///
/// [`FormatRegistry::default`] contains the JSON format under
/// `application/cloudevents+json`.
#[derive(Clone)]
pub struct FormatRegistry {
    kinds: Vec<FormatKind>,
    formats: MimeTypeMap<FormatId>,
}

impl FormatRegistry {
    /// The abstract root every other kind descends from.
    pub const BASE: FormatId = FormatId(0);

    pub fn empty() -> Self {
        Self {
            kinds: vec![FormatKind {
                name: "cloudevent-format".to_string(),
                parent: None,
                setting: ContentTypeSetting::Unset,
                format: None,
                registered_as: None,
            }],
            formats: MimeTypeMap::new(),
        }
    }

    /// Declares a concrete format kind under `parent`.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        parent: FormatId,
        format: impl EventFormat + 'static,
    ) -> Result<FormatId> {
        self.push_kind(name.into(), parent, Some(Arc::new(format)))
    }

    /// Declares a kind with no implementation. It takes part in content-type
    /// inheritance but is never registered.
    pub fn declare_abstract(&mut self, name: impl Into<String>, parent: FormatId) -> Result<FormatId> {
        self.push_kind(name.into(), parent, None)
    }

    fn push_kind(
        &mut self,
        name: String,
        parent: FormatId,
        format: Option<Arc<dyn EventFormat>>,
    ) -> Result<FormatId> {
        self.kind(parent)?;

        let id = FormatId(self.kinds.len());
        tracing::debug!(format = %name, %id, parent = %parent, "Declared event format");
        self.kinds.push(FormatKind {
            name,
            parent: Some(parent),
            setting: ContentTypeSetting::Inherited,
            format,
            registered_as: None,
        });
        Ok(id)
    }

    /// Finds a kind by the name it was declared with.
    pub fn find(&self, name: &str) -> Option<FormatId> {
        self.kinds
            .iter()
            .position(|kind| kind.name == name)
            .map(FormatId)
    }

    pub fn name(&self, id: FormatId) -> Option<&str> {
        self.kinds.get(id.0).map(|kind| kind.name.as_str())
    }

    pub fn parent(&self, id: FormatId) -> Option<FormatId> {
        self.kinds.get(id.0).and_then(|kind| kind.parent)
    }

    pub fn setting(&self, id: FormatId) -> Option<&ContentTypeSetting> {
        self.kinds.get(id.0).map(|kind| &kind.setting)
    }

    /// The nearest explicitly set content type, walking from `id` up to the
    /// base.
    pub fn format_content_type(&self, id: FormatId) -> Option<&str> {
        let mut current = Some(id);
        while let Some(kind) = current.and_then(|id| self.kinds.get(id.0)) {
            match &kind.setting {
                ContentTypeSetting::Explicit(content_type) => return Some(content_type),
                ContentTypeSetting::Unset => return None,
                ContentTypeSetting::Inherited => current = kind.parent,
            }
        }
        None
    }

    /// Overrides the content type of `id`, or clears the override with `None`
    /// so the kind inherits again.
    ///
    /// A concrete kind is (re)registered under the new content type,
    /// superseding whatever was registered there, and loses its previous
    /// registration.
    pub fn set_format_content_type(&mut self, id: FormatId, content_type: Option<&str>) -> Result<()> {
        let canonical = content_type
            .map(MimeTypeMap::<FormatId>::canonical_key)
            .transpose()?;

        let kind = self.kind_mut(id)?;
        kind.setting = match (&canonical, kind.parent) {
            (Some(content_type), _) => ContentTypeSetting::Explicit(content_type.clone()),
            (None, Some(_)) => ContentTypeSetting::Inherited,
            (None, None) => ContentTypeSetting::Unset,
        };
        let concrete = kind.format.is_some();
        let previous = kind.registered_as.take();

        if let Some(previous) = previous {
            if self.formats.get(&previous).ok() == Some(&id) {
                self.formats.remove(&previous)?;
                tracing::debug!(%id, content_type = %previous, "Unregistered event format");
            }
        }

        let Some(content_type) = canonical.filter(|_| concrete) else {
            return Ok(());
        };

        if let Some(superseded) = self.formats.insert(&content_type, id)? {
            if superseded != id {
                tracing::warn!(%id, %superseded, content_type = %content_type, "Event format superseded");
            }
        }
        tracing::debug!(%id, content_type = %content_type, "Registered event format");
        self.kind_mut(id)?.registered_as = Some(content_type);
        Ok(())
    }

    /// The format kind registered for `content_type`.
    pub fn resolve_id(&self, content_type: &str) -> Result<FormatId> {
        match self.formats.get(content_type) {
            Ok(id) => Ok(*id),
            Err(Error::KeyNotFound(canonical)) => Err(Error::UnknownFormat(canonical)),
            Err(err) => Err(err),
        }
    }

    pub fn resolve(&self, content_type: &str) -> Result<&dyn EventFormat> {
        let id = self.resolve_id(content_type)?;
        self.format(id)
    }

    /// The implementation behind a concrete kind.
    pub fn format(&self, id: FormatId) -> Result<&dyn EventFormat> {
        self.kind(id)?
            .format
            .as_deref()
            .ok_or_else(|| Error::UnknownFormat(format!("abstract format {id}")))
    }

    /// Whether `content_type` names a registered format. Malformed media
    /// types never do.
    pub fn is_registered(&self, content_type: &str) -> bool {
        self.formats.contains_key(content_type)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.formats.keys()
    }

    fn kind(&self, id: FormatId) -> Result<&FormatKind> {
        self.kinds
            .get(id.0)
            .ok_or_else(|| Error::UnknownFormat(format!("format {id}")))
    }

    fn kind_mut(&mut self, id: FormatId) -> Result<&mut FormatKind> {
        self.kinds
            .get_mut(id.0)
            .ok_or_else(|| Error::UnknownFormat(format!("format {id}")))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        let registered = registry
            .declare(JSON_FORMAT_NAME, Self::BASE, JsonFormat)
            .and_then(|id| registry.set_format_content_type(id, Some(JSON_FORMAT_CONTENT_TYPE)));

        if let Err(err) = registered {
            tracing::error!(error = %err, "Failed to register built-in JSON format");
        }
        registry
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.kinds.iter().map(|kind| (&kind.name, &kind.setting)))
            .finish()
    }
}
