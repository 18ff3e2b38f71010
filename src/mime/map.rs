use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::mime::parser::{DEFAULT_CHARSET, parse_mime_type};

/// A map whose keys are media types.
///
/// Every key is parsed and stored under its canonical name, so an entry
/// inserted as `application/JSON` is found again as
/// `application/json; charset=utf-8`.
#[derive(Debug, Clone)]
pub struct MimeTypeMap<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for MimeTypeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MimeTypeMap<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Canonical name a raw key is stored under.
    pub fn canonical_key(key: &str) -> Result<String> {
        Ok(parse_mime_type(key, Some(DEFAULT_CHARSET))?.name())
    }

    /// Inserts `value` under the canonical form of `key`, returning the value
    /// previously stored there.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>> {
        let key = Self::canonical_key(key)?;
        Ok(self.entries.insert(key, value))
    }

    /// Looks up `key` through its canonical form.
    ///
    /// Fails with [`Error::KeyNotFound`] when nothing is stored there.
    pub fn get(&self, key: &str) -> Result<&V> {
        let key = Self::canonical_key(key)?;
        self.entries.get(&key).ok_or(Error::KeyNotFound(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut V> {
        let key = Self::canonical_key(key)?;
        self.entries.get_mut(&key).ok_or(Error::KeyNotFound(key))
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<V>> {
        let key = Self::canonical_key(key)?;
        Ok(self.entries.remove(&key))
    }

    /// Whether an equivalent key is stored. Unparseable keys are never stored.
    pub fn contains_key(&self, key: &str) -> bool {
        Self::canonical_key(key).is_ok_and(|key| self.entries.contains_key(&key))
    }

    /// Canonical names of the stored keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
