//! Serialized registry types.
//!
//! Current on-disk format is v1. Documents with any other version are not
//! migrated; they load as an empty registry.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The only registry schema version this crate reads or writes.
pub const REGISTRY_VERSION: u32 = 1;

/// The on-disk JSON structure for the registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Schema version. Only documents with version == 1 are loaded.
    pub version: u32,
    /// Window name → record map, in insertion order.
    pub sessions: SessionMap,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            version: REGISTRY_VERSION,
            sessions: SessionMap::new(),
        }
    }
}

/// One known session. Written once at creation and replaced wholesale on
/// re-add; never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub dir: String,
    /// Repository URL, or empty for sessions without a clone.
    #[serde(default)]
    pub repo: String,
    /// Always equal to the record's key in [`Registry::sessions`].
    pub window_name: String,
    pub created_at: DateTime<Utc>,
}

/// Insertion-ordered map of window name → [`SessionRecord`].
///
/// Registries hold a handful of tmux windows, so lookups are a linear scan.
/// Re-inserting an existing key replaces the record in place and keeps its
/// position, matching how the JSON object is rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMap {
    entries: Vec<(String, SessionRecord)>,
}

impl SessionMap {
    pub fn new() -> Self {
        SessionMap {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SessionRecord> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, record)| record)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Upserts a record, returning the one it replaced.
    pub fn insert(&mut self, name: String, record: SessionRecord) -> Option<SessionRecord> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            return Some(std::mem::replace(existing, record));
        }
        self.entries.push((name, record));
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<SessionRecord> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &SessionRecord) -> bool,
    {
        self.entries.retain(|(key, record)| keep(key, record));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &SessionRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SessionRecord)> {
        self.entries
            .iter()
            .map(|(key, record)| (key.as_str(), record))
    }
}

impl FromIterator<(String, SessionRecord)> for SessionMap {
    fn from_iter<I: IntoIterator<Item = (String, SessionRecord)>>(iter: I) -> Self {
        let mut map = SessionMap::new();
        for (name, record) in iter {
            map.insert(name, record);
        }
        map
    }
}

impl IntoIterator for SessionMap {
    type Item = (String, SessionRecord);
    type IntoIter = std::vec::IntoIter<(String, SessionRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for SessionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, record) in &self.entries {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SessionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SessionMapVisitor)
    }
}

struct SessionMapVisitor;

impl<'de> Visitor<'de> for SessionMapVisitor {
    type Value = SessionMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of session records keyed by window name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = SessionMap::new();
        // Duplicate keys: last value wins, first position kept.
        while let Some((name, record)) = access.next_entry::<String, SessionRecord>()? {
            map.insert(name, record);
        }
        Ok(map)
    }
}
