//! Local gazetteer of known place names
//!
//! A static name to coordinates dataset loaded once at process start and
//! shared immutably for the process lifetime. Lookup never touches the
//! network, so the resolver can answer common places without an upstream
//! round trip.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One gazetteer record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GazetteerEntry {
    /// (lon, lat) in decimal degrees
    pub coords: [f64; 2],
    /// ISO 3166-1 alpha-2, lowercase. `None` when the dataset omits it
    #[serde(default)]
    pub country_code: Option<String>,
}

/// In-memory place name lookup. Read-only after construction
#[derive(Debug, Default, Clone)]
pub struct Gazetteer {
    entries: HashMap<String, GazetteerEntry>,
}

/// Normalize a place query for matching (trim and lowercase)
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Gazetteer {
    /// Load the dataset from a JSON file.
    ///
    /// A missing or unparseable file degrades to an empty gazetteer with a
    /// warning, never an error: the remote geocoder still covers every
    /// lookup, just slower.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read gazetteer {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<HashMap<String, GazetteerEntry>>(&raw) {
            Ok(entries) => {
                let gazetteer = Self::from_entries(entries);
                debug!(
                    "Loaded {} gazetteer entries from {}",
                    gazetteer.len(),
                    path.display()
                );
                gazetteer
            }
            Err(e) => {
                warn!("Failed to parse gazetteer {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Build from already-known records. Keys are normalized on the way in
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, GazetteerEntry)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, entry)| (normalize(&key), entry))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a place name.
    ///
    /// Exact key match is tried first. On a miss, the first entry where one
    /// of query/key contains the other wins, with a minimum length of 2 on
    /// the contained side so a single character never matches by substring.
    /// Which of several substring candidates wins follows map iteration
    /// order; an accepted limitation, not something callers may rely on.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&GazetteerEntry> {
        let query = normalize(name);
        if let Some(entry) = self.entries.get(&query) {
            return Some(entry);
        }

        self.entries.iter().find_map(|(key, entry)| {
            let key_in_query = key.len() >= 2 && query.contains(key.as_str());
            let query_in_key = query.len() >= 2 && key.contains(query.as_str());
            (key_in_query || query_in_key).then_some(entry)
        })
    }
}
