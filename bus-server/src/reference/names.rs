//! Stop name lookup.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::normalize;

use super::error::ReferenceError;
use super::tables::{StopRow, read_table};

/// Read-only stop id → display name mapping.
///
/// Keys are normalized the same way as [`StopId`](crate::domain::StopId), so
/// `"108"` and `"000108"` find the same stop. Built once at startup and
/// shared without locking.
#[derive(Debug, Clone, Default)]
pub struct StopNames {
    by_id: HashMap<String, String>,
}

impl StopNames {
    /// Load names from a GTFS `stops.txt`.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let rows: Vec<StopRow> = read_table(path)?;
        Ok(Self::from_pairs(
            rows.into_iter().map(|r| (r.stop_id, r.stop_name)),
        ))
    }

    /// Build a lookup from `(stop_id, name)` pairs. The first name seen for
    /// a stop wins; blank names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut by_id = HashMap::new();
        for (id, name) in pairs {
            let name = name.into();
            if name.is_empty() {
                continue;
            }
            by_id
                .entry(normalize(id.as_ref().trim()).to_string())
                .or_insert(name);
        }
        Self { by_id }
    }

    /// Look up a stop name, if known.
    pub fn get(&self, stop_id: &str) -> Option<&str> {
        self.by_id
            .get(normalize(stop_id.trim()))
            .map(String::as_str)
    }

    /// Display name for a stop, or the identifier itself when unknown.
    pub fn lookup<'a>(&'a self, stop_id: &'a str) -> &'a str {
        self.get(stop_id).unwrap_or(stop_id)
    }

    /// Get the number of stops in the lookup.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the lookup is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
