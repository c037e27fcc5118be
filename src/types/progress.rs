use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::chapter::ChapterId;

/// Last playback time reached per chapter, keyed by chapter id.
///
/// Serializes as a JSON object whose keys are the ids rendered as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    entries: BTreeMap<ChapterId, f64>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ChapterId) -> Option<f64> {
        self.entries.get(&id).copied()
    }

    /// Merges `id -> time`, keeping every other entry.
    /// Returns false when the stored value was already `time`, or when
    /// `time` is not finite (JSON has no encoding for it).
    pub fn record(&mut self, id: ChapterId, time: f64) -> bool {
        if !time.is_finite() || self.entries.get(&id) == Some(&time) {
            return false;
        }
        self.entries.insert(id, time);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChapterId, f64)> + '_ {
        self.entries.iter().map(|(id, time)| (*id, *time))
    }
}
