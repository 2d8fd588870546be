use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Canonical `YYYY-MM-DD` date string used as the key of every per-day map.
pub type DateKey = String;

/// Per-day activity counts. Counts only ever grow.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ActivityData(BTreeMap<DateKey, u32>);

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatus {
    pub has_completed: bool,
    pub has_incomplete: bool,
}

pub type TasksStatusData = BTreeMap<DateKey, TaskStatus>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum IntensityLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ActivityData {
    pub fn new() -> Self {
        ActivityData(BTreeMap::new())
    }

    /// Count for a date; missing keys read as zero.
    pub fn count(&self, date: &str) -> u32 {
        self.0.get(date).copied().unwrap_or(0)
    }

    pub fn add(&mut self, date: &str, amount: u32) {
        let entry = self.0.entry(date.to_string()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Adds every count of `other` into `self`. Order of merges does not matter.
    pub fn merge(&mut self, other: &ActivityData) {
        for (date, count) in &other.0 {
            self.add(date, *count);
        }
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|c| *c as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DateKey, u32)> for ActivityData {
    fn from_iter<I: IntoIterator<Item = (DateKey, u32)>>(iter: I) -> Self {
        let mut data = ActivityData::new();
        for (date, count) in iter {
            data.add(&date, count);
        }
        data
    }
}

impl TaskStatus {
    pub fn has_any(&self) -> bool {
        self.has_completed || self.has_incomplete
    }
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 5] = [
        IntensityLevel::None,
        IntensityLevel::Low,
        IntensityLevel::Medium,
        IntensityLevel::High,
        IntensityLevel::VeryHigh,
    ];

    pub fn from_count(count: u32) -> Self {
        match count {
            0 => IntensityLevel::None,
            1..=2 => IntensityLevel::Low,
            3..=5 => IntensityLevel::Medium,
            6..=10 => IntensityLevel::High,
            _ => IntensityLevel::VeryHigh,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
