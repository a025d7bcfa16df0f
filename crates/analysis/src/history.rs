use std::collections::VecDeque;

use crate::types::SuggestedResponse;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// One completed advisory call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub timestamp_ms: u64,
    /// Client finalized text at the moment the call was spawned; the
    /// scheduler uses it as its "already analyzed" baseline.
    pub trigger_text: String,
    pub suggestions: Vec<SuggestedResponse>,
}

impl AnalysisRecord {
    pub fn new(trigger_text: impl Into<String>, suggestions: Vec<SuggestedResponse>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp_ms: now_unix_ms(),
            trigger_text: trigger_text.into(),
            suggestions,
        }
    }
}

/// Bounded, time-ordered record of past advisory calls. Oldest evicted
/// first once capacity is reached.
#[derive(Debug, Clone)]
pub struct AnalysisHistory {
    records: VecDeque<AnalysisRecord>,
    capacity: usize,
}

impl Default for AnalysisHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, record: AnalysisRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.records.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

fn now_unix_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .min(u64::MAX as u128) as u64
}
