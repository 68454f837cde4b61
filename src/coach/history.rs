use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// One past (question, suggestion) exchange.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Transcribed interviewer question
    pub question: String,
    /// Coaching bullets generated for it
    pub bullets: Vec<String>,
    /// Suggested follow-up (may be empty)
    pub follow_up: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded, per-session record of past exchanges.
///
/// Insertion order is significant; appending at capacity evicts the oldest
/// entry (FIFO). Exclusively owned by one session.
#[derive(Debug)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The `k` most recently appended entries, oldest first.
    pub fn recent(&self, k: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(k);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
