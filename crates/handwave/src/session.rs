//! History of the actions performed during a viewing session.

use std::collections::{BTreeMap, VecDeque};

use crate::mapper::ActionDescriptor;

/// Records every [`ActionDescriptor`] produced during a session.
///
/// Keeps the complete history for usage statistics, plus a short list of the most recent entries
/// for display.
#[derive(Debug, Clone)]
pub struct SessionLog {
    entries: Vec<ActionDescriptor>,
    recent: VecDeque<ActionDescriptor>,
    recent_capacity: usize,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RECENT_CAPACITY)
    }
}

impl SessionLog {
    pub const DEFAULT_RECENT_CAPACITY: usize = 10;

    /// Creates an empty log that remembers `recent_capacity` recent entries.
    pub fn new(recent_capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            recent: VecDeque::with_capacity(recent_capacity),
            recent_capacity,
        }
    }

    pub fn record(&mut self, descriptor: ActionDescriptor) {
        log::trace!("session: {} -> {}", descriptor.gesture, descriptor.action);
        if self.recent_capacity > 0 {
            if self.recent.len() == self.recent_capacity {
                self.recent.pop_back();
            }
            self.recent.push_front(descriptor.clone());
        }
        self.entries.push(descriptor);
    }

    /// Every recorded entry, oldest first.
    pub fn entries(&self) -> &[ActionDescriptor] {
        &self.entries
    }

    /// The most recent entries, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &ActionDescriptor> + '_ {
        self.recent.iter()
    }

    /// Number of times each gesture was used.
    pub fn counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.gesture.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// The distinct gestures used, in order of first use.
    pub fn gestures_used(&self) -> Vec<&str> {
        let mut used: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !used.contains(&entry.gesture.as_str()) {
                used.push(&entry.gesture);
            }
        }
        used
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recent.clear();
    }
}
