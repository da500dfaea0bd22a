//! The memory log: the ordered, append-only transcript passed to the model.

use stepwise_contracts::memory::{MemoryEntry, Role};

/// Ordered sequence of role-tagged entries.
///
/// `append` is the only mutator. It performs no role-alternation or
/// deduplication checks and never rewrites content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLog {
    entries: Vec<MemoryEntry>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.entries.push(MemoryEntry::new(role, content));
    }

    /// The entries exactly as appended, in order.
    pub fn render(&self) -> &[MemoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&MemoryEntry> {
        self.entries.last()
    }

    /// Most recent entry with the given role.
    pub fn last_by(&self, role: Role) -> Option<&MemoryEntry> {
        self.entries.iter().rev().find(|e| e.role == role)
    }

    /// Copy of the last `n` entries (fewer if the log is shorter).
    pub fn tail(&self, n: usize) -> Vec<MemoryEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].to_vec()
    }

    pub fn into_entries(self) -> Vec<MemoryEntry> {
        self.entries
    }
}
