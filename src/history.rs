use crate::pixel_buffer::Snapshot;

pub const DEFAULT_MAX_HISTORY: usize = 30;

/// Externally observable undo/redo availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub index: usize,
    pub len: usize,
}

/// Bounded list of committed buffer snapshots with a cursor.
///
/// Entries after the cursor form the redo branch; a new commit drops them.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    index: usize,
    max_len: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryStack {
    /// Creates an empty history keeping at most `max_len` entries (at least one)
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_len: max_len.max(1),
        }
    }

    /// Drops everything and starts over from `initial`
    pub fn reset(&mut self, initial: Snapshot) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }

    /// Commits a snapshot. Returns `false` if it matches the current entry byte for byte.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        if let Some(head) = self.entries.get(self.index) {
            if head.as_bytes() == snapshot.as_bytes() {
                return false;
            }
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(snapshot);
        self.index = self.entries.len() - 1;

        while self.entries.len() > self.max_len {
            self.entries.remove(0);
            self.index -= 1;
        }
        true
    }

    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.index == 0 || self.entries.is_empty() {
            return None;
        }
        self.index -= 1;
        self.current()
    }

    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.current()
    }

    pub fn current(&self) -> Option<Snapshot> {
        self.entries.get(self.index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            index: self.index,
            len: self.entries.len(),
        }
    }
}
