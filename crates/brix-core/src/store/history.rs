//! Bounded undo/redo history.

use crate::ir::IrDocument;

/// Default history capacity, counting the baseline snapshot.
pub(crate) const HISTORY_CAPACITY: usize = 50;

/// A fixed-capacity ring of document snapshots with an integer cursor.
///
/// The ring lives outside the document so restoring a snapshot never
/// restores the cursor itself. Entries are deep clones on both the write and
/// read paths; restored state shares no aliasing with live state.
#[derive(Debug)]
pub(crate) struct History {
    entries: Vec<IrDocument>,
    /// Index of the entry matching the current document.
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Start a history whose baseline is the given document. The baseline is
    /// what the first undo restores to.
    pub fn new(baseline: IrDocument) -> Self {
        Self {
            entries: vec![baseline],
            cursor: 0,
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Record a committed document: truncate redo entries past the cursor,
    /// append, advance. On overflow the oldest entry is dropped and the
    /// cursor decremented, making the earliest change unreachable.
    pub fn record(&mut self, doc: IrDocument) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(doc);
        self.cursor += 1;
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back and return a clone of the previous snapshot, or `None` at
    /// the baseline.
    pub fn undo(&mut self) -> Option<IrDocument> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step forward and return a clone of the next snapshot, or `None` at
    /// the newest entry.
    pub fn redo(&mut self) -> Option<IrDocument> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of undoable steps.
    pub fn depth(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> IrDocument {
        IrDocument::new()
    }

    #[test]
    fn test_empty_history() {
        let mut h = History::new(doc());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut h = History::new(doc());
        let mut d1 = doc();
        d1.meta.modified = 1;
        h.record(d1.clone());

        assert!(h.can_undo());
        let restored = h.undo().unwrap();
        assert_eq!(restored.meta.modified, restored.meta.created);
        assert!(h.can_redo());
        assert_eq!(h.redo().unwrap().meta.modified, 1);
    }

    #[test]
    fn test_record_truncates_redo() {
        let mut h = History::new(doc());
        let mut d1 = doc();
        d1.meta.modified = 1;
        h.record(d1);
        h.undo();
        let mut d2 = doc();
        d2.meta.modified = 2;
        h.record(d2);
        assert!(!h.can_redo());
        assert_eq!(h.undo().map(|d| d.meta.modified == d.meta.created), Some(true));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = History::new(doc());
        for i in 0..HISTORY_CAPACITY as u64 + 5 {
            let mut d = doc();
            d.meta.modified = i + 1000;
            h.record(d);
        }
        // Ring is full: we can undo capacity-1 times, never reaching the
        // original baseline.
        let mut steps = 0;
        while h.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, HISTORY_CAPACITY - 1);
    }
}
