//! Transactional, undoable store over the IR document.
//!
//! All mutation happens inside a transaction: `begin_tx`/`commit`/`rollback`
//! explicitly, or the scoped [`Store::tx`] which commits on `Ok` and rolls
//! back before propagating on `Err`. Nested transactions collapse into the
//! outermost one; only the outermost commit reaches the history ring.

pub(crate) mod history;

mod conditionals;
mod elements;
mod events;
mod loops;
mod macros;
mod queries;
mod validate;
mod variables;

pub use conditionals::{ElifSpec, ElseSpec, IfSpec};
pub use elements::ElementSpec;
pub use loops::LoopPatch;
pub use validate::{ValidationIssue, ValidationReport};
pub use variables::VarSpec;

use crate::error::StoreError;
use crate::ids::{now_millis, IdGen};
use crate::ir::{DirtyFlags, IrDocument, IrSnapshot};

use self::history::History;

/// One open transaction frame.
#[derive(Debug)]
struct TxFrame {
    label: String,
    /// Deep clone of the document as it was when the frame opened.
    snapshot: IrDocument,
    #[allow(dead_code)]
    started_at: u64,
}

/// The authoritative, transactional, undoable model of the UI program.
#[derive(Debug)]
pub struct Store {
    doc: IrDocument,
    ids: IdGen,
    tx_stack: Vec<TxFrame>,
    history: History,
}

impl Store {
    /// A store over a fresh, empty document.
    pub fn new() -> Self {
        let doc = IrDocument::new();
        let history = History::new(doc.clone());
        Self {
            doc,
            ids: IdGen::new(),
            tx_stack: Vec::new(),
            history,
        }
    }

    /// Rebuild a store from a persisted snapshot. Id counters resume past
    /// every id present in the snapshot, and the loaded document becomes the
    /// undo baseline.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let doc: IrDocument = serde_json::from_str(json)?;
        let mut ids = IdGen::new();
        ids.resume_from(&doc);
        let history = History::new(doc.clone());
        Ok(Self {
            doc,
            ids,
            tx_stack: Vec::new(),
            history,
        })
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Open a transaction frame carrying a deep clone of the current
    /// document.
    pub fn begin_tx(&mut self, label: &str) {
        self.tx_stack.push(TxFrame {
            label: label.to_string(),
            snapshot: self.doc.clone(),
            started_at: now_millis(),
        });
    }

    /// Pop the innermost frame. When the stack empties, the committed
    /// document is stamped and deep-cloned into the history ring.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        let frame = self.tx_stack.pop().ok_or(StoreError::NoTransaction)?;
        if self.tx_stack.is_empty() {
            self.doc.meta.modified = now_millis();
            self.history.record(self.doc.clone());
            tracing::debug!(label = %frame.label, "transaction committed");
        }
        Ok(())
    }

    /// Pop the innermost frame and restore the document to the state the
    /// frame captured, discarding every change made since it opened.
    pub fn rollback(&mut self) -> Result<(), StoreError> {
        let frame = self.tx_stack.pop().ok_or(StoreError::NoTransaction)?;
        self.doc = frame.snapshot;
        tracing::debug!(label = %frame.label, "transaction rolled back");
        Ok(())
    }

    /// Scoped transaction: open, run `f`, commit. Any error from `f` rolls
    /// the frame back and propagates.
    pub fn tx<T>(
        &mut self,
        label: &str,
        f: impl FnOnce(&mut Self) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.begin_tx(label);
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                // The frame we just opened is guaranteed present.
                let _ = self.rollback();
                Err(err)
            }
        }
    }

    /// Depth of the open transaction stack.
    pub fn tx_depth(&self) -> usize {
        self.tx_stack.len()
    }

    pub(crate) fn ensure_tx(&self) -> Result<(), StoreError> {
        if self.tx_stack.is_empty() {
            Err(StoreError::NoTransaction)
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    /// Restore the previous committed snapshot. `Ok(false)` when already at
    /// the baseline; an error while any transaction is open.
    pub fn undo(&mut self) -> Result<bool, StoreError> {
        if !self.tx_stack.is_empty() {
            return Err(StoreError::TransactionOpen("undo"));
        }
        match self.history.undo() {
            Some(doc) => {
                self.doc = doc;
                tracing::debug!("undo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the next committed snapshot. `Ok(false)` at the newest
    /// entry; an error while any transaction is open.
    pub fn redo(&mut self) -> Result<bool, StoreError> {
        if !self.tx_stack.is_empty() {
            return Err(StoreError::TransactionOpen("redo"));
        }
        match self.history.redo() {
            Some(doc) => {
                self.doc = doc;
                tracing::debug!("redo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undoable committed steps.
    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    // ========================================================================
    // Snapshots and dirty flags
    // ========================================================================

    /// A frozen deep clone of the current document.
    pub fn ir(&self) -> IrSnapshot {
        IrSnapshot(self.doc.clone())
    }

    /// Serialize the current document to the persisted snapshot format.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }

    /// The per-category dirty markers. The store sets these and never clears
    /// them; call [`Store::reset_dirty`] from the consuming renderer.
    pub fn dirty(&self) -> &DirtyFlags {
        &self.doc.dirty_flags
    }

    /// Clear all dirty markers. For consumers; the store never calls this.
    pub fn reset_dirty(&mut self) {
        self.doc.dirty_flags = DirtyFlags::default();
    }

    // ------------------------------------------------------------------------
    // Internal plumbing shared by the op modules
    // ------------------------------------------------------------------------

    pub(crate) fn doc(&self) -> &IrDocument {
        &self.doc
    }

    pub(crate) fn mark_element(&mut self, id: &crate::ids::ElementId) {
        self.doc.dirty_flags.elements.insert(id.to_string());
    }

    pub(crate) fn mark_variable(&mut self, name: &str) {
        self.doc.dirty_flags.variables.insert(name.to_string());
    }

    pub(crate) fn mark_event(&mut self, id: &crate::ids::EventId) {
        self.doc.dirty_flags.events.insert(id.to_string());
    }

    pub(crate) fn mark_binding(&mut self, id: &crate::ids::BindingId) {
        self.doc.dirty_flags.bindings.insert(id.to_string());
    }

    pub(crate) fn mark_conditional(&mut self, id: &crate::ids::GroupId) {
        self.doc.dirty_flags.conditionals.insert(id.to_string());
    }

    pub(crate) fn mark_loop(&mut self, id: &crate::ids::ElementId) {
        self.doc.dirty_flags.loops.insert(id.to_string());
    }

    pub(crate) fn mark_structure(&mut self) {
        self.doc.dirty_flags.structure = true;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
