//! Store error types.

use crate::ids::{BindingId, ElementId, EventId, GroupId};
use thiserror::Error;

/// Errors raised by [`crate::store::Store`] mutators and queries.
///
/// Mutation errors throw synchronously; when raised inside a scoped
/// transaction they trigger rollback before propagating. Shape violations
/// (I5/I6/I7) are *not* errors — the validators collect those into a
/// [`crate::store::ValidationReport`] instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutator was called with no open transaction.
    #[error("no active transaction")]
    NoTransaction,

    /// Undo/redo was attempted while a transaction is open.
    #[error("cannot {0} while a transaction is open")]
    TransactionOpen(&'static str),

    #[error("unknown element: {0}")]
    UnknownElement(ElementId),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("unknown conditional group: {0}")]
    UnknownGroup(GroupId),

    #[error("unknown binding: {0}")]
    UnknownBinding(BindingId),

    #[error("unknown event: {0}")]
    UnknownEvent(EventId),

    #[error("duplicate variable name: {0}")]
    DuplicateVariable(String),

    #[error("static variable {0} cannot be updated")]
    StaticVariable(String),

    #[error("element {0} already has a text binding")]
    TextBound(ElementId),

    #[error("element {0} already has static text")]
    TextStatic(ElementId),

    #[error("group {0} already has an else branch")]
    ElseExists(GroupId),

    #[error("else branches carry no condition")]
    ElseCondition,

    #[error("condition expression must not be empty")]
    EmptyCondition,

    #[error("element {0} does not belong to a conditional group")]
    NotConditional(ElementId),

    #[error("element {0} has no loop descriptor")]
    NoLoop(ElementId),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("element {0} has no parent")]
    NoParent(ElementId),

    /// A parentless `create` while a root is already installed would leave
    /// two elements with no parent, violating I1.
    #[error("a root element already exists; specify a parent")]
    RootExists,

    #[error("moving {child} under {parent} would create a cycle")]
    Cycle { parent: ElementId, child: ElementId },

    #[error("{0} bindings require a key")]
    MissingKey(&'static str),

    #[error("{0} bindings carry no key")]
    UnexpectedKey(&'static str),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
