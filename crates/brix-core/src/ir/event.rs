//! Event registrations and their actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{ElementId, EventId};

/// What an event does when it fires.
///
/// The recognised tags are `Update`, `Set`, and `Call`; anything else decodes
/// to `Unknown`, which the compiler emits as a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    /// Compound assignment on a variable: `target op= value`.
    /// String values are embedded verbatim; other values as JS literals.
    Update {
        target: String,
        op: String,
        value: Value,
    },
    /// Plain assignment on a variable.
    Set { target: String, value: Value },
    /// Invoke a named function, verbatim.
    Call { function: String },
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The variable this action writes, if any.
    pub fn target_variable(&self) -> Option<&str> {
        match self {
            Action::Update { target, .. } | Action::Set { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// One registration of an action on an element for a given event type.
/// The event type itself is the key of the per-type partition in the
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: EventId,
    pub target: ElementId,
    pub action: Action,
}
