//! Bindings: declarative links from a variable onto an element.

use serde::{Deserialize, Serialize};

use crate::ids::{BindingId, ElementId};

/// What part of the element a binding projects onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Text,
    Attr,
    Style,
}

/// A declarative link that projects a variable's value onto an element's
/// text, attribute, or style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub id: BindingId,
    pub element_id: ElementId,
    /// Variable name (see I4: must name an existing variable).
    pub variable: String,
    pub kind: BindingKind,
    /// Attribute name or style property. Required for `Attr`/`Style`,
    /// `None` for `Text`.
    #[serde(default)]
    pub key: Option<String>,
}
