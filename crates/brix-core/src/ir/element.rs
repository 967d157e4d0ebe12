//! Element nodes of the UI tree.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ids::{ElementId, GroupId};

/// A node in the UI tree. Becomes one DOM node in generated output (or one
/// DOM node per iteration when `loop_` is set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Opaque editor tag ("layout", "text", "button", ...).
    pub kind: String,
    /// Emitted HTML tag.
    pub tag: String,
    #[serde(default)]
    pub parent: Option<ElementId>,
    /// Insertion order is render order.
    #[serde(default)]
    pub children: Vec<ElementId>,
    /// Static text content. Mutually exclusive with `text_binding`.
    #[serde(default)]
    pub text: Option<String>,
    /// Reactive text source. Outside loops this names a variable; inside a
    /// loop subtree it is an alias-qualified expression emitted verbatim.
    #[serde(default)]
    pub text_binding: Option<String>,
    /// CSS properties, kebab-case allowed; the compiler camel-cases.
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Conditional-group membership, if any.
    #[serde(default)]
    pub control: Option<Control>,
    /// Loop descriptor, if any.
    #[serde(rename = "loop", default)]
    pub loop_: Option<LoopSpec>,
}

impl Element {
    pub(crate) fn new(id: ElementId, kind: String, tag: String) -> Self {
        Self {
            id,
            kind,
            tag,
            parent: None,
            children: Vec::new(),
            text: None,
            text_binding: None,
            styles: BTreeMap::new(),
            classes: BTreeSet::new(),
            attrs: BTreeMap::new(),
            control: None,
            loop_: None,
        }
    }
}

/// Role of an element inside a conditional group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    If,
    #[serde(alias = "elsif")]
    Elif,
    Else,
}

/// Conditional-group membership stamped on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    #[serde(rename = "type")]
    pub kind: ControlKind,
    /// Branch condition, embedded verbatim in output. `None` for else.
    #[serde(default)]
    pub expr: Option<String>,
    pub group: GroupId,
}

/// Loop descriptor: repeat the element once per item of an array-valued
/// variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopSpec {
    /// Name of the array-valued variable.
    pub source: String,
    /// Per-item identifier visible to the loop body.
    pub alias: String,
    /// Optional index identifier.
    #[serde(default)]
    pub index: Option<String>,
    /// Optional key expression (unused by the generator, kept in the IR).
    #[serde(default)]
    pub key: Option<String>,
}

/// An ordered `if`/`elif*`/`else?` chain of sibling elements rendered
/// mutually exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "if")]
    pub if_: ElementId,
    #[serde(rename = "elif", default)]
    pub elifs: Vec<ElementId>,
    #[serde(rename = "else", default)]
    pub else_: Option<ElementId>,
}

impl Group {
    /// All member ids in branch order: if, elifs, else.
    pub fn members(&self) -> Vec<ElementId> {
        let mut out = vec![self.if_.clone()];
        out.extend(self.elifs.iter().cloned());
        out.extend(self.else_.iter().cloned());
        out
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.if_ == *id || self.elifs.contains(id) || self.else_.as_ref() == Some(id)
    }
}
