//! The IR document root and its frozen snapshot form.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;

use crate::ids::{now_millis, ElementId, GroupId};

use super::binding::Binding;
use super::element::{Element, Group};
use super::event::EventEntry;
use super::variable::Variables;

/// Document metadata. `version` starts at "2.0.0"; `modified` is stamped on
/// every outermost commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub version: String,
    pub created: u64,
    pub modified: u64,
}

/// The element tree: a nullable root plus flat id-keyed nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    #[serde(rename = "rootId", default)]
    pub root: Option<ElementId>,
    #[serde(default)]
    pub nodes: BTreeMap<ElementId, Element>,
}

/// Per-category dirty markers. The store only ever sets these; clearing via
/// [`crate::store::Store::reset_dirty`] is the consumers' (renderers')
/// responsibility and is orthogonal to correctness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirtyFlags {
    #[serde(default)]
    pub elements: BTreeSet<String>,
    #[serde(default)]
    pub variables: BTreeSet<String>,
    #[serde(default)]
    pub events: BTreeSet<String>,
    #[serde(default)]
    pub bindings: BTreeSet<String>,
    #[serde(default)]
    pub conditionals: BTreeSet<String>,
    #[serde(default)]
    pub loops: BTreeSet<String>,
    /// Set whenever tree topology changes.
    #[serde(default)]
    pub structure: bool,
}

/// The authoritative in-memory model of the UI program.
///
/// Five cross-referenced collections over flat maps; every cross-reference is
/// an id or a name, so `Clone` is the deep clone used for snapshots, history
/// entries, and query returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrDocument {
    pub meta: Meta,
    #[serde(default)]
    pub variables: Variables,
    #[serde(default)]
    pub elements: Elements,
    /// Events partitioned by event type ("click", "input", ...).
    #[serde(default)]
    pub events: BTreeMap<String, Vec<EventEntry>>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub conditional_groups: BTreeMap<GroupId, Group>,
    #[serde(default)]
    pub dirty_flags: DirtyFlags,
}

impl IrDocument {
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            meta: Meta {
                version: "2.0.0".to_string(),
                created: now,
                modified: now,
            },
            variables: Variables::default(),
            elements: Elements::default(),
            events: BTreeMap::new(),
            bindings: Vec::new(),
            conditional_groups: BTreeMap::new(),
            dirty_flags: DirtyFlags::default(),
        }
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.nodes.get(id)
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.nodes.get_mut(id)
    }

    /// The group an element belongs to, by membership rather than by its
    /// `control` stamp (the stamp can dangle after group dissolution).
    pub fn group_of(&self, id: &ElementId) -> Option<(&GroupId, &Group)> {
        self.conditional_groups.iter().find(|(_, g)| g.contains(id))
    }

    /// Whether `id` or any ancestor carries a loop descriptor, meaning the
    /// element renders inside a loop body.
    pub fn in_loop_subtree(&self, id: &ElementId) -> bool {
        let mut cursor = Some(id.clone());
        while let Some(current) = cursor {
            match self.element(&current) {
                Some(el) => {
                    if el.loop_.is_some() {
                        return true;
                    }
                    cursor = el.parent.clone();
                }
                None => return false,
            }
        }
        false
    }
}

impl Default for IrDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen snapshot of the document.
///
/// Owns its own deep clone and hands out shared references only, so the
/// compiler (or any other consumer) cannot mutate store state through it.
#[derive(Debug, Clone)]
pub struct IrSnapshot(pub(crate) IrDocument);

impl IrSnapshot {
    /// Serialize to the persisted snapshot format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }

    /// Decode a persisted snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(IrSnapshot)
    }
}

impl Deref for IrSnapshot {
    type Target = IrDocument;

    fn deref(&self) -> &IrDocument {
        &self.0
    }
}

impl From<IrDocument> for IrSnapshot {
    fn from(doc: IrDocument) -> Self {
        IrSnapshot(doc)
    }
}
