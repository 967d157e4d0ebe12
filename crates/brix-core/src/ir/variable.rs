//! Program state: static, reactive, and fetched variables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::ids::VarId;

/// Reactivity class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    /// Inert value, spelled `name` in generated code.
    Static,
    /// Change-tracked value behind an accessor, spelled `name.value`.
    Reactive,
    /// Remote value exposing `value`/`loading`/`error` read-only.
    Fetch,
}

/// A named piece of program state.
///
/// Names are unique across all three kinds; references elsewhere in the IR
/// (bindings, actions, loop sources, condition expressions) go by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VarKind,
    /// Initial value, serialized into the output as a JS literal.
    #[serde(default)]
    pub init: Value,
    /// Fetch URL or data source. Only meaningful for `Fetch`.
    #[serde(default)]
    pub source: Option<String>,
    /// Fetch trigger descriptor. Only meaningful for `Fetch`.
    #[serde(default)]
    pub lifecycle: Option<String>,
}

/// Variable tables partitioned by kind, each keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    #[serde(rename = "static", default)]
    pub statics: BTreeMap<String, Variable>,
    #[serde(rename = "reactive", default)]
    pub reactives: BTreeMap<String, Variable>,
    #[serde(rename = "fetch", default)]
    pub fetches: BTreeMap<String, Variable>,
}

impl Variables {
    fn table_mut(&mut self, kind: VarKind) -> &mut BTreeMap<String, Variable> {
        match kind {
            VarKind::Static => &mut self.statics,
            VarKind::Reactive => &mut self.reactives,
            VarKind::Fetch => &mut self.fetches,
        }
    }

    /// Look a variable up by name across all partitions.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.statics
            .get(name)
            .or_else(|| self.reactives.get(name))
            .or_else(|| self.fetches.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        if self.statics.contains_key(name) {
            self.statics.get_mut(name)
        } else if self.reactives.contains_key(name) {
            self.reactives.get_mut(name)
        } else {
            self.fetches.get_mut(name)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn insert(&mut self, var: Variable) {
        self.table_mut(var.kind).insert(var.name.clone(), var);
    }

    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.statics
            .remove(name)
            .or_else(|| self.reactives.remove(name))
            .or_else(|| self.fetches.remove(name))
    }

    /// All variables in partition order (static, reactive, fetch), name order
    /// within a partition. This order is what the compiler emits.
    pub fn all(&self) -> impl Iterator<Item = &Variable> {
        self.statics
            .values()
            .chain(self.reactives.values())
            .chain(self.fetches.values())
    }

    pub fn len(&self) -> usize {
        self.statics.len() + self.reactives.len() + self.fetches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
