//! Variable operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::ir::{BindingKind, VarKind, Variable};

use super::validate::is_identifier;
use super::Store;

/// Creation spec for [`Store::define_var`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VarKind,
    pub init: Value,
    pub source: Option<String>,
    pub lifecycle: Option<String>,
}

impl VarSpec {
    pub fn new(name: &str, kind: VarKind, init: Value) -> Self {
        Self {
            name: name.to_string(),
            kind,
            init,
            source: None,
            lifecycle: None,
        }
    }

    pub fn static_(name: &str, init: Value) -> Self {
        Self::new(name, VarKind::Static, init)
    }

    pub fn reactive(name: &str, init: Value) -> Self {
        Self::new(name, VarKind::Reactive, init)
    }

    pub fn fetch(name: &str, source: &str) -> Self {
        let mut spec = Self::new(name, VarKind::Fetch, Value::Null);
        spec.source = Some(source.to_string());
        spec
    }
}

impl Store {
    /// Define a variable. Names must be valid identifiers and unique across
    /// all three partitions (I2).
    pub fn define_var(&mut self, spec: VarSpec) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if !is_identifier(&spec.name) {
            return Err(StoreError::InvalidIdentifier(spec.name));
        }
        if self.doc.variables.contains(&spec.name) {
            return Err(StoreError::DuplicateVariable(spec.name));
        }
        let id = self.ids.variable();
        let name = spec.name.clone();
        self.doc.variables.insert(Variable {
            id,
            name: spec.name,
            kind: spec.kind,
            init: spec.init,
            source: spec.source,
            lifecycle: spec.lifecycle,
        });
        self.mark_variable(&name);
        Ok(())
    }

    /// Replace a variable's value. `Static` variables are design-time
    /// constants and cannot be updated.
    pub fn update_var(&mut self, name: &str, value: Value) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let var = self
            .doc
            .variables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        if var.kind == VarKind::Static {
            return Err(StoreError::StaticVariable(name.to_string()));
        }
        var.init = value;
        self.mark_variable(name);
        Ok(())
    }

    /// Remove a variable, cascading away every binding that projects it.
    /// Elements whose text was bound to it have their `text_binding`
    /// cleared.
    pub fn delete_var(&mut self, name: &str) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if self.doc.variables.remove(name).is_none() {
            return Err(StoreError::UnknownVariable(name.to_string()));
        }

        let dropped: Vec<_> = self
            .doc
            .bindings
            .iter()
            .filter(|b| b.variable == name)
            .map(|b| (b.id.clone(), b.element_id.clone(), b.kind))
            .collect();
        self.doc.bindings.retain(|b| b.variable != name);
        for (binding_id, element_id, kind) in dropped {
            if kind == BindingKind::Text {
                if let Some(element) = self.doc.element_mut(&element_id) {
                    element.text_binding = None;
                }
            }
            self.mark_binding(&binding_id);
        }

        self.mark_variable(name);
        Ok(())
    }
}
