//! Loop descriptor operations.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::ElementId;
use crate::ir::LoopSpec;

use super::validate::is_identifier;
use super::Store;

/// Field merge for [`Store::update_loop`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopPatch {
    pub source: Option<String>,
    pub alias: Option<String>,
    pub index: Option<String>,
    pub key: Option<String>,
}

impl Store {
    /// Attach a loop descriptor. The source must name an existing variable
    /// and alias/index must be valid identifiers (I7).
    pub fn set_loop(&mut self, id: &ElementId, spec: LoopSpec) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if !self.doc.elements.nodes.contains_key(id) {
            return Err(StoreError::UnknownElement(id.clone()));
        }
        self.check_loop_spec(&spec)?;
        if let Some(element) = self.doc.element_mut(id) {
            element.loop_ = Some(spec);
        }
        self.mark_loop(id);
        self.mark_element(id);
        Ok(())
    }

    /// Merge fields into an existing descriptor, validating the result.
    pub fn update_loop(&mut self, id: &ElementId, patch: LoopPatch) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let current = self
            .doc
            .element(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?
            .loop_
            .clone()
            .ok_or_else(|| StoreError::NoLoop(id.clone()))?;

        let merged = LoopSpec {
            source: patch.source.unwrap_or(current.source),
            alias: patch.alias.unwrap_or(current.alias),
            index: patch.index.or(current.index),
            key: patch.key.or(current.key),
        };
        self.check_loop_spec(&merged)?;
        if let Some(element) = self.doc.element_mut(id) {
            element.loop_ = Some(merged);
        }
        self.mark_loop(id);
        self.mark_element(id);
        Ok(())
    }

    /// Clear the loop descriptor.
    pub fn remove_loop(&mut self, id: &ElementId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        if element.loop_.take().is_none() {
            return Err(StoreError::NoLoop(id.clone()));
        }
        self.mark_loop(id);
        self.mark_element(id);
        Ok(())
    }

    fn check_loop_spec(&self, spec: &LoopSpec) -> Result<(), StoreError> {
        if !self.doc.variables.contains(&spec.source) {
            return Err(StoreError::UnknownVariable(spec.source.clone()));
        }
        if !is_identifier(&spec.alias) {
            return Err(StoreError::InvalidIdentifier(spec.alias.clone()));
        }
        if let Some(index) = &spec.index {
            if !is_identifier(index) {
                return Err(StoreError::InvalidIdentifier(index.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ElementSpec, Store, VarSpec};
    use super::*;
    use serde_json::json;

    fn setup() -> (Store, ElementId) {
        let mut store = Store::new();
        let li = store
            .tx("init", |s| {
                s.define_var(VarSpec::reactive("items", json!(["x", "y"])))?;
                s.create(ElementSpec::new("text", "li"))
            })
            .unwrap();
        (store, li)
    }

    fn basic_loop() -> LoopSpec {
        LoopSpec {
            source: "items".to_string(),
            alias: "it".to_string(),
            index: None,
            key: None,
        }
    }

    #[test]
    fn test_set_loop() {
        let (mut store, li) = setup();
        store.tx("loop", |s| s.set_loop(&li, basic_loop())).unwrap();
        assert_eq!(store.get_loop(&li).unwrap().alias, "it");
    }

    #[test]
    fn test_set_loop_unknown_source() {
        let (mut store, li) = setup();
        let err = store
            .tx("loop", |s| {
                s.set_loop(
                    &li,
                    LoopSpec {
                        source: "missing".to_string(),
                        ..basic_loop()
                    },
                )
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownVariable(_)));
    }

    #[test]
    fn test_set_loop_bad_alias() {
        let (mut store, li) = setup();
        let err = store
            .tx("loop", |s| {
                s.set_loop(
                    &li,
                    LoopSpec {
                        alias: "2bad".to_string(),
                        ..basic_loop()
                    },
                )
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_update_loop_merges() {
        let (mut store, li) = setup();
        store.tx("loop", |s| s.set_loop(&li, basic_loop())).unwrap();
        store
            .tx("patch", |s| {
                s.update_loop(
                    &li,
                    LoopPatch {
                        index: Some("i".to_string()),
                        ..LoopPatch::default()
                    },
                )
            })
            .unwrap();
        let spec = store.get_loop(&li).unwrap();
        assert_eq!(spec.alias, "it");
        assert_eq!(spec.index.as_deref(), Some("i"));
    }

    #[test]
    fn test_remove_loop() {
        let (mut store, li) = setup();
        store.tx("loop", |s| s.set_loop(&li, basic_loop())).unwrap();
        store.tx("rm", |s| s.remove_loop(&li)).unwrap();
        assert!(store.get_loop(&li).is_none());
        let err = store.tx("rm2", |s| s.remove_loop(&li)).unwrap_err();
        assert!(matches!(err, StoreError::NoLoop(_)));
    }
}
