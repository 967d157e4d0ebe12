//! Event registration.

use crate::error::StoreError;
use crate::ids::{ElementId, EventId};
use crate::ir::{Action, EventEntry};

use super::Store;

impl Store {
    /// Register an action to fire when `event_type` occurs on `target`.
    /// `Update`/`Set` actions must name an existing variable.
    pub fn on(
        &mut self,
        target: &ElementId,
        event_type: &str,
        action: Action,
    ) -> Result<EventId, StoreError> {
        self.ensure_tx()?;
        if !self.doc.elements.nodes.contains_key(target) {
            return Err(StoreError::UnknownElement(target.clone()));
        }
        if let Some(var) = action.target_variable() {
            if !self.doc.variables.contains(var) {
                return Err(StoreError::UnknownVariable(var.to_string()));
            }
        }
        let id = self.ids.event();
        self.doc
            .events
            .entry(event_type.to_string())
            .or_default()
            .push(EventEntry {
                id: id.clone(),
                target: target.clone(),
                action,
            });
        self.mark_event(&id);
        Ok(id)
    }

    /// Remove an event registration by id.
    pub fn remove_event(&mut self, id: &EventId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let mut found = false;
        for entries in self.doc.events.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.id != *id);
            if entries.len() != before {
                found = true;
            }
        }
        if !found {
            return Err(StoreError::UnknownEvent(id.clone()));
        }
        self.doc.events.retain(|_, entries| !entries.is_empty());
        self.mark_event(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ElementSpec, Store, VarSpec};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_on_registers_under_event_type() {
        let mut store = Store::new();
        store
            .tx("setup", |s| {
                s.define_var(VarSpec::reactive("count", json!(0)))?;
                let root = s.create(ElementSpec::new("button", "button"))?;
                s.on(
                    &root,
                    "click",
                    Action::Update {
                        target: "count".to_string(),
                        op: "+=".to_string(),
                        value: json!(1),
                    },
                )
            })
            .unwrap();
        assert_eq!(store.doc().events.get("click").map(Vec::len), Some(1));
    }

    #[test]
    fn test_on_unknown_action_target_rejected() {
        let mut store = Store::new();
        let err = store
            .tx("setup", |s| {
                let root = s.create(ElementSpec::new("button", "button"))?;
                s.on(
                    &root,
                    "click",
                    Action::Set {
                        target: "missing".to_string(),
                        value: json!(1),
                    },
                )
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownVariable(_)));
    }

    #[test]
    fn test_remove_event() {
        let mut store = Store::new();
        let id = store
            .tx("setup", |s| {
                let root = s.create(ElementSpec::new("button", "button"))?;
                s.on(
                    &root,
                    "click",
                    Action::Call {
                        function: "ping".to_string(),
                    },
                )
            })
            .unwrap();
        store.tx("off", |s| s.remove_event(&id)).unwrap();
        assert!(store.doc().events.is_empty());
        let err = store.tx("off2", |s| s.remove_event(&id)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownEvent(_)));
    }
}
