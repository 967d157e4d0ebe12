//! Read-side of the store. Every returned record is a fresh deep clone;
//! callers may mutate them freely without touching store state.

use crate::ids::ElementId;
use crate::ir::{Binding, Element, EventEntry, LoopSpec, Variable};

use super::Store;

impl Store {
    pub fn get(&self, id: &ElementId) -> Option<Element> {
        self.doc.element(id).cloned()
    }

    pub fn children(&self, id: &ElementId) -> Vec<ElementId> {
        self.doc
            .element(id)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: &ElementId) -> Option<ElementId> {
        self.doc.element(id).and_then(|e| e.parent.clone())
    }

    pub fn root(&self) -> Option<ElementId> {
        self.doc.elements.root.clone()
    }

    /// All variables, partition order then name order.
    pub fn vars(&self) -> Vec<Variable> {
        self.doc.variables.all().cloned().collect()
    }

    pub fn get_var(&self, name: &str) -> Option<Variable> {
        self.doc.variables.get(name).cloned()
    }

    /// Events targeting an element, as `(event_type, entry)` pairs.
    pub fn events_for(&self, id: &ElementId) -> Vec<(String, EventEntry)> {
        let mut out = Vec::new();
        for (event_type, entries) in &self.doc.events {
            for entry in entries {
                if entry.target == *id {
                    out.push((event_type.clone(), entry.clone()));
                }
            }
        }
        out
    }

    /// Bindings projecting onto an element.
    pub fn bindings_for(&self, id: &ElementId) -> Vec<Binding> {
        self.doc
            .bindings
            .iter()
            .filter(|b| b.element_id == *id)
            .cloned()
            .collect()
    }

    pub fn get_loop(&self, id: &ElementId) -> Option<LoopSpec> {
        self.doc.element(id).and_then(|e| e.loop_.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ElementSpec, Store, VarSpec};
    use crate::ir::Action;
    use serde_json::json;

    #[test]
    fn test_query_returns_are_detached_clones() {
        let mut store = Store::new();
        let root = store
            .tx("init", |s| s.create(ElementSpec::new("layout", "div")))
            .unwrap();

        let mut fetched = store.get(&root).unwrap();
        fetched.tag = "mutated".to_string();
        assert_eq!(store.get(&root).unwrap().tag, "div");
    }

    #[test]
    fn test_events_and_bindings_for() {
        let mut store = Store::new();
        let (root, button) = store
            .tx("init", |s| {
                s.define_var(VarSpec::reactive("n", json!(0)))?;
                let root = s.create(ElementSpec::new("layout", "div"))?;
                let button = s.create(ElementSpec::new("button", "button").with_parent(&root))?;
                s.bind_text(&button, "n")?;
                s.on(
                    &button,
                    "click",
                    Action::Update {
                        target: "n".to_string(),
                        op: "+=".to_string(),
                        value: json!(1),
                    },
                )?;
                Ok((root, button))
            })
            .unwrap();

        assert!(store.events_for(&root).is_empty());
        assert_eq!(store.events_for(&button).len(), 1);
        assert_eq!(store.bindings_for(&button).len(), 1);
        assert_eq!(store.vars().len(), 1);
    }
}
