//! Macro operations composed of primitives. Each runs inside its own
//! scoped transaction, so callers get all-or-nothing behavior without
//! opening one themselves (nesting inside a caller's transaction is fine).

use crate::error::StoreError;
use crate::ids::ElementId;
use crate::ir::{Binding, Element, EventEntry};

use super::Store;

impl Store {
    /// Deep-copy a subtree and insert the copy right after the original in
    /// its parent's child order. Styles, classes, attrs, text, text
    /// bindings, loop descriptors, bindings, and events are all duplicated.
    /// `control` is not carried over: a copy inside the same group would
    /// break the group shape (I6), so copies come out unwired.
    pub fn duplicate(&mut self, id: &ElementId) -> Result<ElementId, StoreError> {
        let id = id.clone();
        self.tx("duplicate", |s| {
            let original = s
                .doc
                .element(&id)
                .cloned()
                .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
            let parent = original
                .parent
                .clone()
                .ok_or_else(|| StoreError::NoParent(id.clone()))?;

            let copy = s.copy_subtree(&id, &parent)?;

            // copy_subtree appended at the end; splice it in after the
            // original instead.
            if let Some(p) = s.doc.element_mut(&parent) {
                p.children.retain(|c| c != &copy);
            }
            let pos = s
                .doc
                .element(&parent)
                .and_then(|p| p.children.iter().position(|c| c == &id))
                .map(|i| i + 1)
                .unwrap_or(0);
            if let Some(p) = s.doc.element_mut(&parent) {
                p.children.insert(pos, copy.clone());
            }
            Ok(copy)
        })
    }

    /// Create a `layout`/`div` container at the element's position and move
    /// the element into it. Wrapping the root makes the container the new
    /// root.
    pub fn wrap(&mut self, id: &ElementId) -> Result<ElementId, StoreError> {
        let id = id.clone();
        self.tx("wrap", |s| {
            let original = s
                .doc
                .element(&id)
                .cloned()
                .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;

            let container_id = s.ids.element();
            let mut container =
                Element::new(container_id.clone(), "layout".to_string(), "div".to_string());

            match original.parent {
                Some(parent) => {
                    let index = s
                        .doc
                        .element(&parent)
                        .and_then(|p| p.children.iter().position(|c| c == &id))
                        .unwrap_or(0);
                    container.parent = Some(parent.clone());
                    s.doc.elements.nodes.insert(container_id.clone(), container);
                    if let Some(p) = s.doc.element_mut(&parent) {
                        p.children.retain(|c| c != &id);
                        p.children.insert(index, container_id.clone());
                    }
                }
                None => {
                    s.doc.elements.nodes.insert(container_id.clone(), container);
                    s.doc.elements.root = Some(container_id.clone());
                }
            }

            if let Some(c) = s.doc.element_mut(&container_id) {
                c.children.push(id.clone());
            }
            if let Some(e) = s.doc.element_mut(&id) {
                e.parent = Some(container_id.clone());
            }

            s.mark_element(&container_id);
            s.mark_element(&id);
            s.mark_structure();
            Ok(container_id)
        })
    }

    /// Change the editor kind only; tag and everything else stay put.
    pub fn convert(&mut self, id: &ElementId, new_kind: &str) -> Result<(), StoreError> {
        let id = id.clone();
        let new_kind = new_kind.to_string();
        self.tx("convert", |s| {
            let element = s
                .doc
                .element_mut(&id)
                .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
            element.kind = new_kind;
            s.mark_element(&id);
            Ok(())
        })
    }

    fn copy_subtree(
        &mut self,
        src: &ElementId,
        parent: &ElementId,
    ) -> Result<ElementId, StoreError> {
        let source = self
            .doc
            .element(src)
            .cloned()
            .ok_or_else(|| StoreError::UnknownElement(src.clone()))?;

        let new_id = self.ids.element();
        let mut copy = source.clone();
        copy.id = new_id.clone();
        copy.parent = Some(parent.clone());
        copy.children = Vec::new();
        copy.control = None;
        self.doc.elements.nodes.insert(new_id.clone(), copy);
        if let Some(p) = self.doc.element_mut(parent) {
            p.children.push(new_id.clone());
        }

        let cloned_bindings: Vec<Binding> = self
            .doc
            .bindings
            .iter()
            .filter(|b| b.element_id == *src)
            .cloned()
            .collect();
        for binding in cloned_bindings {
            let binding_id = self.ids.binding();
            self.doc.bindings.push(Binding {
                id: binding_id.clone(),
                element_id: new_id.clone(),
                ..binding
            });
            self.mark_binding(&binding_id);
        }

        let mut cloned_events = Vec::new();
        for (event_type, entries) in &self.doc.events {
            for entry in entries {
                if entry.target == *src {
                    cloned_events.push((event_type.clone(), entry.action.clone()));
                }
            }
        }
        for (event_type, action) in cloned_events {
            let event_id = self.ids.event();
            self.doc.events.entry(event_type).or_default().push(EventEntry {
                id: event_id.clone(),
                target: new_id.clone(),
                action,
            });
            self.mark_event(&event_id);
        }

        for child in source.children {
            self.copy_subtree(&child, &new_id)?;
        }

        self.mark_element(&new_id);
        self.mark_structure();
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ElementSpec, IfSpec, Store, VarSpec};
    use super::*;
    use crate::ir::Action;
    use serde_json::json;

    fn setup() -> (Store, ElementId) {
        let mut store = Store::new();
        let root = store
            .tx("init", |s| s.create(ElementSpec::new("layout", "div")))
            .unwrap();
        (store, root)
    }

    // ========================================================================
    // DUPLICATE
    // ========================================================================

    #[test]
    fn test_duplicate_inserts_after_original() {
        let (mut store, root) = setup();
        let (a, b) = store
            .tx("children", |s| {
                let a = s.create(ElementSpec::new("text", "p").with_text("a").with_parent(&root))?;
                let b = s.create(ElementSpec::new("text", "p").with_text("b").with_parent(&root))?;
                Ok((a, b))
            })
            .unwrap();

        let copy = store.duplicate(&a).unwrap();
        assert_eq!(store.children(&root), vec![a, copy.clone(), b]);
        assert_eq!(store.get(&copy).unwrap().text.as_deref(), Some("a"));
    }

    #[test]
    fn test_duplicate_copies_subtree_bindings_events() {
        let (mut store, root) = setup();
        let card = store
            .tx("setup", |s| {
                s.define_var(VarSpec::reactive("title", json!("hi")))?;
                let card = s.create(ElementSpec::new("layout", "section").with_parent(&root))?;
                let heading = s.create(ElementSpec::new("text", "h2").with_parent(&card))?;
                s.bind_text(&heading, "title")?;
                s.on(
                    &heading,
                    "click",
                    Action::Set {
                        target: "title".to_string(),
                        value: json!("clicked"),
                    },
                )?;
                Ok(card)
            })
            .unwrap();

        let copy = store.duplicate(&card).unwrap();

        // Subtree copied with its own ids.
        assert_eq!(store.children(&copy).len(), 1);
        // One extra binding and one extra event now exist.
        assert_eq!(store.doc().bindings.len(), 2);
        assert_eq!(store.doc().events.get("click").map(Vec::len), Some(2));
        // Elements: root + card + heading, duplicated card + heading.
        assert_eq!(store.doc().elements.nodes.len(), 5);
    }

    #[test]
    fn test_duplicate_unwires_control() {
        let (mut store, root) = setup();
        let (gid, if_id) = store
            .tx("group", |s| {
                s.define_var(VarSpec::reactive("flag", json!(true)))?;
                s.create_if_group(
                    &root,
                    IfSpec {
                        expr: "flag.value".to_string(),
                        element: ElementSpec::new("text", "p").with_text("yes"),
                    },
                )
            })
            .unwrap();

        let copy = store.duplicate(&if_id).unwrap();
        assert!(store.get(&copy).unwrap().control.is_none());
        // The group still has exactly its original member.
        let group = store.doc().conditional_groups.get(&gid).unwrap();
        assert_eq!(group.if_, if_id);
        assert!(store.validate_conditional_groups().valid);
    }

    #[test]
    fn test_duplicate_root_rejected() {
        let (mut store, root) = setup();
        let err = store.duplicate(&root).unwrap_err();
        assert!(matches!(err, StoreError::NoParent(_)));
    }

    // ========================================================================
    // WRAP / CONVERT
    // ========================================================================

    #[test]
    fn test_wrap_splices_container() {
        let (mut store, root) = setup();
        let (a, b) = store
            .tx("children", |s| {
                let a = s.create(ElementSpec::new("text", "p").with_parent(&root))?;
                let b = s.create(ElementSpec::new("text", "p").with_parent(&root))?;
                Ok((a, b))
            })
            .unwrap();

        let container = store.wrap(&a).unwrap();
        assert_eq!(store.children(&root), vec![container.clone(), b]);
        assert_eq!(store.children(&container), vec![a.clone()]);
        assert_eq!(store.parent(&a), Some(container.clone()));
        let c = store.get(&container).unwrap();
        assert_eq!(c.kind, "layout");
        assert_eq!(c.tag, "div");
    }

    #[test]
    fn test_wrap_root_installs_new_root() {
        let (mut store, root) = setup();
        let container = store.wrap(&root).unwrap();
        assert_eq!(store.doc().elements.root, Some(container.clone()));
        assert_eq!(store.parent(&root), Some(container));
    }

    #[test]
    fn test_convert_changes_kind_only() {
        let (mut store, root) = setup();
        store.convert(&root, "panel").unwrap();
        let el = store.get(&root).unwrap();
        assert_eq!(el.kind, "panel");
        assert_eq!(el.tag, "div");
    }

    #[test]
    fn test_macro_failure_rolls_back() {
        let (mut store, _) = setup();
        let before = store.ir();
        let err = store.duplicate(&ElementId::from("element_99_0")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownElement(_)));
        assert_eq!(*store.ir(), *before);
    }
}
