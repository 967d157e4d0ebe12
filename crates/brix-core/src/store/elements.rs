//! Element tree operations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::StoreError;
use crate::ids::{BindingId, ElementId};
use crate::ir::{Binding, BindingKind, Element};

use super::Store;

/// Creation spec for [`Store::create`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    pub kind: String,
    pub tag: String,
    pub parent: Option<ElementId>,
    pub text: Option<String>,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl ElementSpec {
    pub fn new(kind: &str, tag: &str) -> Self {
        Self {
            kind: kind.to_string(),
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: &ElementId) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }
}

impl Store {
    /// Allocate a new element. With a `parent`, the element is appended to
    /// it; without one it becomes the root, which requires that no root
    /// exists yet (I1 allows exactly one parentless element).
    pub fn create(&mut self, spec: ElementSpec) -> Result<ElementId, StoreError> {
        self.ensure_tx()?;
        if let Some(parent) = &spec.parent {
            if !self.doc.elements.nodes.contains_key(parent) {
                return Err(StoreError::UnknownElement(parent.clone()));
            }
        } else if self.doc.elements.root.is_some() {
            return Err(StoreError::RootExists);
        }

        let id = self.ids.element();
        let mut element = Element::new(id.clone(), spec.kind, spec.tag);
        element.parent = spec.parent.clone();
        element.text = spec.text;
        element.styles = spec.styles;
        element.classes = spec.classes;
        element.attrs = spec.attrs;
        self.doc.elements.nodes.insert(id.clone(), element);

        match &spec.parent {
            Some(parent) => {
                if let Some(p) = self.doc.element_mut(parent) {
                    p.children.push(id.clone());
                }
            }
            None => self.doc.elements.root = Some(id.clone()),
        }

        self.mark_element(&id);
        self.mark_structure();
        Ok(id)
    }

    /// Detach `child` from its current parent (if any) and push it onto
    /// `parent.children`.
    pub fn append(&mut self, parent: &ElementId, child: &ElementId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if !self.doc.elements.nodes.contains_key(parent) {
            return Err(StoreError::UnknownElement(parent.clone()));
        }
        if !self.doc.elements.nodes.contains_key(child) {
            return Err(StoreError::UnknownElement(child.clone()));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(StoreError::Cycle {
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        self.detach(child);
        if let Some(p) = self.doc.element_mut(parent) {
            p.children.push(child.clone());
        }
        if let Some(c) = self.doc.element_mut(child) {
            c.parent = Some(parent.clone());
        }

        self.mark_element(child);
        self.mark_element(parent);
        self.mark_structure();
        Ok(())
    }

    /// As [`Store::append`] but at a specific position.
    pub fn insert(
        &mut self,
        parent: &ElementId,
        child: &ElementId,
        index: usize,
    ) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if !self.doc.elements.nodes.contains_key(child) {
            return Err(StoreError::UnknownElement(child.clone()));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(StoreError::Cycle {
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        self.detach(child);
        let parent_el = self
            .doc
            .element_mut(parent)
            .ok_or_else(|| StoreError::UnknownElement(parent.clone()))?;
        let len = parent_el.children.len();
        if index > len {
            return Err(StoreError::IndexOutOfBounds { index, len });
        }
        parent_el.children.insert(index, child.clone());
        if let Some(c) = self.doc.element_mut(child) {
            c.parent = Some(parent.clone());
        }

        self.mark_element(child);
        self.mark_element(parent);
        self.mark_structure();
        Ok(())
    }

    /// Delete an element and cascade: descendants first, then the events
    /// targeting it, the bindings referring to it, and its conditional-group
    /// membership (deleting a group's `if` dissolves the whole group).
    pub fn delete(&mut self, id: &ElementId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if !self.doc.elements.nodes.contains_key(id) {
            return Err(StoreError::UnknownElement(id.clone()));
        }

        let children = self
            .doc
            .element(id)
            .map(|e| e.children.clone())
            .unwrap_or_default();
        for child in children {
            self.delete(&child)?;
        }

        self.detach(id);

        for entries in self.doc.events.values_mut() {
            entries.retain(|e| e.target != *id);
        }
        self.doc.events.retain(|_, entries| !entries.is_empty());
        self.doc.bindings.retain(|b| b.element_id != *id);

        if let Some((gid, group)) = self.doc.group_of(id) {
            let gid = gid.clone();
            if group.if_ == *id {
                // Dissolving the group leaves surviving members' `control`
                // stamps dangling; the validator reports them.
                self.doc.conditional_groups.remove(&gid);
            } else if let Some(group) = self.doc.conditional_groups.get_mut(&gid) {
                group.elifs.retain(|e| e != id);
                if group.else_.as_ref() == Some(id) {
                    group.else_ = None;
                }
            }
            self.mark_conditional(&gid);
        }

        if self.doc.elements.root.as_ref() == Some(id) {
            self.doc.elements.root = None;
        }
        self.doc.elements.nodes.remove(id);

        self.mark_element(id);
        self.mark_structure();
        Ok(())
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Set or clear static text. Rejected while a text binding is present
    /// (I3).
    pub fn set_text(&mut self, id: &ElementId, text: Option<&str>) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        if element.text_binding.is_some() {
            return Err(StoreError::TextBound(id.clone()));
        }
        element.text = text.map(str::to_string);
        self.mark_element(id);
        Ok(())
    }

    /// Bind the element's text to a variable. Rejected while static text is
    /// present (I3). Inside a loop subtree the source is an alias-qualified
    /// expression taken verbatim and no binding record is kept; otherwise it
    /// must name an existing variable and a `Text` binding is recorded.
    pub fn bind_text(&mut self, id: &ElementId, source: &str) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        if element.text.is_some() {
            return Err(StoreError::TextStatic(id.clone()));
        }

        let in_loop = self.doc.in_loop_subtree(id);
        if !in_loop && !self.doc.variables.contains(source) {
            return Err(StoreError::UnknownVariable(source.to_string()));
        }

        // Re-binding replaces the previous text binding.
        self.doc
            .bindings
            .retain(|b| !(b.element_id == *id && b.kind == BindingKind::Text));
        if let Some(element) = self.doc.element_mut(id) {
            element.text_binding = Some(source.to_string());
        }

        if !in_loop {
            let binding_id = self.ids.binding();
            self.doc.bindings.push(Binding {
                id: binding_id.clone(),
                element_id: id.clone(),
                variable: source.to_string(),
                kind: BindingKind::Text,
                key: None,
            });
            self.mark_binding(&binding_id);
        }
        self.mark_element(id);
        Ok(())
    }

    /// Remove a text binding, if any.
    pub fn unbind_text(&mut self, id: &ElementId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        element.text_binding = None;
        self.doc
            .bindings
            .retain(|b| !(b.element_id == *id && b.kind == BindingKind::Text));
        self.mark_element(id);
        Ok(())
    }

    // ========================================================================
    // Styles, classes, attributes
    // ========================================================================

    /// Set a style property; `None` removes it.
    pub fn style(
        &mut self,
        id: &ElementId,
        prop: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        match value {
            Some(v) => {
                element.styles.insert(prop.to_string(), v.to_string());
            }
            None => {
                element.styles.remove(prop);
            }
        }
        self.mark_element(id);
        Ok(())
    }

    /// Set an attribute; `None` removes it.
    pub fn attr(
        &mut self,
        id: &ElementId,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        match value {
            Some(v) => {
                element.attrs.insert(name.to_string(), v.to_string());
            }
            None => {
                element.attrs.remove(name);
            }
        }
        self.mark_element(id);
        Ok(())
    }

    pub fn add_class(&mut self, id: &ElementId, class: &str) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        element.classes.insert(class.to_string());
        self.mark_element(id);
        Ok(())
    }

    pub fn remove_class(&mut self, id: &ElementId, class: &str) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        element.classes.remove(class);
        self.mark_element(id);
        Ok(())
    }

    // ========================================================================
    // Attribute / style bindings
    // ========================================================================

    /// Record an `Attr` binding projecting `variable` onto attribute `key`.
    pub fn bind_attr(
        &mut self,
        id: &ElementId,
        variable: &str,
        key: &str,
    ) -> Result<BindingId, StoreError> {
        self.push_binding(id, variable, BindingKind::Attr, Some(key))
    }

    /// Record a `Style` binding projecting `variable` onto style `key`.
    pub fn bind_style(
        &mut self,
        id: &ElementId,
        variable: &str,
        key: &str,
    ) -> Result<BindingId, StoreError> {
        self.push_binding(id, variable, BindingKind::Style, Some(key))
    }

    /// Remove a binding record. Removing a `Text` binding also clears the
    /// element's `text_binding` field.
    pub fn unbind(&mut self, binding_id: &BindingId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let pos = self
            .doc
            .bindings
            .iter()
            .position(|b| b.id == *binding_id)
            .ok_or_else(|| StoreError::UnknownBinding(binding_id.clone()))?;
        let binding = self.doc.bindings.remove(pos);
        if binding.kind == BindingKind::Text {
            if let Some(element) = self.doc.element_mut(&binding.element_id) {
                element.text_binding = None;
            }
        }
        self.mark_binding(binding_id);
        Ok(())
    }

    fn push_binding(
        &mut self,
        id: &ElementId,
        variable: &str,
        kind: BindingKind,
        key: Option<&str>,
    ) -> Result<BindingId, StoreError> {
        self.ensure_tx()?;
        if !self.doc.elements.nodes.contains_key(id) {
            return Err(StoreError::UnknownElement(id.clone()));
        }
        if !self.doc.variables.contains(variable) {
            return Err(StoreError::UnknownVariable(variable.to_string()));
        }
        let binding_id = self.ids.binding();
        self.doc.bindings.push(Binding {
            id: binding_id.clone(),
            element_id: id.clone(),
            variable: variable.to_string(),
            kind,
            key: key.map(str::to_string),
        });
        self.mark_binding(&binding_id);
        Ok(binding_id)
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Whether `ancestor` appears on `of`'s parent chain.
    fn is_ancestor(&self, ancestor: &ElementId, of: &ElementId) -> bool {
        let mut cursor = self.doc.element(of).and_then(|e| e.parent.clone());
        while let Some(current) = cursor {
            if current == *ancestor {
                return true;
            }
            cursor = self.doc.element(&current).and_then(|e| e.parent.clone());
        }
        false
    }

    /// Remove `id` from its parent's child list and clear its parent link.
    pub(crate) fn detach(&mut self, id: &ElementId) {
        let parent = self.doc.element(id).and_then(|e| e.parent.clone());
        if let Some(parent) = parent {
            if let Some(p) = self.doc.element_mut(&parent) {
                p.children.retain(|c| c != id);
            }
        }
        if let Some(element) = self.doc.element_mut(id) {
            element.parent = None;
        }
    }
}
