//! Conditional group operations.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::{ElementId, GroupId};
use crate::ir::{Control, ControlKind, Group};

use super::elements::ElementSpec;
use super::Store;

/// Spec for the `if` branch of a new group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfSpec {
    pub expr: String,
    pub element: ElementSpec,
}

/// Spec for an additional `elif` branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElifSpec {
    pub expr: String,
    pub element: ElementSpec,
}

/// Spec for the `else` branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElseSpec {
    pub element: ElementSpec,
}

impl Store {
    /// Create a new conditional group: the `if` element is created under
    /// `parent`, stamped with its `control`, and registered as a fresh
    /// group. Returns `(group, element)`.
    pub fn create_if_group(
        &mut self,
        parent: &ElementId,
        spec: IfSpec,
    ) -> Result<(GroupId, ElementId), StoreError> {
        self.ensure_tx()?;
        if spec.expr.trim().is_empty() {
            return Err(StoreError::EmptyCondition);
        }
        if !self.doc.elements.nodes.contains_key(parent) {
            return Err(StoreError::UnknownElement(parent.clone()));
        }

        let mut element_spec = spec.element;
        element_spec.parent = Some(parent.clone());
        let element_id = self.create(element_spec)?;

        let group_id = self.ids.group();
        if let Some(element) = self.doc.element_mut(&element_id) {
            element.control = Some(Control {
                kind: ControlKind::If,
                expr: Some(spec.expr),
                group: group_id.clone(),
            });
        }
        self.doc.conditional_groups.insert(
            group_id.clone(),
            Group {
                if_: element_id.clone(),
                elifs: Vec::new(),
                else_: None,
            },
        );

        self.mark_conditional(&group_id);
        Ok((group_id, element_id))
    }

    /// Append an `elif` branch. The group and its `if` element must exist;
    /// the new element is created as a sibling under the `if`'s parent
    /// (I5).
    pub fn add_elif(&mut self, group_id: &GroupId, spec: ElifSpec) -> Result<ElementId, StoreError> {
        self.ensure_tx()?;
        if spec.expr.trim().is_empty() {
            return Err(StoreError::EmptyCondition);
        }
        let parent = self.group_parent(group_id)?;

        let mut element_spec = spec.element;
        element_spec.parent = Some(parent);
        let element_id = self.create(element_spec)?;

        if let Some(element) = self.doc.element_mut(&element_id) {
            element.control = Some(Control {
                kind: ControlKind::Elif,
                expr: Some(spec.expr),
                group: group_id.clone(),
            });
        }
        if let Some(group) = self.doc.conditional_groups.get_mut(group_id) {
            group.elifs.push(element_id.clone());
        }

        self.mark_conditional(group_id);
        Ok(element_id)
    }

    /// Attach the `else` branch. At most one per group (I6).
    pub fn add_else(&mut self, group_id: &GroupId, spec: ElseSpec) -> Result<ElementId, StoreError> {
        self.ensure_tx()?;
        let parent = self.group_parent(group_id)?;
        let has_else = self
            .doc
            .conditional_groups
            .get(group_id)
            .map(|g| g.else_.is_some())
            .unwrap_or(false);
        if has_else {
            return Err(StoreError::ElseExists(group_id.clone()));
        }

        let mut element_spec = spec.element;
        element_spec.parent = Some(parent);
        let element_id = self.create(element_spec)?;

        if let Some(element) = self.doc.element_mut(&element_id) {
            element.control = Some(Control {
                kind: ControlKind::Else,
                expr: None,
                group: group_id.clone(),
            });
        }
        if let Some(group) = self.doc.conditional_groups.get_mut(group_id) {
            group.else_ = Some(element_id.clone());
        }

        self.mark_conditional(group_id);
        Ok(element_id)
    }

    /// Replace a branch condition. `else` branches carry none (I6).
    pub fn update_condition(&mut self, id: &ElementId, expr: &str) -> Result<(), StoreError> {
        self.ensure_tx()?;
        if expr.trim().is_empty() {
            return Err(StoreError::EmptyCondition);
        }
        let element = self
            .doc
            .element_mut(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        let control = element
            .control
            .as_mut()
            .ok_or_else(|| StoreError::NotConditional(id.clone()))?;
        if control.kind == ControlKind::Else {
            return Err(StoreError::ElseCondition);
        }
        let group = control.group.clone();
        control.expr = Some(expr.to_string());
        self.mark_conditional(&group);
        self.mark_element(id);
        Ok(())
    }

    /// Remove an element from its group and delete it. Removing the `if`
    /// dissolves the entire group.
    pub fn remove_conditional(&mut self, id: &ElementId) -> Result<(), StoreError> {
        self.ensure_tx()?;
        let element = self
            .doc
            .element(id)
            .ok_or_else(|| StoreError::UnknownElement(id.clone()))?;
        if element.control.is_none() {
            return Err(StoreError::NotConditional(id.clone()));
        }
        // `delete` handles group membership, including dissolution when the
        // `if` goes away.
        self.delete(id)
    }

    fn group_parent(&self, group_id: &GroupId) -> Result<ElementId, StoreError> {
        let group = self
            .doc
            .conditional_groups
            .get(group_id)
            .ok_or_else(|| StoreError::UnknownGroup(group_id.clone()))?;
        let if_el = self
            .doc
            .element(&group.if_)
            .ok_or_else(|| StoreError::UnknownElement(group.if_.clone()))?;
        if_el
            .parent
            .clone()
            .ok_or_else(|| StoreError::NoParent(group.if_.clone()))
    }
}
