//! Node graph over the IR snapshot.
//!
//! The graph mirrors the document: one node per variable, one per plain
//! element, one per loop element, one per conditional group (which owns its
//! branch elements), plus the `root` entry. Building it doubles as the
//! referential-integrity check for hand-constructed snapshots.

use std::collections::{BTreeMap, BTreeSet};

use crate::codegen::CodegenError;
use crate::ids::{ElementId, GroupId};
use crate::ir::{BindingKind, ControlKind, IrDocument};

/// One node of the graph, keyed for debug output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Node {
    Var(String),
    Element(ElementId),
    Loop(ElementId),
    Conditional(GroupId),
}

impl Node {
    pub fn describe(&self) -> String {
        match self {
            Node::Var(name) => format!("var:{}", name),
            Node::Element(id) => format!("element:{}", id),
            Node::Loop(id) => format!("loop:{}", id),
            Node::Conditional(id) => format!("conditional:{}", id),
        }
    }
}

#[derive(Debug)]
pub(crate) struct NodeGraph {
    pub nodes: Vec<Node>,
    pub root: ElementId,
    /// All elements owned by some conditional group.
    pub group_members: BTreeSet<ElementId>,
    /// `if` element -> its group: the tree position where the group renders.
    pub group_at: BTreeMap<ElementId, GroupId>,
}

pub(crate) fn build(doc: &IrDocument) -> Result<NodeGraph, CodegenError> {
    let root = doc
        .elements
        .root
        .clone()
        .ok_or(CodegenError::MissingRoot)?;
    if !doc.elements.nodes.contains_key(&root) {
        return Err(CodegenError::UnknownElement(root.to_string()));
    }

    check_references(doc)?;

    let mut group_members = BTreeSet::new();
    let mut group_at = BTreeMap::new();
    for (group_id, group) in &doc.conditional_groups {
        group_at.insert(group.if_.clone(), group_id.clone());
        for member in group.members() {
            group_members.insert(member);
        }
    }

    let mut nodes = Vec::new();
    for var in doc.variables.all() {
        nodes.push(Node::Var(var.name.clone()));
    }
    for (id, element) in &doc.elements.nodes {
        if group_members.contains(id) {
            continue;
        }
        if element.loop_.is_some() {
            nodes.push(Node::Loop(id.clone()));
        } else {
            nodes.push(Node::Element(id.clone()));
        }
    }
    for group_id in doc.conditional_groups.keys() {
        nodes.push(Node::Conditional(group_id.clone()));
    }

    Ok(NodeGraph {
        nodes,
        root,
        group_members,
        group_at,
    })
}

fn check_references(doc: &IrDocument) -> Result<(), CodegenError> {
    for (id, element) in &doc.elements.nodes {
        for child in &element.children {
            if !doc.elements.nodes.contains_key(child) {
                return Err(CodegenError::UnknownElement(child.to_string()));
            }
        }
        if let Some(spec) = &element.loop_ {
            if !doc.variables.contains(&spec.source) {
                return Err(CodegenError::UnknownVariable(spec.source.clone()));
            }
        }
        if let Some(control) = &element.control {
            if !doc.conditional_groups.contains_key(&control.group) {
                return Err(CodegenError::UnknownGroup(control.group.to_string()));
            }
            match control.kind {
                ControlKind::Else => {}
                _ if control.expr.as_deref().map(str::trim).unwrap_or("").is_empty() => {
                    return Err(CodegenError::InvalidIr(format!(
                        "conditional element {} has an empty condition",
                        id
                    )));
                }
                _ => {}
            }
        }
    }

    for binding in &doc.bindings {
        if !doc.elements.nodes.contains_key(&binding.element_id) {
            return Err(CodegenError::UnknownElement(binding.element_id.to_string()));
        }
        if !doc.variables.contains(&binding.variable) {
            return Err(CodegenError::UnknownVariable(binding.variable.clone()));
        }
        match binding.kind {
            BindingKind::Text if binding.key.is_some() => {
                return Err(CodegenError::InvalidIr(format!(
                    "text binding {} carries a key",
                    binding.id
                )));
            }
            BindingKind::Attr | BindingKind::Style if binding.key.is_none() => {
                return Err(CodegenError::InvalidIr(format!(
                    "binding {} is missing its key",
                    binding.id
                )));
            }
            _ => {}
        }
    }

    for entries in doc.events.values() {
        for entry in entries {
            if !doc.elements.nodes.contains_key(&entry.target) {
                return Err(CodegenError::UnknownElement(entry.target.to_string()));
            }
            if let Some(var) = entry.action.target_variable() {
                if !doc.variables.contains(var) {
                    return Err(CodegenError::UnknownVariable(var.to_string()));
                }
            }
        }
    }

    for (group_id, group) in &doc.conditional_groups {
        for member in group.members() {
            if !doc.elements.nodes.contains_key(&member) {
                return Err(CodegenError::InvalidIr(format!(
                    "group {} references missing element {}",
                    group_id, member
                )));
            }
        }
    }

    Ok(())
}
