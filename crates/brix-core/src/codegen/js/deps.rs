//! Variable-to-dependent analysis.
//!
//! For every variable, collect the ids that must react when it changes:
//! elements with bindings, elements whose event actions write it, conditional
//! groups whose expressions mention it, and loop elements sourced from it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::ir::{IrDocument, VarKind};

/// Subscribers of one variable.
#[derive(Debug, Clone)]
pub(crate) struct DepEntry {
    pub kind: VarKind,
    pub subs: BTreeSet<String>,
}

pub(crate) fn analyze(doc: &IrDocument) -> BTreeMap<String, DepEntry> {
    let mut deps: BTreeMap<String, DepEntry> = doc
        .variables
        .all()
        .map(|v| {
            (
                v.name.clone(),
                DepEntry {
                    kind: v.kind,
                    subs: BTreeSet::new(),
                },
            )
        })
        .collect();

    for binding in &doc.bindings {
        if let Some(entry) = deps.get_mut(&binding.variable) {
            entry.subs.insert(binding.element_id.to_string());
        }
    }

    for entries in doc.events.values() {
        for event in entries {
            if let Some(target) = event.action.target_variable() {
                if let Some(entry) = deps.get_mut(target) {
                    entry.subs.insert(event.target.to_string());
                }
            }
        }
    }

    for (group_id, group) in &doc.conditional_groups {
        for member in group.members() {
            let Some(element) = doc.element(&member) else { continue };
            let Some(control) = &element.control else { continue };
            let Some(expr) = &control.expr else { continue };
            for token in tokenize(expr) {
                if let Some(entry) = deps.get_mut(&token) {
                    entry.subs.insert(group_id.to_string());
                }
            }
        }
    }

    for (id, element) in &doc.elements.nodes {
        if let Some(spec) = &element.loop_ {
            if let Some(entry) = deps.get_mut(&spec.source) {
                entry.subs.insert(id.to_string());
            }
        }
    }

    deps
}

/// Scan out identifier tokens: `[A-Za-z_$][A-Za-z0-9_$]*`.
pub(crate) fn tokenize(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in expr.chars() {
        let starts = c.is_ascii_alphabetic() || c == '_' || c == '$';
        let continues = starts || c.is_ascii_digit();
        if current.is_empty() {
            if starts {
                current.push(c);
            }
        } else if continues {
            current.push(c);
        } else {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
