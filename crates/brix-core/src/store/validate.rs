//! Structural validators.
//!
//! Shape violations (I5, I6, I7) are non-fatal: they are collected into a
//! [`ValidationReport`] and returned, never thrown.

use serde::Serialize;

use crate::ids::{ElementId, GroupId};
use crate::ir::ControlKind;

use super::Store;

/// One validator finding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<ElementId>,
    pub message: String,
}

impl ValidationIssue {
    fn group(group_id: &GroupId, message: String) -> Self {
        Self {
            group_id: Some(group_id.clone()),
            element_id: None,
            message,
        }
    }

    fn element(element_id: &ElementId, message: String) -> Self {
        Self {
            group_id: None,
            element_id: Some(element_id.clone()),
            message,
        }
    }
}

/// Outcome of a validator run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// JS-style identifier: `[A-Za-z_$][A-Za-z0-9_$]*`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl Store {
    /// Check every conditional group against I5 (shared parent) and I6
    /// (shape), and flag elements whose `control` stamp points at a group
    /// that no longer exists.
    pub fn validate_conditional_groups(&self) -> ValidationReport {
        let mut issues = Vec::new();
        let doc = self.doc();

        for (group_id, group) in &doc.conditional_groups {
            let if_el = match doc.element(&group.if_) {
                Some(el) => el,
                None => {
                    issues.push(ValidationIssue::group(
                        group_id,
                        format!("if element {} does not exist", group.if_),
                    ));
                    continue;
                }
            };

            match &if_el.control {
                Some(control) if control.kind == ControlKind::If => {
                    if control.expr.as_deref().map(str::trim).unwrap_or("").is_empty() {
                        issues.push(ValidationIssue::group(
                            group_id,
                            format!("if element {} has an empty condition", group.if_),
                        ));
                    }
                }
                _ => issues.push(ValidationIssue::group(
                    group_id,
                    format!("if element {} is not stamped as if", group.if_),
                )),
            }

            let expected_parent = &if_el.parent;
            for elif in &group.elifs {
                match doc.element(elif) {
                    None => issues.push(ValidationIssue::group(
                        group_id,
                        format!("elif element {} does not exist", elif),
                    )),
                    Some(el) => {
                        if &el.parent != expected_parent {
                            issues.push(ValidationIssue::element(
                                elif,
                                "conditional branches must share one parent".to_string(),
                            ));
                        }
                        match &el.control {
                            Some(control) if control.kind == ControlKind::Elif => {
                                if control.expr.as_deref().map(str::trim).unwrap_or("").is_empty() {
                                    issues.push(ValidationIssue::element(
                                        elif,
                                        "elif branch has an empty condition".to_string(),
                                    ));
                                }
                            }
                            _ => issues.push(ValidationIssue::element(
                                elif,
                                "element is listed as elif but not stamped as one".to_string(),
                            )),
                        }
                    }
                }
            }

            if let Some(else_id) = &group.else_ {
                match doc.element(else_id) {
                    None => issues.push(ValidationIssue::group(
                        group_id,
                        format!("else element {} does not exist", else_id),
                    )),
                    Some(el) => {
                        if &el.parent != expected_parent {
                            issues.push(ValidationIssue::element(
                                else_id,
                                "conditional branches must share one parent".to_string(),
                            ));
                        }
                        match &el.control {
                            Some(control) if control.kind == ControlKind::Else => {
                                if control.expr.is_some() {
                                    issues.push(ValidationIssue::element(
                                        else_id,
                                        "else branch carries a condition".to_string(),
                                    ));
                                }
                            }
                            _ => issues.push(ValidationIssue::element(
                                else_id,
                                "element is listed as else but not stamped as one".to_string(),
                            )),
                        }
                    }
                }
            }
        }

        // Dangling stamps: survivors of a dissolved group, or hand-edited
        // snapshots.
        for (id, element) in &doc.elements.nodes {
            if let Some(control) = &element.control {
                match doc.conditional_groups.get(&control.group) {
                    None => issues.push(ValidationIssue::element(
                        id,
                        format!("control references missing group {}", control.group),
                    )),
                    Some(group) if !group.contains(id) => issues.push(ValidationIssue::element(
                        id,
                        format!("element is stamped for group {} but not a member", control.group),
                    )),
                    Some(_) => {}
                }
            }
        }

        ValidationReport::from_issues(issues)
    }

    /// Check every loop descriptor against I7.
    pub fn validate_loops(&self) -> ValidationReport {
        let mut issues = Vec::new();
        let doc = self.doc();

        for (id, element) in &doc.elements.nodes {
            let Some(spec) = &element.loop_ else { continue };
            if !doc.variables.contains(&spec.source) {
                issues.push(ValidationIssue::element(
                    id,
                    format!("loop source {:?} is not a variable", spec.source),
                ));
            }
            if !is_identifier(&spec.alias) {
                issues.push(ValidationIssue::element(
                    id,
                    format!("loop alias {:?} is not a valid identifier", spec.alias),
                ));
            }
            if let Some(index) = &spec.index {
                if !is_identifier(index) {
                    issues.push(ValidationIssue::element(
                        id,
                        format!("loop index {:?} is not a valid identifier", index),
                    ));
                }
            }
        }

        ValidationReport::from_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ElementSpec, ElifSpec, IfSpec, Store, VarSpec};
    use super::*;
    use crate::ir::LoopSpec;
    use serde_json::json;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("item"));
        assert!(is_identifier("_x$9"));
        assert!(is_identifier("$"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn test_clean_store_validates() {
        let mut store = Store::new();
        let root = store
            .tx("init", |s| {
                s.define_var(VarSpec::reactive("n", json!(0)))?;
                s.create(ElementSpec::new("layout", "div"))
            })
            .unwrap();
        store
            .tx("group", |s| {
                let (gid, _) = s.create_if_group(
                    &root,
                    IfSpec {
                        expr: "n.value > 0".to_string(),
                        element: ElementSpec::new("text", "p"),
                    },
                )?;
                s.add_elif(
                    &gid,
                    ElifSpec {
                        expr: "n.value < 0".to_string(),
                        element: ElementSpec::new("text", "p"),
                    },
                )?;
                Ok(())
            })
            .unwrap();
        assert!(store.validate_conditional_groups().valid);
        assert!(store.validate_loops().valid);
    }

    #[test]
    fn test_dangling_control_flagged() {
        let mut store = Store::new();
        let root = store
            .tx("init", |s| {
                s.define_var(VarSpec::reactive("n", json!(0)))?;
                s.create(ElementSpec::new("layout", "div"))
            })
            .unwrap();
        let (_, if_id) = store
            .tx("group", |s| {
                let (gid, if_id) = s.create_if_group(
                    &root,
                    IfSpec {
                        expr: "n.value > 0".to_string(),
                        element: ElementSpec::new("text", "p"),
                    },
                )?;
                s.add_else(
                    &gid,
                    super::super::ElseSpec {
                        element: ElementSpec::new("text", "p"),
                    },
                )?;
                Ok((gid, if_id))
            })
            .unwrap();

        // Deleting the if dissolves the group; the else survives with a
        // dangling stamp.
        store.tx("del", |s| s.delete(&if_id)).unwrap();
        let report = store.validate_conditional_groups();
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.message.contains("missing group")));
    }

    #[test]
    fn test_loop_with_deleted_source_flagged() {
        let mut store = Store::new();
        store
            .tx("init", |s| {
                s.define_var(VarSpec::reactive("items", json!([])))?;
                let li = s.create(ElementSpec::new("text", "li"))?;
                s.set_loop(
                    &li,
                    LoopSpec {
                        source: "items".to_string(),
                        alias: "it".to_string(),
                        index: None,
                        key: None,
                    },
                )?;
                s.delete_var("items")
            })
            .unwrap();
        let report = store.validate_loops();
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
    }
}
