//! JavaScript emission.
//!
//! Fragments land in five ordered buckets — declarations, state, functions,
//! lifecycle, cleanup — and are assembled into the final module around an
//! exported `mount(target)`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde_json::Value;

use crate::codegen::CodegenError;
use crate::ids::{now_millis, ElementId, GroupId};
use crate::ir::{Action, BindingKind, Element, IrDocument, VarKind, Variable};

use super::deps::DepEntry;
use super::graph::NodeGraph;

pub(crate) struct Emitter<'a> {
    doc: &'a IrDocument,
    graph: &'a NodeGraph,
    deps: &'a BTreeMap<String, DepEntry>,
    declarations: Vec<String>,
    state: Vec<String>,
    functions: Vec<String>,
    lifecycle: Vec<String>,
    cleanup: Vec<String>,
    /// Module-scoped holder name per element. Loop-body elements get none.
    holders: BTreeMap<ElementId, String>,
    /// Naming suffix per loop element, shared by `_loop`/`_uloop`/holders.
    loop_suffixes: BTreeMap<ElementId, String>,
    /// Groups whose create/update functions were actually generated.
    emitted_groups: BTreeSet<GroupId>,
    used_names: BTreeSet<String>,
    uid: u32,
}

impl<'a> Emitter<'a> {
    pub fn new(
        doc: &'a IrDocument,
        graph: &'a NodeGraph,
        deps: &'a BTreeMap<String, DepEntry>,
    ) -> Self {
        Self {
            doc,
            graph,
            deps,
            declarations: Vec::new(),
            state: Vec::new(),
            functions: Vec::new(),
            lifecycle: Vec::new(),
            cleanup: Vec::new(),
            holders: BTreeMap::new(),
            loop_suffixes: BTreeMap::new(),
            emitted_groups: BTreeSet::new(),
            used_names: BTreeSet::new(),
            uid: 0,
        }
    }

    pub fn emit(mut self) -> Result<String, CodegenError> {
        self.emit_variables()?;
        self.emit_create()?;
        self.emit_updaters()?;
        self.emit_events()?;
        Ok(self.assemble())
    }

    // ========================================================================
    // Variables (state bucket)
    // ========================================================================

    fn emit_variables(&mut self) -> Result<(), CodegenError> {
        let vars: Vec<Variable> = self.doc.variables.all().cloned().collect();
        for var in &vars {
            match var.kind {
                VarKind::Static => {
                    self.state
                        .push(format!("let {} = {};", var.name, js_value(&var.init)));
                }
                VarKind::Reactive => self.emit_reactive(var),
                VarKind::Fetch => self.emit_fetch(var),
            }
        }
        Ok(())
    }

    fn emit_reactive(&mut self, var: &Variable) {
        let name = &var.name;
        let has_subs = self
            .deps
            .get(name)
            .map(|d| !d.subs.is_empty())
            .unwrap_or(false);
        self.state
            .push(format!("let _{} = {};", name, js_value(&var.init)));
        let setter_body = if has_subs {
            format!("if (_{n} !== v) {{ _{n} = v; _u_{n}(); }}", n = name)
        } else {
            format!("if (_{n} !== v) {{ _{n} = v; }}", n = name)
        };
        self.state.push(format!(
            "const {n} = {{\n  get value() {{ return _{n}; }},\n  set value(v) {{ {body} }}\n}};",
            n = name,
            body = setter_body
        ));
    }

    fn emit_fetch(&mut self, var: &Variable) {
        let name = &var.name;
        self.state
            .push(format!("let _{} = {};", name, js_value(&var.init)));
        self.state.push(format!("let _{}_loading = true;", name));
        self.state.push(format!("let _{}_error = null;", name));
        self.state.push(format!(
            "const {n} = {{\n  get value() {{ return _{n}; }},\n  get loading() {{ return _{n}_loading; }},\n  get error() {{ return _{n}_error; }}\n}};",
            n = name
        ));
    }

    // ========================================================================
    // Tree creation (functions bucket)
    // ========================================================================

    fn emit_create(&mut self) -> Result<(), CodegenError> {
        let root_id = self.graph.root.clone();
        let is_loop = self.element(&root_id)?.loop_.is_some();

        let mut body = Vec::new();
        let root_expr = if let Some(group_id) = self.graph.group_at.get(&root_id).cloned() {
            // A conditional group at the root renders into a fragment so
            // mount still has a single node to append.
            body.push("  const frag = document.createDocumentFragment();".to_string());
            self.emit_conditional_site(&group_id, "frag", &mut body, "  ")?;
            let n = self.group_suffix(&group_id);
            self.cleanup.push(format!(
                "if (_c_{n} && _c_{n}.parentNode) _c_{n}.parentNode.removeChild(_c_{n});",
                n = n
            ));
            self.cleanup.push(format!(
                "if (_a_{n} && _a_{n}.parentNode) _a_{n}.parentNode.removeChild(_a_{n});",
                n = n
            ));
            "frag".to_string()
        } else if self.graph.group_members.contains(&root_id) {
            return Err(CodegenError::InvalidIr(
                "an elif or else branch cannot be the document root".to_string(),
            ));
        } else if is_loop {
            body.push("  const frag = document.createDocumentFragment();".to_string());
            self.emit_loop_site(&root_id, "frag", &mut body, "  ")?;
            if let Some(n) = self.loop_suffixes.get(&root_id).cloned() {
                self.cleanup.push(format!(
                    "for (const node of _n{}) {{ if (node.parentNode) node.parentNode.removeChild(node); }}",
                    n
                ));
                self.cleanup.push(format!(
                    "if (_a_l{n} && _a_l{n}.parentNode) _a_l{n}.parentNode.removeChild(_a_l{n});",
                    n = n
                ));
            }
            "frag".to_string()
        } else {
            self.emit_plain(&root_id, None, &mut body, "  ")?
        };

        body.push(format!("  return {};", root_expr));
        self.functions
            .insert(0, format!("function _create() {{\n{}\n}}", body.join("\n")));
        Ok(())
    }

    /// Emit one plain element: createElement, text, styles, classes, attrs,
    /// children, then the append onto `parent_holder`.
    fn emit_plain(
        &mut self,
        id: &ElementId,
        parent_holder: Option<&str>,
        body: &mut Vec<String>,
        indent: &str,
    ) -> Result<String, CodegenError> {
        let element = self.element(id)?.clone();
        let holder = self.holder(id);

        body.push(format!(
            "{}{} = document.createElement({});",
            indent,
            holder,
            js_string(&element.tag)
        ));
        if let Some(text) = &element.text {
            body.push(format!(
                "{}{}.textContent = {};",
                indent,
                holder,
                js_string(text)
            ));
        }
        for (prop, value) in &element.styles {
            body.push(format!(
                "{}{}.style.{} = {};",
                indent,
                holder,
                camel_case(prop),
                js_string(value)
            ));
        }
        for class in &element.classes {
            body.push(format!(
                "{}{}.classList.add({});",
                indent,
                holder,
                js_string(class)
            ));
        }
        for (name, value) in &element.attrs {
            body.push(format!(
                "{}{}.setAttribute({}, {});",
                indent,
                holder,
                js_string(name),
                js_string(value)
            ));
        }

        self.emit_children(&element, &holder, body, indent)?;

        if let Some(parent) = parent_holder {
            body.push(format!("{}{}.appendChild({});", indent, parent, holder));
        }
        Ok(holder)
    }

    fn emit_children(
        &mut self,
        element: &Element,
        holder: &str,
        body: &mut Vec<String>,
        indent: &str,
    ) -> Result<(), CodegenError> {
        for child_id in &element.children {
            if let Some(group_id) = self.graph.group_at.get(child_id).cloned() {
                self.emit_conditional_site(&group_id, holder, body, indent)?;
            } else if self.graph.group_members.contains(child_id) {
                // elif/else branches render through their group.
                continue;
            } else if self.element(child_id)?.loop_.is_some() {
                self.emit_loop_site(child_id, holder, body, indent)?;
            } else {
                self.emit_plain(child_id, Some(holder), body, indent)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Conditional groups
    // ========================================================================

    fn emit_conditional_site(
        &mut self,
        group_id: &GroupId,
        parent_holder: &str,
        body: &mut Vec<String>,
        indent: &str,
    ) -> Result<(), CodegenError> {
        let n = self.group_suffix(group_id);
        self.emitted_groups.insert(group_id.clone());
        self.declarations.push(format!("let _a_{} = null;", n));
        self.declarations.push(format!("let _c_{} = null;", n));

        // The anchor is a zero-width comment node dropped at the group's
        // position; _update re-inserts the live branch right after it.
        body.push(format!(
            "{}{}.appendChild(_a_{} = document.createComment(\"\"));",
            indent, parent_holder, n
        ));
        body.push(format!("{}_c_{} = _create_{}();", indent, n, n));
        body.push(format!(
            "{}if (_c_{}) {}.appendChild(_c_{});",
            indent, n, parent_holder, n
        ));

        self.emit_conditional_fns(group_id, &n)
    }

    fn emit_conditional_fns(
        &mut self,
        group_id: &GroupId,
        n: &str,
    ) -> Result<(), CodegenError> {
        let group = self
            .doc
            .conditional_groups
            .get(group_id)
            .ok_or_else(|| CodegenError::UnknownGroup(group_id.to_string()))?
            .clone();

        let mut lines = Vec::new();
        let if_expr = self.branch_expr(&group.if_)?;
        lines.push(format!("  if ({}) {{", if_expr));
        self.emit_branch(&group.if_, &mut lines)?;
        for elif in &group.elifs {
            let expr = self.branch_expr(elif)?;
            lines.push(format!("  }} else if ({}) {{", expr));
            self.emit_branch(elif, &mut lines)?;
        }
        if let Some(else_id) = &group.else_ {
            lines.push("  } else {".to_string());
            self.emit_branch(else_id, &mut lines)?;
        }
        lines.push("  }".to_string());
        lines.push("  return null;".to_string());
        self.functions.push(format!(
            "function _create_{}() {{\n{}\n}}",
            n,
            lines.join("\n")
        ));

        let mut update = Vec::new();
        update.push(format!(
            "  if (_c_{n} && _c_{n}.parentNode) _c_{n}.parentNode.removeChild(_c_{n});",
            n = n
        ));
        update.push(format!("  _c_{n} = _create_{n}();", n = n));
        update.push(format!(
            "  if (_c_{n} && _a_{n} && _a_{n}.parentNode) _a_{n}.parentNode.insertBefore(_c_{n}, _a_{n}.nextSibling);",
            n = n
        ));
        self.functions.push(format!(
            "function _update_{}() {{\n{}\n}}",
            n,
            update.join("\n")
        ));
        Ok(())
    }

    fn emit_branch(
        &mut self,
        id: &ElementId,
        lines: &mut Vec<String>,
    ) -> Result<(), CodegenError> {
        let holder = self.emit_plain(id, None, lines, "    ")?;
        lines.push(format!("    return {};", holder));
        Ok(())
    }

    fn branch_expr(&self, id: &ElementId) -> Result<String, CodegenError> {
        let element = self.element(id)?;
        element
            .control
            .as_ref()
            .and_then(|c| c.expr.clone())
            .ok_or_else(|| {
                CodegenError::InvalidIr(format!("conditional element {} has no condition", id))
            })
    }

    // ========================================================================
    // Loops
    // ========================================================================

    fn emit_loop_site(
        &mut self,
        id: &ElementId,
        parent_holder: &str,
        body: &mut Vec<String>,
        indent: &str,
    ) -> Result<(), CodegenError> {
        let mut n = match id.numeric_segment() {
            Some(segment) => segment.to_string(),
            None => {
                self.uid += 1;
                format!("x{}", self.uid)
            }
        };
        if self.used_names.contains(&format!("v{}", n)) {
            self.uid += 1;
            n = format!("x{}", self.uid);
        }
        self.used_names.insert(format!("v{}", n));
        self.loop_suffixes.insert(id.clone(), n.clone());

        self.declarations.push(format!("let v{} = null;", n));
        self.declarations.push(format!("let _a_l{} = null;", n));
        self.declarations.push(format!("let _n{} = [];", n));

        body.push(format!(
            "{}{}.appendChild(_a_l{} = document.createComment(\"\"));",
            indent, parent_holder, n
        ));
        body.push(format!("{}v{} = _loop{}();", indent, n, n));
        body.push(format!("{}{}.appendChild(v{});", indent, parent_holder, n));

        self.emit_loop_fns(id, &n)
    }

    fn emit_loop_fns(&mut self, id: &ElementId, n: &str) -> Result<(), CodegenError> {
        let element = self.element(id)?.clone();
        let spec = element.loop_.clone().ok_or_else(|| {
            CodegenError::Internal(format!("element {} lost its loop descriptor", id))
        })?;

        let params = match &spec.index {
            Some(index) => format!("({}, {})", spec.alias, index),
            None => format!("({})", spec.alias),
        };

        let mut lines = Vec::new();
        lines.push("  const frag = document.createDocumentFragment();".to_string());
        lines.push(format!("  _n{} = [];", n));
        lines.push(format!(
            "  ({}).forEach({} => {{",
            self.access(&spec.source)?,
            params
        ));
        let mut locals = 0u32;
        let top = self.emit_loop_element(&element, &mut lines, "    ", &mut locals)?;
        lines.push(format!("    frag.appendChild({});", top));
        lines.push(format!("    _n{}.push({});", n, top));
        lines.push("  });".to_string());
        lines.push("  return frag;".to_string());
        self.functions.push(format!(
            "function _loop{}() {{\n{}\n}}",
            n,
            lines.join("\n")
        ));

        let mut update = Vec::new();
        update.push(format!(
            "  if (!_a_l{n} || !_a_l{n}.parentNode) return;",
            n = n
        ));
        update.push(format!(
            "  for (const node of _n{}) {{ if (node.parentNode) node.parentNode.removeChild(node); }}",
            n
        ));
        update.push(format!(
            "  _a_l{n}.parentNode.insertBefore(_loop{n}(), _a_l{n}.nextSibling);",
            n = n
        ));
        self.functions.push(format!(
            "function _uloop{}() {{\n{}\n}}",
            n,
            update.join("\n")
        ));
        Ok(())
    }

    /// Loop bodies build one fresh subtree per iteration with local consts,
    /// not module holders. Text bindings are alias-qualified expressions and
    /// go out verbatim.
    fn emit_loop_element(
        &mut self,
        element: &Element,
        lines: &mut Vec<String>,
        indent: &str,
        locals: &mut u32,
    ) -> Result<String, CodegenError> {
        let local = format!("n{}", locals);
        *locals += 1;

        lines.push(format!(
            "{}const {} = document.createElement({});",
            indent,
            local,
            js_string(&element.tag)
        ));
        if let Some(text) = &element.text {
            lines.push(format!(
                "{}{}.textContent = {};",
                indent,
                local,
                js_string(text)
            ));
        } else if let Some(binding) = &element.text_binding {
            lines.push(format!("{}{}.textContent = {};", indent, local, binding));
        }
        for (prop, value) in &element.styles {
            lines.push(format!(
                "{}{}.style.{} = {};",
                indent,
                local,
                camel_case(prop),
                js_string(value)
            ));
        }
        for class in &element.classes {
            lines.push(format!(
                "{}{}.classList.add({});",
                indent,
                local,
                js_string(class)
            ));
        }
        for (name, value) in &element.attrs {
            lines.push(format!(
                "{}{}.setAttribute({}, {});",
                indent,
                local,
                js_string(name),
                js_string(value)
            ));
        }

        for child_id in &element.children {
            let child = self.element(child_id)?.clone();
            let child_local = self.emit_loop_element(&child, lines, indent, locals)?;
            lines.push(format!(
                "{}{}.appendChild({});",
                indent, local, child_local
            ));
        }
        Ok(local)
    }

    // ========================================================================
    // Binding updaters
    // ========================================================================

    fn emit_updaters(&mut self) -> Result<(), CodegenError> {
        let vars: Vec<Variable> = self.doc.variables.all().cloned().collect();
        for var in vars {
            let Some(entry) = self.deps.get(&var.name) else { continue };
            if entry.subs.is_empty() {
                continue;
            }

            let access = self.access(&var.name)?;
            let mut lines = Vec::new();
            for binding in &self.doc.bindings {
                if binding.variable != var.name {
                    continue;
                }
                // Loop-body elements have no holders; the loop re-render
                // covers them.
                let Some(holder) = self.holders.get(&binding.element_id) else { continue };
                match binding.kind {
                    BindingKind::Text => lines.push(format!(
                        "  if ({h}) {h}.textContent = {};",
                        access,
                        h = holder
                    )),
                    BindingKind::Attr => {
                        let key = binding.key.as_deref().unwrap_or_default();
                        lines.push(format!(
                            "  if ({h}) {h}.setAttribute({}, {});",
                            js_string(key),
                            access,
                            h = holder
                        ));
                    }
                    BindingKind::Style => {
                        let key = binding.key.as_deref().unwrap_or_default();
                        lines.push(format!(
                            "  if ({h}) {h}.style.{} = {};",
                            camel_case(key),
                            access,
                            h = holder
                        ));
                    }
                }
            }

            // Dependent conditional groups and loops re-render on change.
            for sub in &entry.subs {
                let gid = GroupId::from(sub.as_str());
                if self.emitted_groups.contains(&gid) {
                    lines.push(format!("  _update_{}();", self.group_suffix(&gid)));
                } else {
                    let eid = ElementId::from(sub.as_str());
                    let is_loop_sub = self
                        .doc
                        .element(&eid)
                        .and_then(|el| el.loop_.as_ref())
                        .map(|spec| spec.source == var.name)
                        .unwrap_or(false);
                    if is_loop_sub {
                        if let Some(suffix) = self.loop_suffixes.get(&eid) {
                            lines.push(format!("  _uloop{}();", suffix));
                        }
                    }
                }
            }

            self.functions.push(format!(
                "function _u_{}() {{\n{}\n}}",
                var.name,
                lines.join("\n")
            ));
            self.lifecycle.push(format!("_u_{}();", var.name));
        }
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    fn emit_events(&mut self) -> Result<(), CodegenError> {
        let mut attach = Vec::new();
        let mut index = 0usize;

        let events = self.doc.events.clone();
        for (event_type, entries) in &events {
            for entry in entries {
                let Some(holder) = self.holders.get(&entry.target).cloned() else {
                    continue;
                };
                let name = format!("_h{}_{}", index, sanitize(event_type));
                index += 1;

                let statement = self.action_statement(&entry.action)?;
                self.functions
                    .push(format!("function {}() {{\n  {}\n}}", name, statement));
                attach.push(format!(
                    "  if ({h}) {h}.addEventListener({}, {});",
                    js_string(event_type),
                    name,
                    h = holder
                ));
                self.cleanup.push(format!(
                    "if ({h}) {h}.removeEventListener({}, {});",
                    js_string(event_type),
                    name,
                    h = holder
                ));
            }
        }

        if !attach.is_empty() {
            self.functions.push(format!(
                "function _attach() {{\n{}\n}}",
                attach.join("\n")
            ));
            self.lifecycle.push("_attach();".to_string());
        }
        Ok(())
    }

    fn action_statement(&self, action: &Action) -> Result<String, CodegenError> {
        Ok(match action {
            Action::Update { target, op, value } => {
                let access = self.access(target)?;
                let value = action_value(value);
                if op == "=" {
                    format!("{} = {};", access, value)
                } else {
                    format!("{} {} {};", access, op, value)
                }
            }
            Action::Set { target, value } => {
                format!("{} = {};", self.access(target)?, action_value(value))
            }
            Action::Call { function } => format!("{}();", function),
            Action::Unknown => "/* unrecognised action */;".to_string(),
        })
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    fn assemble(self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "// brix: generated ui module ({})", now_millis());

        if !self.declarations.is_empty() {
            out.push('\n');
            for line in &self.declarations {
                out.push_str(line);
                out.push('\n');
            }
        }

        if !self.state.is_empty() {
            out.push('\n');
            for line in &self.state {
                out.push_str(line);
                out.push('\n');
            }
        }

        for function in &self.functions {
            out.push('\n');
            out.push_str(function);
            out.push('\n');
        }

        out.push_str("\nexport function mount(target) {\n");
        out.push_str("  const root = _create();\n");
        out.push_str("  target.appendChild(root);\n");
        for line in &self.lifecycle {
            let _ = writeln!(out, "  {}", line);
        }
        out.push_str("  return {\n    destroy() {\n");
        for line in &self.cleanup {
            let _ = writeln!(out, "      {}", line);
        }
        out.push_str("      if (root.parentNode) root.parentNode.removeChild(root);\n");
        out.push_str("    }\n  };\n}\n");
        out
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn element(&self, id: &ElementId) -> Result<&Element, CodegenError> {
        self.doc
            .element(id)
            .ok_or_else(|| CodegenError::UnknownElement(id.to_string()))
    }

    /// Module-scoped holder name for an element: `e<n>` from the id's
    /// counter segment, with a `_uid` fallback to stay collision-free.
    fn holder(&mut self, id: &ElementId) -> String {
        if let Some(existing) = self.holders.get(id) {
            return existing.clone();
        }
        let mut name = match id.numeric_segment() {
            Some(segment) => format!("e{}", segment),
            None => self.next_uid(),
        };
        if self.used_names.contains(&name) {
            name = self.next_uid();
        }
        self.used_names.insert(name.clone());
        self.holders.insert(id.clone(), name.clone());
        self.declarations.push(format!("let {} = null;", name));
        name
    }

    fn next_uid(&mut self) -> String {
        loop {
            self.uid += 1;
            let candidate = format!("e_{}", self.uid);
            if !self.used_names.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Naming suffix for a group's holders and functions.
    fn group_suffix(&self, group_id: &GroupId) -> String {
        match group_id.numeric_segment() {
            Some(segment) => format!("g{}", segment),
            None => format!("g_{}", group_id.as_str().len()),
        }
    }

    /// How a variable read is spelled: accessor `.value` for reactive and
    /// fetch, the bare name for static.
    fn access(&self, name: &str) -> Result<String, CodegenError> {
        let var = self
            .doc
            .variables
            .get(name)
            .ok_or_else(|| CodegenError::UnknownVariable(name.to_string()))?;
        Ok(match var.kind {
            VarKind::Static => name.to_string(),
            VarKind::Reactive | VarKind::Fetch => format!("{}.value", name),
        })
    }
}

/// Kebab-case to camelCase for style property access.
pub(crate) fn camel_case(prop: &str) -> String {
    let mut out = String::with_capacity(prop.len());
    let mut upper_next = false;
    for c in prop.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// JSON-quoted string literal.
pub(crate) fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Serialize a JSON value as a JS literal. Strings are quoted, numbers and
/// booleans textual, arrays and objects recursive, null stays null.
pub(crate) fn js_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Action values: strings are expressions embedded verbatim (unsafe by
/// design); everything else serializes as a literal.
fn action_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => js_value(other),
    }
}

fn sanitize(event_type: &str) -> String {
    event_type
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("background-color"), "backgroundColor");
        assert_eq!(camel_case("color"), "color");
        assert_eq!(camel_case("border-top-width"), "borderTopWidth");
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(js_string("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_js_value_literals() {
        use serde_json::json;
        assert_eq!(js_value(&json!(1)), "1");
        assert_eq!(js_value(&json!(true)), "true");
        assert_eq!(js_value(&json!(null)), "null");
        assert_eq!(js_value(&json!(["x", 1])), "[\"x\",1]");
        assert_eq!(js_value(&json!({"a": 1})), "{\"a\":1}");
    }
}
