//! Standalone JavaScript generation.
//!
//! The pipeline reads a frozen snapshot, builds a node graph, analyzes
//! variable dependencies, and emits a module exporting
//! `mount(target) -> { destroy() }`. Output is a pure function of the
//! snapshot: identical snapshots produce byte-identical code except for the
//! leading timestamp comment.

pub(crate) mod deps;
pub(crate) mod emit;
pub(crate) mod graph;

use std::collections::BTreeMap;

use crate::codegen::CodegenError;
use crate::ir::IrSnapshot;

use self::emit::Emitter;

/// Introspection data from the last compile.
#[derive(Debug, Clone, Default)]
pub struct CompilerDebug {
    /// Graph nodes, e.g. `var:count`, `element:element_1_...`.
    pub nodes: Vec<String>,
    /// Variable name -> subscriber ids.
    pub deps: BTreeMap<String, Vec<String>>,
    pub bindings: usize,
    pub events: usize,
}

/// The IR-to-JavaScript compiler.
#[derive(Debug, Default)]
pub struct JsCompiler {
    debug: CompilerDebug,
}

impl JsCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a frozen snapshot into JavaScript source.
    pub fn compile(&mut self, ir: &IrSnapshot) -> Result<String, CodegenError> {
        tracing::debug!(
            elements = ir.elements.nodes.len(),
            variables = ir.variables.len(),
            "compiling snapshot"
        );
        let graph = graph::build(ir)?;
        let deps = deps::analyze(ir);
        for (name, entry) in &deps {
            tracing::trace!(var = %name, kind = ?entry.kind, subs = entry.subs.len(), "dependency");
        }

        self.debug = CompilerDebug {
            nodes: graph.nodes.iter().map(|n| n.describe()).collect(),
            deps: deps
                .iter()
                .map(|(name, entry)| (name.clone(), entry.subs.iter().cloned().collect()))
                .collect(),
            bindings: ir.bindings.len(),
            events: ir.events.values().map(Vec::len).sum(),
        };

        let source = Emitter::new(ir, &graph, &deps).emit()?;
        tracing::debug!(bytes = source.len(), "compile finished");
        Ok(source)
    }

    /// Inspect the node graph and dependency map of the last compile.
    pub fn debug(&self) -> &CompilerDebug {
        &self.debug
    }
}

/// One-shot convenience wrapper around [`JsCompiler`].
pub fn compile(ir: &IrSnapshot) -> Result<String, CodegenError> {
    JsCompiler::new().compile(ir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Action, LoopSpec};
    use crate::store::{ElementSpec, ElseSpec, IfSpec, Store, VarSpec};
    use serde_json::json;

    /// Scenario: reactive counter (variable, bound heading, click handler).
    fn counter_store() -> Store {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::reactive("count", json!(0)))?;
                let root = s.create(ElementSpec::new("layout", "div"))?;
                let h1 = s.create(ElementSpec::new("text", "h1").with_parent(&root))?;
                s.bind_text(&h1, "count")?;
                let btn = s.create(
                    ElementSpec::new("button", "button")
                        .with_text("+")
                        .with_parent(&root),
                )?;
                s.on(
                    &btn,
                    "click",
                    Action::Update {
                        target: "count".to_string(),
                        op: "+=".to_string(),
                        value: json!(1),
                    },
                )?;
                Ok(())
            })
            .unwrap();
        store
    }

    // ========================================================================
    // REACTIVE COUNTER
    // ========================================================================

    #[test]
    fn test_counter_state_emission() {
        let js = compile(&counter_store().ir()).unwrap();
        assert!(js.contains("let _count = 0;"));
        assert!(js.contains("get value() { return _count; }"));
        assert!(js.contains("set value(v) { if (_count !== v) { _count = v; _u_count(); } }"));
    }

    #[test]
    fn test_counter_updater_and_handler() {
        let js = compile(&counter_store().ir()).unwrap();
        // Holders derive from the id counter: root=e1, h1=e2, button=e3.
        assert!(js.contains("function _u_count() {"));
        assert!(js.contains("if (e2) e2.textContent = count.value;"));
        assert!(js.contains("function _h0_click() {"));
        assert!(js.contains("count.value += 1;"));
        assert!(js.contains("if (e3) e3.addEventListener(\"click\", _h0_click);"));
        assert!(js.contains("if (e3) e3.removeEventListener(\"click\", _h0_click);"));
    }

    #[test]
    fn test_counter_create_and_mount() {
        let js = compile(&counter_store().ir()).unwrap();
        assert!(js.contains("function _create() {"));
        assert!(js.contains("e1 = document.createElement(\"div\");"));
        assert!(js.contains("e3.textContent = \"+\";"));
        assert!(js.contains("e1.appendChild(e2);"));
        assert!(js.contains("export function mount(target) {"));
        assert!(js.contains("target.appendChild(root);"));
        // Initial updaters run before listeners attach.
        let u_pos = js.find("  _u_count();").unwrap();
        let attach_pos = js.find("  _attach();").unwrap();
        assert!(u_pos < attach_pos);
        assert!(js.contains("destroy() {"));
    }

    #[test]
    fn test_reactive_without_subscribers_has_plain_setter() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::reactive("idle", json!(0)))?;
                s.create(ElementSpec::new("layout", "div"))?;
                Ok(())
            })
            .unwrap();
        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("set value(v) { if (_idle !== v) { _idle = v; } }"));
        assert!(!js.contains("_u_idle"));
    }

    // ========================================================================
    // CONDITIONAL GROUPS
    // ========================================================================

    #[test]
    fn test_if_else_emission() {
        let mut store = counter_store();
        let root = store.root().unwrap();
        store
            .tx("group", |s| {
                let (gid, _) = s.create_if_group(
                    &root,
                    IfSpec {
                        expr: "count.value === 0".to_string(),
                        element: ElementSpec::new("text", "p").with_text("Zero!"),
                    },
                )?;
                s.add_else(
                    &gid,
                    ElseSpec {
                        element: ElementSpec::new("text", "p").with_text("Not zero!"),
                    },
                )?;
                Ok(gid)
            })
            .unwrap();

        let mut compiler = JsCompiler::new();
        let js = compiler.compile(&store.ir()).unwrap();

        assert!(js.contains("function _create_g1() {"));
        assert!(js.contains("  if (count.value === 0) {"));
        assert!(js.contains("  } else {"));
        assert!(js.contains("\"Zero!\""));
        assert!(js.contains("\"Not zero!\""));
        assert!(js.contains("return null;"));
        assert!(js.contains("function _update_g1() {"));
        assert!(js.contains("_a_g1 = document.createComment(\"\")"));
        // The group re-renders when count changes.
        assert!(js.contains("  _update_g1();"));

        // count's dependency set includes the group id.
        let subs = compiler.debug().deps.get("count").unwrap();
        assert!(subs.iter().any(|s| s.starts_with("group_")));
    }

    #[test]
    fn test_if_without_else_returns_null_on_no_match() {
        let mut store = counter_store();
        let root = store.root().unwrap();
        store
            .tx("group", |s| {
                s.create_if_group(
                    &root,
                    IfSpec {
                        expr: "count.value > 10".to_string(),
                        element: ElementSpec::new("text", "p").with_text("High!"),
                    },
                )
            })
            .unwrap();
        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("if (count.value > 10) {"));
        assert!(!js.contains("} else {"));
        assert!(js.contains("  return null;"));
    }

    // ========================================================================
    // LOOPS
    // ========================================================================

    #[test]
    fn test_loop_emission() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::reactive("items", json!(["x", "y"])))?;
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
                s.bind_text(&li, "it")?;
                Ok(())
            })
            .unwrap();

        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("function _loop1() {"));
        assert!(js.contains("(items.value).forEach((it) => {"));
        assert!(js.contains("const n0 = document.createElement(\"li\");"));
        assert!(js.contains("n0.textContent = it;"));
        assert!(js.contains("frag.appendChild(n0);"));
        assert!(js.contains("_n1.push(n0);"));
        assert!(js.contains("function _uloop1() {"));
        // The loop re-renders when its source changes.
        assert!(js.contains("  _uloop1();"));
    }

    #[test]
    fn test_loop_with_index_and_children() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::reactive("rows", json!([])))?;
                let root = s.create(ElementSpec::new("layout", "ul"))?;
                let li = s.create(ElementSpec::new("text", "li").with_parent(&root))?;
                s.add_class(&li, "row")?;
                s.set_loop(
                    &li,
                    LoopSpec {
                        source: "rows".to_string(),
                        alias: "row".to_string(),
                        index: Some("i".to_string()),
                        key: None,
                    },
                )?;
                let span = s.create(ElementSpec::new("text", "span").with_parent(&li))?;
                s.bind_text(&span, "row.label")?;
                Ok(())
            })
            .unwrap();

        let js = compile(&store.ir()).unwrap();
        assert!(js.contains(".forEach((row, i) => {"));
        // Rich path inside loop bodies: classes carried over.
        assert!(js.contains("n0.classList.add(\"row\");"));
        assert!(js.contains("n1.textContent = row.label;"));
        assert!(js.contains("n0.appendChild(n1);"));
    }

    #[test]
    fn test_loop_as_root_mounts_fragment() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::reactive("items", json!(["x"])))?;
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
                Ok(())
            })
            .unwrap();
        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("const frag = document.createDocumentFragment();"));
        assert!(js.contains("return frag;"));
        assert!(js.contains("function _loop1() {"));
    }

    // ========================================================================
    // BINDINGS AND ACTIONS
    // ========================================================================

    #[test]
    fn test_attr_and_style_bindings() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::reactive("color", json!("red")))?;
                s.define_var(VarSpec::reactive("link", json!("/home")))?;
                let root = s.create(ElementSpec::new("layout", "a"))?;
                s.bind_attr(&root, "link", "href")?;
                s.bind_style(&root, "color", "background-color")?;
                Ok(())
            })
            .unwrap();
        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("if (e1) e1.setAttribute(\"href\", link.value);"));
        assert!(js.contains("if (e1) e1.style.backgroundColor = color.value;"));
    }

    #[test]
    fn test_static_variable_access_and_set_action() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::static_("step", json!(5)))?;
                s.define_var(VarSpec::reactive("total", json!(0)))?;
                let root = s.create(ElementSpec::new("button", "button"))?;
                s.bind_text(&root, "total")?;
                s.on(
                    &root,
                    "click",
                    Action::Update {
                        target: "total".to_string(),
                        op: "+=".to_string(),
                        value: json!("step"),
                    },
                )?;
                s.on(
                    &root,
                    "dblclick",
                    Action::Set {
                        target: "total".to_string(),
                        value: json!(0),
                    },
                )?;
                Ok(())
            })
            .unwrap();
        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("let step = 5;"));
        // String action values go out verbatim: the static is read bare.
        assert!(js.contains("total.value += step;"));
        assert!(js.contains("total.value = 0;"));
        assert!(js.contains("_h1_dblclick"));
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let json_doc = {
            let mut store = Store::new();
            store
                .tx("build", |s| {
                    let root = s.create(ElementSpec::new("button", "button"))?;
                    Ok(root)
                })
                .unwrap();
            let mut value: serde_json::Value =
                serde_json::from_str(&store.to_json().unwrap()).unwrap();
            let root_id = value["elements"]["rootId"].as_str().unwrap().to_string();
            value["events"]["click"] = json!([{
                "id": "event_1_0",
                "target": root_id,
                "action": { "kind": "Teleport", "somewhere": true }
            }]);
            value.to_string()
        };
        let snapshot = IrSnapshot::from_json(&json_doc).unwrap();
        let js = compile(&snapshot).unwrap();
        assert!(js.contains("/* unrecognised action */"));
    }

    #[test]
    fn test_fetch_variable_emission() {
        let mut store = Store::new();
        store
            .tx("build", |s| {
                s.define_var(VarSpec::fetch("user", "/api/user"))?;
                let root = s.create(ElementSpec::new("text", "p"))?;
                s.bind_text(&root, "user")?;
                Ok(())
            })
            .unwrap();
        let js = compile(&store.ir()).unwrap();
        assert!(js.contains("let _user = null;"));
        assert!(js.contains("let _user_loading = true;"));
        assert!(js.contains("let _user_error = null;"));
        assert!(js.contains("get loading() { return _user_loading; }"));
        assert!(js.contains("if (e1) e1.textContent = user.value;"));
        // No setter: fetch accessors are read-only.
        assert!(!js.contains("set value(v) { if (_user"));
    }

    // ========================================================================
    // DETERMINISM AND FAILURES
    // ========================================================================

    #[test]
    fn test_compile_deterministic_modulo_timestamp() {
        let store = counter_store();
        let snapshot = store.ir();
        let a = compile(&snapshot).unwrap();
        let b = compile(&snapshot).unwrap();
        let tail = |s: &str| s.splitn(2, '\n').nth(1).unwrap_or_default().to_string();
        assert_eq!(tail(&a), tail(&b));
        assert!(a.starts_with("// brix: generated ui module ("));
    }

    #[test]
    fn test_compile_without_root_fails() {
        let store = Store::new();
        let err = compile(&store.ir()).unwrap_err();
        assert!(matches!(err, CodegenError::MissingRoot));
    }

    #[test]
    fn test_hand_constructed_snapshot_with_dangling_binding_fails() {
        let mut store = Store::new();
        store
            .tx("build", |s| s.create(ElementSpec::new("layout", "div")).map(|_| ()))
            .unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&store.to_json().unwrap()).unwrap();
        value["bindings"] = json!([{
            "id": "binding_1_0",
            "elementId": "element_404_0",
            "variable": "ghost",
            "kind": "text",
            "key": null
        }]);
        let snapshot = IrSnapshot::from_json(&value.to_string()).unwrap();
        let err = compile(&snapshot).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownElement(_)));
    }

    #[test]
    fn test_debug_exposes_graph() {
        let mut compiler = JsCompiler::new();
        compiler.compile(&counter_store().ir()).unwrap();
        let debug = compiler.debug();
        assert!(debug.nodes.iter().any(|n| n == "var:count"));
        assert_eq!(debug.nodes.iter().filter(|n| n.starts_with("element:")).count(), 3);
        assert_eq!(debug.bindings, 1);
        assert_eq!(debug.events, 1);
        // The bound heading and the button both subscribe to count.
        assert_eq!(debug.deps.get("count").map(Vec::len), Some(2));
    }
}
