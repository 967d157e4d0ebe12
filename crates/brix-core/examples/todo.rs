//! Build a small todo list (loop over a reactive array) and compile it.
//! Also exercises undo and snapshot export.

use brix_core::{compile, ElementSpec, LoopSpec, Store, VarSpec};
use serde_json::json;

fn main() {
    let mut store = Store::new();

    store
        .tx("build todo list", |s| {
            s.define_var(VarSpec::reactive(
                "todos",
                json!(["buy milk", "water plants", "ship release"]),
            ))?;

            let root = s.create(ElementSpec::new("layout", "div"))?;
            let title = s.create(
                ElementSpec::new("text", "h2")
                    .with_text("Todos")
                    .with_parent(&root),
            )?;
            s.style(&title, "font-weight", Some("bold"))?;

            let list = s.create(ElementSpec::new("layout", "ul").with_parent(&root))?;
            let item = s.create(ElementSpec::new("text", "li").with_parent(&list))?;
            s.add_class(&item, "todo-item")?;
            s.set_loop(
                &item,
                LoopSpec {
                    source: "todos".to_string(),
                    alias: "todo".to_string(),
                    index: Some("i".to_string()),
                    key: None,
                },
            )?;
            s.bind_text(&item, "todo")?;
            Ok(())
        })
        .expect("build failed");

    // A second transaction we immediately take back.
    store
        .tx("retitle", |s| {
            let root = s.root().expect("root exists");
            let children = s.children(&root);
            s.set_text(&children[0], Some("Things to do"))
        })
        .expect("retitle failed");
    assert!(store.undo().expect("undo"));
    println!("After undo, canRedo = {}", store.can_redo());

    let snapshot_json = store.to_json().expect("export failed");
    println!("Snapshot: {} bytes of JSON", snapshot_json.len());

    let js = compile(&store.ir()).expect("compilation failed");
    println!("Generated {} bytes of JavaScript\n", js.len());
    println!("{}", js);
}
