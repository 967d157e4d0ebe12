//! Build a reactive counter with an if/else banner and compile it.

use brix_core::{compile, Action, ElementSpec, ElseSpec, IfSpec, Store, VarSpec};
use serde_json::json;

fn main() {
    let mut store = Store::new();

    store
        .tx("build counter", |s| {
            s.define_var(VarSpec::reactive("count", json!(0)))?;

            let root = s.create(ElementSpec::new("layout", "div"))?;
            let heading = s.create(ElementSpec::new("text", "h1").with_parent(&root))?;
            s.bind_text(&heading, "count")?;

            let plus = s.create(
                ElementSpec::new("button", "button")
                    .with_text("+")
                    .with_parent(&root),
            )?;
            s.on(
                &plus,
                "click",
                Action::Update {
                    target: "count".to_string(),
                    op: "+=".to_string(),
                    value: json!(1),
                },
            )?;

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
            Ok(())
        })
        .expect("build failed");

    println!("Document built: {} elements", store.ir().elements.nodes.len());

    let report = store.validate_conditional_groups();
    assert!(report.valid, "unexpected validation issues: {:?}", report.errors);

    match compile(&store.ir()) {
        Ok(js) => {
            println!("Generated {} bytes of JavaScript\n", js.len());
            println!("{}", js);
        }
        Err(e) => {
            eprintln!("Compilation failed: {}", e);
            std::process::exit(1);
        }
    }
}
