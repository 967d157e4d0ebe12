//! brix compiler CLI
//!
//! Loads persisted IR snapshots (JSON), validates them, and compiles them to
//! standalone JavaScript.

use anyhow::{Context, Result};
use brix_core::{compile, IrSnapshot, Store};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brixc")]
#[command(author, version, about = "brix UI compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an IR snapshot to JavaScript
    Compile {
        /// Input snapshot (.json)
        file: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the structural validators over a snapshot
    Check {
        /// Input snapshot(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Dump a summary of the IR document
    Ir {
        /// Input snapshot to summarize
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { file, output } => compile_snapshot(file, output),
        Commands::Check { files } => check(files),
        Commands::Ir { file } => dump_ir(file),
    }
}

fn load_snapshot(file: &PathBuf) -> Result<IrSnapshot> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    IrSnapshot::from_json(&json)
        .with_context(|| format!("Failed to decode snapshot: {}", file.display()))
}

fn compile_snapshot(file: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let snapshot = load_snapshot(&file)?;
    let source = compile(&snapshot)
        .map_err(|e| anyhow::anyhow!("Compilation failed: {}", e))?;

    match output {
        Some(path) => {
            fs::write(&path, source)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", source),
    }
    Ok(())
}

fn check(files: Vec<PathBuf>) -> Result<()> {
    let mut failed = false;
    for file in &files {
        let json = fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        let store = Store::from_json(&json)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", file.display(), e))?;

        let groups = store.validate_conditional_groups();
        let loops = store.validate_loops();
        for issue in groups.errors.iter().chain(loops.errors.iter()) {
            failed = true;
            let at = issue
                .group_id
                .as_ref()
                .map(|g| g.to_string())
                .or_else(|| issue.element_id.as_ref().map(|e| e.to_string()))
                .unwrap_or_default();
            eprintln!("{}: {} ({})", file.display(), issue.message, at);
        }
    }
    if failed {
        return Err(anyhow::anyhow!("Check failed"));
    }
    eprintln!("OK: {} snapshot(s) checked", files.len());
    Ok(())
}

fn dump_ir(file: PathBuf) -> Result<()> {
    let snapshot = load_snapshot(&file)?;

    println!("=== Document (v{}) ===\n", snapshot.meta.version);

    println!("Variables ({}):", snapshot.variables.len());
    for var in snapshot.variables.all() {
        println!(
            "  {} : {} = {}",
            var.name,
            match var.kind {
                brix_core::VarKind::Static => "static",
                brix_core::VarKind::Reactive => "reactive",
                brix_core::VarKind::Fetch => "fetch",
            },
            var.init
        );
    }

    println!("\nElements ({}):", snapshot.elements.nodes.len());
    if let Some(root) = &snapshot.elements.root {
        print_tree(&snapshot, root, 1);
    }

    println!("\nBindings ({}):", snapshot.bindings.len());
    for binding in &snapshot.bindings {
        println!(
            "  {} -> {} ({:?}{})",
            binding.variable,
            binding.element_id,
            binding.kind,
            binding
                .key
                .as_ref()
                .map(|k| format!(" key={}", k))
                .unwrap_or_default()
        );
    }

    let event_count: usize = snapshot.events.values().map(Vec::len).sum();
    println!("\nEvents ({}):", event_count);
    for (event_type, entries) in &snapshot.events {
        for entry in entries {
            println!("  {} on {} -> {:?}", event_type, entry.target, entry.action);
        }
    }

    println!("\nConditional groups ({}):", snapshot.conditional_groups.len());
    for (group_id, group) in &snapshot.conditional_groups {
        println!(
            "  {}: if={} elifs={} else={}",
            group_id,
            group.if_,
            group.elifs.len(),
            group
                .else_
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }

    Ok(())
}

fn print_tree(snapshot: &IrSnapshot, id: &brix_core::ElementId, indent: usize) {
    let pad = "  ".repeat(indent);
    let Some(element) = snapshot.element(id) else {
        println!("{}[missing {}]", pad, id);
        return;
    };
    let mut notes = Vec::new();
    if element.loop_.is_some() {
        notes.push("loop".to_string());
    }
    if let Some(control) = &element.control {
        notes.push(format!("{:?}", control.kind).to_lowercase());
    }
    let suffix = if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join(", "))
    };
    println!("{}<{}> [{}]{}", pad, element.tag, element.kind, suffix);
    for child in &element.children {
        print_tree(snapshot, child, indent + 1);
    }
}
