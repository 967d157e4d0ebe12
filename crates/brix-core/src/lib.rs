//! brix core
//!
//! This crate implements the core of the brix visual UI builder:
//! - A transactional, undoable IR store over a passive document model
//! - A node-based compiler that turns a frozen IR snapshot into standalone
//!   JavaScript with no runtime library
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Store (L1)                            │
//! │  ┌──────────┐  ┌───────────┐  ┌──────────┐  ┌───────────────┐  │
//! │  │ tx stack │  │  history  │  │  id gen  │  │  validators   │  │
//! │  │ (frames) │  │  (ring)   │  │ (per-ty) │  │  (I5/I6/I7)   │  │
//! │  └──────────┘  └───────────┘  └──────────┘  └───────────────┘  │
//! └───────────────────────────┬─────────────────────────────────────┘
//!                             │ owns
//!                    ┌────────┴────────┐
//!                    │ IrDocument (L0) │  elements · variables · events
//!                    │   (passive)     │  bindings · groups · dirty flags
//!                    └────────┬────────┘
//!                             │ ir() → frozen snapshot
//!                    ┌────────┴────────┐
//!                    │  Compiler (L2)  │  graph → deps → emit buckets
//!                    │  codegen::js    │  → mount(target) { destroy }
//!                    └─────────────────┘
//! ```

// Core modules
pub mod error;
pub mod ids;

// IR modules
pub mod ir;

// Store module
pub mod store;

// Codegen module
pub mod codegen;

// Re-exports
pub use codegen::{compile, CodegenError, CompilerDebug, JsCompiler};
pub use error::StoreError;
pub use ids::{BindingId, ElementId, EventId, GroupId, VarId};
pub use ir::{
    Action, Binding, BindingKind, Control, ControlKind, DirtyFlags, Element, EventEntry, Group,
    IrDocument, IrSnapshot, LoopSpec, Meta, VarKind, Variable, Variables,
};
pub use store::{
    ElementSpec, ElifSpec, ElseSpec, IfSpec, LoopPatch, Store, ValidationIssue, ValidationReport,
    VarSpec,
};
