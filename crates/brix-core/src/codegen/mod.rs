//! Code generation from a frozen IR snapshot.
//!
//! One target for now: a standalone JavaScript module exporting
//! `mount(target) -> { destroy() }`, depending only on the ambient DOM API.

use thiserror::Error;

pub mod js;

pub use js::{compile, CompilerDebug, JsCompiler};

/// Code generation error.
///
/// The store would have rejected these IRs; they reach the compiler through
/// hand-constructed snapshots.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("document has no root element")]
    MissingRoot,

    #[error("unknown element referenced: {0}")]
    UnknownElement(String),

    #[error("unknown variable referenced: {0}")]
    UnknownVariable(String),

    #[error("unknown conditional group referenced: {0}")]
    UnknownGroup(String),

    #[error("invalid IR: {0}")]
    InvalidIr(String),

    #[error("internal error: {0}")]
    Internal(String),
}
