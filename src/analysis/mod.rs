//! AST-backed module analysis.
//!
//! Turns a parsed adaptor module into "facts": the exported operation
//! declarations, their parameters and leading comments, the names the module
//! re-exposes from elsewhere, and the sibling files it imports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────────┐
//! │ ParsedModule │────▶│ classify     │────▶│ ModuleFacts        │
//! └──────────────┘     │  signature   │     │ (functions,        │
//!         │            │  comments    │     │  variable ops,     │
//!         │            └──────────────┘     │  external refs)    │
//!         │                                 └────────────────────┘
//!         │            ┌──────────────┐     ┌────────────────────┐
//!         └───────────▶│ imports      │────▶│ LocalImport list   │
//!                      └──────────────┘     └────────────────────┘
//! ```

pub mod classify;
pub mod comments;
mod facts;
pub mod imports;
pub mod signature;

pub use classify::{classify, ClassifyOptions, OperationShape};
pub use comments::{extract_docs, leading_comments};
pub use facts::{Comment, CommentKind, Declaration, DeclarationKind, ModuleFacts, Span};
pub use imports::{discover_local_imports, LocalImport};
