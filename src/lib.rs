//! adaptordoc - manifest generator for adaptor modules.
//!
//! An adaptor is a small JavaScript module exposing "operations" to an
//! integration platform. adaptordoc reads one statically, lists its exported
//! operations with their parameters and doc blocks, checks every doc block's
//! `@param` tags against the real signature, and writes a JSON manifest of the
//! operations tagged `@public`, including ones re-exported from sibling files
//! and from the shared common library.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter front end (`ParsedModule`)
//! - `analysis`: classification of top-level statements into operations,
//!   signatures, leading comments and local imports
//! - `doctags`: JSDoc-style tag parser
//! - `validate`: documented-versus-actual parameter check
//! - `pipeline`: the end-to-end run, including cross-file resolution
//! - `manifest`: output model and JSON I/O
//! - `diagnostics` / `report`: non-fatal findings and their console rendering
//! - `config` / `cli`: YAML configuration and command-line surface

pub mod analysis;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod doctags;
pub mod error;
pub mod manifest;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod validate;

pub use analysis::{classify, ClassifyOptions, Declaration, DeclarationKind, ModuleFacts};
pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use doctags::{DocBlock, Tag, TypeExpr};
pub use error::{Error, Result};
pub use manifest::{Manifest, Operation};
pub use parser::{ModuleParser, ParsedModule};
pub use pipeline::Pipeline;
pub use validate::{validate, StatedParams};
