//! Parsing front end for adaptor modules.
//!
//! This module provides:
//! - `ParsedModule`: a tree-sitter tree plus the source it was built from
//! - `ModuleParser`: the JavaScript parser used for every module in a run

use std::path::{Path, PathBuf};

mod treesitter;

pub use treesitter::ModuleParser;

/// A parsed module: the tree, the source bytes and the file path.
///
/// Created per parse call and dropped once the module has been classified.
pub struct ParsedModule {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for diagnostics and import resolution).
    pub path: PathBuf,
}

impl ParsedModule {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Top-level statements in source order, comments excluded.
    pub fn statements(&self) -> Vec<tree_sitter::Node<'_>> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect()
    }

    /// Directory containing the module. Relative imports resolve against it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}
