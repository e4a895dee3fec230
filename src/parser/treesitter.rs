//! Tree-sitter based module parser.

use std::path::Path;

use tree_sitter::{Language, Node, Parser as TsParser};
use tracing::debug;

use super::ParsedModule;
use crate::error::{Error, Result};

/// Parser for adaptor modules.
///
/// Holds the grammar only; a fresh `tree_sitter::Parser` is created per call
/// since it is not `Sync`.
#[derive(Clone)]
pub struct ModuleParser {
    language: Language,
}

impl ModuleParser {
    /// Create a parser for JavaScript modules.
    pub fn javascript() -> Self {
        Self {
            language: tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// The grammar this parser uses. Queries must be compiled against it.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Parse source text.
    ///
    /// A tree containing ERROR or MISSING nodes is rejected with the position
    /// of the first offending node.
    pub fn parse(&self, path: &Path, source: Vec<u8>) -> Result<ParsedModule> {
        let mut parser = TsParser::new();
        parser.set_language(&self.language)?;

        let tree = parser.parse(&source, None).ok_or_else(|| Error::Syntax {
            path: path.to_path_buf(),
            line: 1,
            column: 1,
        })?;

        if let Some(node) = first_error(tree.root_node()) {
            let pos = node.start_position();
            return Err(Error::Syntax {
                path: path.to_path_buf(),
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        debug!(path = %path.display(), bytes = source.len(), "parsed module");
        Ok(ParsedModule {
            tree,
            source,
            path: path.to_path_buf(),
        })
    }

    /// Read and parse a file.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedModule> {
        let source = std::fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, source)
    }
}

impl Default for ModuleParser {
    fn default() -> Self {
        Self::javascript()
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    Some(node)
}
