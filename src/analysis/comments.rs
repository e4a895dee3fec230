//! Leading comment collection and doc block extraction.

use tree_sitter::Node;

use super::{Comment, Declaration};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::doctags::{self, DocBlock, ParseOptions};
use crate::parser::ParsedModule;

/// Comments directly above `node`, in source order.
///
/// Walks previous siblings while they are comments. The first comment after
/// the preceding statement belongs to that statement when it starts on the
/// line where the statement ends, and is left out.
pub fn leading_comments(parsed: &ParsedModule, node: Node) -> Vec<Comment> {
    let mut found = Vec::new();
    let mut previous_end_row = None;
    let mut current = node.prev_sibling();

    while let Some(sibling) = current {
        if sibling.kind() != "comment" {
            previous_end_row = Some(sibling.end_position().row);
            break;
        }
        found.push(sibling);
        current = sibling.prev_sibling();
    }

    found.reverse();
    let trailing = found
        .first()
        .is_some_and(|c| Some(c.start_position().row) == previous_end_row);

    found
        .into_iter()
        .skip(usize::from(trailing))
        .map(|c| Comment::new(parsed.node_text(c)))
        .collect()
}

/// Parse the declaration's doc block.
///
/// Only block comments count. With several, the first wins and a
/// [`Diagnostic::MultipleDocBlocks`] lists every block.
pub fn extract_docs(declaration: &Declaration, diagnostics: &mut Diagnostics) -> Option<DocBlock> {
    let mut blocks = declaration
        .leading_comments
        .iter()
        .filter(|c| c.is_block())
        .map(|c| c.text.clone());

    let first = blocks.next()?;
    let discarded: Vec<String> = blocks.collect();
    if !discarded.is_empty() {
        diagnostics.push(Diagnostic::MultipleDocBlocks {
            name: declaration.name.clone(),
            span: declaration.span,
            kept: first.clone(),
            discarded,
        });
    }

    Some(doctags::parse(&first, ParseOptions::lenient()))
}
