//! Fact structures extracted from a parsed module.

use std::fmt;
use std::path::PathBuf;

/// Source position of a declaration (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start line (1-indexed).
    pub line: usize,
    /// Start column (1-indexed).
    pub column: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            line: start.row + 1, // tree-sitter is 0-indexed
            column: start.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Kind of operation declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `function name(...) {}`
    Function,
    /// `var name = wrapper(function (...) {})`
    VariableOperation,
}

/// Block (`/* */`) or line (`//`) comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Block,
    Line,
}

/// A raw comment, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
}

impl Comment {
    /// Classify comment text by its opening delimiter.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = if text.starts_with("/*") {
            CommentKind::Block
        } else {
            CommentKind::Line
        };
        Self { kind, text }
    }

    pub fn is_block(&self) -> bool {
        self.kind == CommentKind::Block
    }
}

/// An exported operation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The bound identifier.
    pub name: String,
    /// The kind of declaration.
    pub kind: DeclarationKind,
    /// Formal parameter names in declaration order.
    pub params: Vec<String>,
    /// Comments directly above the declaration, in source order.
    pub leading_comments: Vec<Comment>,
    /// Where the declaration starts.
    pub span: Span,
}

/// Everything the classifier learns about one module.
#[derive(Debug, Clone, Default)]
pub struct ModuleFacts {
    /// File path.
    pub path: PathBuf,
    /// Exported function declarations, in source order.
    pub functions: Vec<Declaration>,
    /// Exported variable-bound operations, in source order.
    pub variable_operations: Vec<Declaration>,
    /// Names re-exposed as enumerable properties, in source order.
    pub external_references: Vec<String>,
}

impl ModuleFacts {
    /// Whether `name` is re-exposed by this module.
    pub fn is_external_reference(&self, name: &str) -> bool {
        self.external_references.iter().any(|r| r == name)
    }

    /// Declaration groups in validation order: functions, then variables.
    pub fn groups(&self) -> [&[Declaration]; 2] {
        [&self.functions, &self.variable_operations]
    }
}
