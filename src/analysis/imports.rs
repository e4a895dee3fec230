//! Local import discovery.

use std::path::{Component, Path, PathBuf};

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor};

use super::classify::unquote;
use crate::error::Result;
use crate::parser::ParsedModule;

/// Tree-sitter query for module imports.
///
/// Captures:
/// - `require_source`: `var x = require("./x")`
/// - `wrapped_source`: `var x = _interopRequireDefault(require("./x"))`
/// - `import_source`: `import x from "./x"`
const IMPORT_QUERY: &str = r#"
(variable_declarator
  value: (call_expression
    function: (identifier) @require_func (#eq? @require_func "require")
    arguments: (arguments . (string) @require_source))) @require

(variable_declarator
  value: (call_expression
    arguments: (arguments .
      (call_expression
        function: (identifier) @wrapped_func (#eq? @wrapped_func "require")
        arguments: (arguments . (string) @wrapped_source))))) @wrapped_require

(import_statement
  source: (string) @import_source) @import
"#;

/// A sibling file the module pulls in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImport {
    /// The specifier as written (`./Utils`).
    pub specifier: String,
    /// Resolved file path.
    pub path: PathBuf,
}

/// Whether a specifier points into the local directory tree.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Find relative imports made at the module's top level.
///
/// Paths resolve against the module's directory with `.{extension}` appended
/// when missing. Results are in source order without duplicates.
pub fn discover_local_imports(
    parsed: &ParsedModule,
    language: &Language,
    extension: &str,
) -> Result<Vec<LocalImport>> {
    let query = Query::new(language, IMPORT_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

    let mut found: Vec<(usize, &str)> = Vec::new();

    while let Some(m) = matches.next() {
        let mut source = None;
        let mut anchor = None;

        for capture in m.captures {
            match query.capture_names()[capture.index as usize] {
                "require_source" | "wrapped_source" | "import_source" => {
                    source = Some(capture.node)
                }
                "require" | "wrapped_require" | "import" => anchor = Some(capture.node),
                _ => {}
            }
        }

        let (Some(source), Some(anchor)) = (source, anchor) else {
            continue;
        };
        if !is_top_level(anchor) {
            continue;
        }

        let specifier = unquote(parsed.node_text(source));
        if is_relative(specifier) {
            found.push((anchor.start_byte(), specifier));
        }
    }
    found.sort_by_key(|(start, _)| *start);

    let mut imports: Vec<LocalImport> = Vec::new();
    for (_, specifier) in found {
        let path = resolve(parsed.dir(), specifier, extension);
        if imports.iter().any(|i| i.path == path) {
            continue;
        }
        imports.push(LocalImport {
            specifier: specifier.to_string(),
            path,
        });
    }

    Ok(imports)
}

/// Declarators count when their declaration is a program-level statement
/// (optionally under `export`).
fn is_top_level(anchor: Node) -> bool {
    let statement = if anchor.kind() == "variable_declarator" {
        match anchor.parent() {
            Some(declaration) => declaration,
            None => return false,
        }
    } else {
        anchor
    };

    match statement.parent() {
        Some(parent) if parent.kind() == "program" => true,
        Some(parent) if parent.kind() == "export_statement" => parent
            .parent()
            .map(|p| p.kind() == "program")
            .unwrap_or(false),
        _ => false,
    }
}

/// Join `specifier` onto `dir`, append the extension, drop `.` components.
pub fn resolve(dir: &Path, specifier: &str, extension: &str) -> PathBuf {
    let suffix = format!(".{}", extension);
    let mut file = specifier.to_string();
    if !file.ends_with(&suffix) {
        file.push_str(&suffix);
    }

    let mut resolved = PathBuf::new();
    for component in dir.join(file).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(resolved.components().last(), Some(Component::Normal(_)));
                if last_is_normal {
                    resolved.pop();
                } else {
                    resolved.push("..");
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}
