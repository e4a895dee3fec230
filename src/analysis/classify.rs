//! Module classification: which top-level statements are operations.
//!
//! Adaptor modules are usually transpiled CommonJS, so operations show up in
//! a handful of conventional shapes:
//!
//! ```text
//! function get(path, params) { ... }                   // function
//! var each = exports.each = curry(function (a, b) {}); // variable-operation
//! Object.defineProperty(exports, "field", {            // external reference
//!   enumerable: true,
//!   get: function () { return _common.field; }
//! });
//! ```
//!
//! Everything else is ignored. Unrecognized shapes are never an error.

use tree_sitter::Node;

use super::comments::leading_comments;
use super::signature::{function_params, is_function};
use super::{Declaration, DeclarationKind, ModuleFacts, Span};
use crate::parser::ParsedModule;

/// Naming rules for what counts as exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Names starting with this prefix are private. Empty disables the rule.
    pub private_prefix: String,
    /// Function names that are never operations (the runtime entry point).
    pub reserved_names: Vec<String>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            private_prefix: "_".to_string(),
            reserved_names: vec!["execute".to_string()],
        }
    }
}

impl ClassifyOptions {
    pub fn is_private(&self, name: &str) -> bool {
        !self.private_prefix.is_empty() && name.starts_with(&self.private_prefix)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.iter().any(|r| r == name)
    }
}

/// A recognized operation shape.
#[derive(Debug, Clone, Copy)]
pub enum OperationShape<'t> {
    /// `function name(...) {}`
    FunctionDeclaration { name: Node<'t>, function: Node<'t> },
    /// `var name = [target = ]wrapper(function (...) {}, ...)`
    WrappedCall { name: Node<'t>, function: Node<'t> },
    /// Anything else.
    Ignored,
}

impl<'t> OperationShape<'t> {
    /// Shape of a function declaration statement.
    pub fn of_function(node: Node<'t>) -> Self {
        match node.child_by_field_name("name") {
            Some(name) => OperationShape::FunctionDeclaration {
                name,
                function: node,
            },
            None => OperationShape::Ignored,
        }
    }

    /// Shape of a `variable_declarator`.
    ///
    /// The initializer may be a chain of assignments (`a = exports.a = ...`);
    /// the last right-hand side must be a call whose first argument is a
    /// function literal.
    pub fn of_declarator(declarator: Node<'t>) -> Self {
        let Some(name) = declarator.child_by_field_name("name") else {
            return OperationShape::Ignored;
        };
        if name.kind() != "identifier" {
            return OperationShape::Ignored;
        }
        match declarator
            .child_by_field_name("value")
            .and_then(wrapped_function)
        {
            Some(function) => OperationShape::WrappedCall { name, function },
            None => OperationShape::Ignored,
        }
    }
}

/// Follow an initializer to the function literal passed to the wrapper call.
fn wrapped_function(value: Node) -> Option<Node> {
    let mut current = value;
    loop {
        match current.kind() {
            "assignment_expression" => current = current.child_by_field_name("right")?,
            "parenthesized_expression" => current = first_named(current)?,
            "call_expression" => break,
            _ => return None,
        }
    }

    let arguments = current.child_by_field_name("arguments")?;
    if arguments.kind() != "arguments" {
        return None;
    }
    let first = first_named(arguments)?;
    is_function(first).then_some(first)
}

/// First named child that is not a comment.
fn first_named(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment");
    found
}

/// Named children that are not comments.
fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Partition a module's top-level statements.
pub fn classify(parsed: &ParsedModule, options: &ClassifyOptions) -> ModuleFacts {
    let mut facts = ModuleFacts {
        path: parsed.path.clone(),
        ..Default::default()
    };

    for statement in parsed.statements() {
        let inner = exported_declaration(statement);
        match inner.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let OperationShape::FunctionDeclaration { name, function } =
                    OperationShape::of_function(inner)
                {
                    let name = parsed.node_text(name);
                    if options.is_private(name) || options.is_reserved(name) {
                        continue;
                    }
                    facts.functions.push(Declaration {
                        name: name.to_string(),
                        kind: DeclarationKind::Function,
                        params: function_params(parsed, function),
                        leading_comments: leading_comments(parsed, statement),
                        span: Span::from_node(statement),
                    });
                }
            }
            "variable_declaration" | "lexical_declaration" => {
                // The statement's comments document its first declarator only.
                let mut comments = Some(leading_comments(parsed, statement));
                for declarator in named_children(inner) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let leading = comments.take().unwrap_or_default();
                    if let OperationShape::WrappedCall { name, function } =
                        OperationShape::of_declarator(declarator)
                    {
                        let name = parsed.node_text(name);
                        if options.is_private(name) {
                            continue;
                        }
                        facts.variable_operations.push(Declaration {
                            name: name.to_string(),
                            kind: DeclarationKind::VariableOperation,
                            params: function_params(parsed, function),
                            leading_comments: leading,
                            span: Span::from_node(declarator),
                        });
                    }
                }
            }
            "expression_statement" => {
                if let Some(reference) = external_reference(parsed, inner) {
                    facts.external_references.push(reference);
                }
            }
            _ => {}
        }
    }

    facts
}

/// `export function f() {}` and friends classify as their declaration.
fn exported_declaration(statement: Node) -> Node {
    if statement.kind() == "export_statement" {
        if let Some(declaration) = statement.child_by_field_name("declaration") {
            return declaration;
        }
    }
    statement
}

/// `X(target, "name", { enumerable: ..., ... })` yields `name`.
fn external_reference(parsed: &ParsedModule, statement: Node) -> Option<String> {
    let call = first_named(statement)?;
    if call.kind() != "call_expression" {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    if arguments.kind() != "arguments" {
        return None;
    }

    let args = named_children(arguments);
    if args.len() < 3 || args[2].kind() != "object" {
        return None;
    }

    let first_property = first_named(args[2])?;
    let key = match first_property.kind() {
        "pair" => first_property.child_by_field_name("key")?,
        "method_definition" => first_property.child_by_field_name("name")?,
        "shorthand_property_identifier" => first_property,
        _ => return None,
    };
    if unquote(parsed.node_text(key)) != "enumerable" {
        return None;
    }

    if args[1].kind() != "string" {
        return None;
    }
    Some(unquote(parsed.node_text(args[1])).to_string())
}

/// Strip matching quotes from a string literal.
pub(crate) fn unquote(text: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ModuleParser;
    use std::path::Path;

    fn facts_for(source: &str) -> ModuleFacts {
        let parsed = ModuleParser::javascript()
            .parse(Path::new("lib/Adaptor.js"), source.as_bytes().to_vec())
            .unwrap();
        classify(&parsed, &ClassifyOptions::default())
    }

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_functions_exclude_private_and_reserved() {
        let facts = facts_for(
            r#"
function execute() {}
function _toConsumableArray(arr) {}
function get(path, params) {}
export function post(path) {}
"#,
        );
        assert_eq!(names(&facts.functions), vec!["get", "post"]);
        assert_eq!(facts.functions[0].params, vec!["path", "params"]);
        assert_eq!(facts.functions[0].kind, DeclarationKind::Function);
    }

    #[test]
    fn test_variable_operations_wrapper_shapes() {
        let facts = facts_for(
            r#"
var each = exports.each = (0, _curry2.default)(function (path, operation) {});
var _hidden = exports._hidden = curry(function (x) {});
const merge = curry((path, data) => data);
var plain = 42;
var notWrapped = exports.notWrapped = function (a) {};
var noArgs = exports.noArgs = curry();
var firstArgNotFn = curry(handler, function (a) {});
let uninitialized;
"#,
        );
        assert_eq!(names(&facts.variable_operations), vec!["each", "merge"]);
        assert_eq!(facts.variable_operations[0].params, vec!["path", "operation"]);
        assert_eq!(facts.variable_operations[1].params, vec!["path", "data"]);
        assert_eq!(
            facts.variable_operations[0].kind,
            DeclarationKind::VariableOperation
        );
    }

    #[test]
    fn test_execute_is_only_reserved_for_functions() {
        let facts = facts_for("var execute = exports.execute = wrap(function (state) {});\n");
        assert_eq!(names(&facts.variable_operations), vec!["execute"]);
    }

    #[test]
    fn test_comments_attach_to_first_declarator() {
        let facts = facts_for(
            "/** @param a */\nvar one = w(function (a) {}), two = w(function (b) {});\n",
        );
        assert_eq!(facts.variable_operations.len(), 2);
        assert_eq!(facts.variable_operations[0].leading_comments.len(), 1);
        assert!(facts.variable_operations[1].leading_comments.is_empty());
    }

    #[test]
    fn test_external_references() {
        let facts = facts_for(
            r#"
Object.defineProperty(exports, "field", {
  enumerable: true,
  get: function get() { return _languageCommon.field; }
});
Object.defineProperty(exports, '__esModule', { value: true });
Object.defineProperty(exports, "fields", { enumerable: true, get: function () {} });
Object.defineProperty(exports, name, { enumerable: true });
console.log("a", "b");
"#,
        );
        assert_eq!(facts.external_references, vec!["field", "fields"]);
    }

    #[test]
    fn test_leading_comments_recorded() {
        let facts = facts_for("/** one */\n/** two */\nfunction f(a) {}\n");
        assert_eq!(facts.functions[0].leading_comments.len(), 2);
        assert_eq!(facts.functions[0].span.line, 3);
    }

    #[test]
    fn test_nested_functions_ignored() {
        let facts = facts_for("function outer() { function inner(x) {} }\n");
        assert_eq!(names(&facts.functions), vec!["outer"]);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"field\""), "field");
        assert_eq!(unquote("'field'"), "field");
        assert_eq!(unquote("field"), "field");
        assert_eq!(unquote("\""), "\"");
    }
}
