//! Parameter list extraction for function-like nodes.

use tree_sitter::Node;

use crate::parser::ParsedModule;

/// Node kinds that carry a parameter list.
pub const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
];

/// Whether `node` is a function literal or declaration.
pub fn is_function(node: Node) -> bool {
    FUNCTION_KINDS.contains(&node.kind())
}

/// Ordered parameter names of a function-like node.
///
/// Arrow functions with a single bare parameter (`x => x`) are handled too.
pub fn function_params(parsed: &ParsedModule, function: Node) -> Vec<String> {
    if let Some(single) = function.child_by_field_name("parameter") {
        return vec![param_name(parsed, single)];
    }

    let Some(params) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| param_name(parsed, n))
        .collect()
}

/// Name of a single formal parameter.
///
/// `a = 1` yields `a`, `...rest` yields `rest`; destructuring patterns have no
/// single name and are reported as written.
fn param_name(parsed: &ParsedModule, node: Node) -> String {
    match node.kind() {
        "identifier" => parsed.node_text(node).to_string(),
        "assignment_pattern" => match node.child_by_field_name("left") {
            Some(left) => param_name(parsed, left),
            None => parsed.node_text(node).to_string(),
        },
        "rest_pattern" => match node.named_child(0) {
            Some(inner) => param_name(parsed, inner),
            None => parsed.node_text(node).to_string(),
        },
        _ => parsed.node_text(node).to_string(),
    }
}
