//! JSDoc-style documentation tag parser.
//!
//! Turns a raw block comment into a [`DocBlock`]: a free-text description
//! followed by `@tag` entries. Only the tag shapes adaptor documentation
//! uses are understood in detail (`@param`, `@returns`, ...); anything else
//! is kept as a title plus description.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A tag starts on a line whose first non-space character is `@`.
static TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@([A-Za-z][\w-]*)\s*(.*)$").expect("tag line pattern is valid")
});

/// Tags of the form `@tag {type} name description`.
const NAMED_TAGS: &[&str] = &["param", "arg", "argument", "property", "prop"];

/// Tags of the form `@tag {type} description`.
const TYPED_TAGS: &[&str] = &["returns", "return", "throws", "exception", "type"];

/// Parser flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Strip `/**`, `*/` and the leading `*` of each line before tokenizing.
    pub unwrap: bool,
    /// Accept non-standard syntax: `[name]` / `[name=default]` optional
    /// parameters and unterminated `{type` expressions.
    pub sloppy: bool,
}

impl ParseOptions {
    /// The options the manifest pipeline uses.
    pub fn lenient() -> Self {
        Self {
            unwrap: true,
            sloppy: true,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

/// A parsed documentation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocBlock {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A single `@tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_expr: Option<TypeExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A tag's type.
///
/// Parsed blocks always carry the braced source text. Manifests written by
/// doctrine-style generators store a structured type instead
/// (`{"type": "NameExpression", "name": "string"}`), which is kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Text(String),
    Structured(serde_json::Value),
}

impl TypeExpr {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypeExpr::Text(text) => Some(text),
            TypeExpr::Structured(_) => None,
        }
    }
}

impl Tag {
    /// The type as written between braces, when it was parsed from source.
    pub fn type_text(&self) -> Option<&str> {
        self.type_expr.as_ref().and_then(TypeExpr::as_text)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl DocBlock {
    /// Whether any tag has the given title.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.iter().any(|t| t.title == title)
    }

    /// Names of `@param` tags in declaration order.
    pub fn param_names(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|t| t.title == "param")
            .filter_map(|t| t.name.clone())
            .collect()
    }
}

/// Parse a raw comment into a [`DocBlock`].
///
/// Never fails: malformed tags are dropped and the rest of the block is kept.
pub fn parse(comment: &str, options: ParseOptions) -> DocBlock {
    let text = if options.unwrap {
        unwrap(comment)
    } else {
        comment.to_string()
    };

    let mut description: Vec<&str> = Vec::new();
    let mut pending: Option<(String, Vec<&str>)> = None;
    let mut tags = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if let Some(caps) = TAG_LINE.captures(line) {
            if let Some((title, body)) = pending.take() {
                tags.extend(build_tag(title, &body.join("\n"), options.sloppy));
            }
            let rest = caps.get(2).map_or("", |m| m.as_str());
            pending = Some((caps[1].to_string(), vec![rest]));
        } else if let Some((_, body)) = pending.as_mut() {
            body.push(line);
        } else {
            description.push(line);
        }
    }
    if let Some((title, body)) = pending.take() {
        tags.extend(build_tag(title, &body.join("\n"), options.sloppy));
    }

    DocBlock {
        description: description.join("\n").trim().to_string(),
        tags,
    }
}

/// Strip comment delimiters and leading `*` decoration.
pub fn unwrap(comment: &str) -> String {
    let mut body = comment.trim();
    body = body
        .strip_prefix("/**")
        .or_else(|| body.strip_prefix("/*"))
        .unwrap_or(body);
    body = body.strip_suffix("*/").unwrap_or(body);

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();

    lines.join("\n").trim().to_string()
}

fn build_tag(title: String, body: &str, sloppy: bool) -> Option<Tag> {
    let mut rest = body.trim();
    let mut type_expr = None;

    let typed = NAMED_TAGS.contains(&title.as_str()) || TYPED_TAGS.contains(&title.as_str());
    if typed && rest.starts_with('{') {
        match split_braced(rest) {
            Some((ty, after)) => {
                type_expr = Some(TypeExpr::Text(ty.trim().to_string()));
                rest = after.trim_start();
            }
            None if sloppy => {
                type_expr = Some(TypeExpr::Text(rest.trim_start_matches('{').trim().to_string()));
                rest = "";
            }
            None => return None,
        }
    }

    let mut tag = Tag {
        title,
        description: None,
        type_expr,
        name: None,
        optional: false,
        default: None,
    };

    if NAMED_TAGS.contains(&tag.title.as_str()) {
        let (name, after) = split_name(rest, sloppy)?;
        tag.optional = name.optional;
        tag.default = name.default;
        tag.name = Some(name.name);
        rest = after.trim_start();
        rest = rest.strip_prefix('-').map(str::trim_start).unwrap_or(rest);
    }

    let rest = rest.trim();
    if !rest.is_empty() {
        tag.description = Some(rest.to_string());
    }
    Some(tag)
}

/// Split `{type} rest` at the brace matching the opening one.
fn split_braced(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

struct TagName {
    name: String,
    optional: bool,
    default: Option<String>,
}

fn split_name(text: &str, sloppy: bool) -> Option<(TagName, &str)> {
    if let Some(inner) = text.strip_prefix('[') {
        if !sloppy {
            return None;
        }
        let mut depth = 1usize;
        let close = inner.char_indices().find_map(|(i, c)| {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            None
        })?;
        let (spec, after) = (&inner[..close], &inner[close + 1..]);
        let (name, default) = match spec.split_once('=') {
            Some((n, d)) => (n.trim(), Some(d.trim().to_string())),
            None => (spec.trim(), None),
        };
        if name.is_empty() {
            return None;
        }
        return Some((
            TagName {
                name: name.to_string(),
                optional: true,
                default,
            },
            after,
        ));
    }

    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let name = &text[..end];
    if name.is_empty() || name.starts_with('-') {
        return None;
    }
    Some((
        TagName {
            name: name.to_string(),
            optional: false,
            default: None,
        },
        &text[end..],
    ))
}
