//! Documented-versus-actual parameter validation.

use std::fmt;

use crate::analysis::Span;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::doctags::DocBlock;

/// Rendering of [`StatedParams::Undocumented`].
pub const NO_DOCS: &str = "No docs.";

/// The parameters a doc block claims a declaration takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatedParams {
    /// No doc block at all. Distinct from a block with zero `@param` tags.
    Undocumented,
    /// `@param` names in order.
    Documented(Vec<String>),
}

impl StatedParams {
    pub fn from_docs(docs: Option<&DocBlock>) -> Self {
        match docs {
            Some(docs) => StatedParams::Documented(docs.param_names()),
            None => StatedParams::Undocumented,
        }
    }

    /// Exact, order- and case-sensitive comparison.
    pub fn matches(&self, actual: &[String]) -> bool {
        match self {
            StatedParams::Documented(names) => names.as_slice() == actual,
            StatedParams::Undocumented => false,
        }
    }
}

impl fmt::Display for StatedParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatedParams::Undocumented => f.write_str(NO_DOCS),
            StatedParams::Documented(names) => write!(f, "({})", names.join(", ")),
        }
    }
}

/// Check a declaration's documentation against its parameter list.
///
/// Records one [`Diagnostic::Validation`] per call. `is_last` marks the final
/// declaration of its group and only affects rendering.
pub fn validate(
    name: &str,
    span: Span,
    docs: Option<&DocBlock>,
    actual: &[String],
    is_last: bool,
    diagnostics: &mut Diagnostics,
) -> bool {
    let stated = StatedParams::from_docs(docs);
    let valid = stated.matches(actual);

    diagnostics.push(Diagnostic::Validation {
        name: name.to_string(),
        span,
        stated,
        actual: actual.to_vec(),
        valid,
        is_last,
    });

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctags::{parse, ParseOptions};

    const AT: Span = Span { line: 1, column: 1 };

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_is_valid() {
        let mut diagnostics = Diagnostics::default();
        let docs = parse("/** @param a\n * @param b */", ParseOptions::lenient());
        assert!(validate("add", AT, Some(&docs), &params(&["a", "b"]), true, &mut diagnostics));
    }

    #[test]
    fn test_order_and_case_matter() {
        let mut diagnostics = Diagnostics::default();
        let docs = parse("/** @param b\n * @param a */", ParseOptions::lenient());
        assert!(!validate("f", AT, Some(&docs), &params(&["a", "b"]), false, &mut diagnostics));

        let docs = parse("/** @param A */", ParseOptions::lenient());
        assert!(!validate("g", AT, Some(&docs), &params(&["a"]), true, &mut diagnostics));
    }

    #[test]
    fn test_missing_param_doc_is_invalid() {
        let mut diagnostics = Diagnostics::default();
        let docs = parse("/** @param a */", ParseOptions::lenient());
        assert!(!validate("add", AT, Some(&docs), &params(&["a", "b"]), true, &mut diagnostics));
    }

    #[test]
    fn test_undocumented_differs_from_zero_params() {
        let mut diagnostics = Diagnostics::default();
        assert!(!validate("now", AT, None, &[], true, &mut diagnostics));

        let docs = parse("/** Current time. */", ParseOptions::lenient());
        assert!(validate("now", AT, Some(&docs), &[], true, &mut diagnostics));

        assert_eq!(StatedParams::from_docs(None).to_string(), NO_DOCS);
        assert_eq!(StatedParams::from_docs(Some(&docs)).to_string(), "()");
    }

    #[test]
    fn test_records_one_diagnostic_per_call() {
        let mut diagnostics = Diagnostics::default();
        validate("a", AT, None, &params(&["x"]), false, &mut diagnostics);
        validate("b", AT, None, &params(&["y"]), true, &mut diagnostics);

        let flags: Vec<(bool, bool)> = diagnostics
            .entries()
            .iter()
            .map(|d| match d {
                Diagnostic::Validation { valid, is_last, .. } => (*valid, *is_last),
                other => panic!("unexpected diagnostic: {:?}", other),
            })
            .collect();
        assert_eq!(flags, vec![(false, false), (false, true)]);
    }
}
