//! Non-fatal findings collected while building a manifest.
//!
//! Stages push [`Diagnostic`] values instead of printing. The collector is
//! returned alongside the result and rendered by [`crate::report`].

use std::path::PathBuf;

use crate::analysis::Span;
use crate::validate::StatedParams;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Groups the diagnostics that follow (one per analyzed file).
    Section { title: String },
    /// Outcome of validating one declaration.
    Validation {
        name: String,
        span: Span,
        stated: StatedParams,
        actual: Vec<String>,
        valid: bool,
        /// Final declaration of its group.
        is_last: bool,
    },
    /// Several doc blocks above one declaration; `kept` is used.
    MultipleDocBlocks {
        name: String,
        span: Span,
        kept: String,
        discarded: Vec<String>,
    },
    /// Tagged `@public` but its documentation does not match.
    PublicButInvalid { name: String, span: Option<Span> },
    /// Shared-library manifest missing or unreadable.
    CommonLibraryUnavailable { path: PathBuf, reason: String },
    /// One shared-library entry could not be read and was dropped.
    SkippedCommonEntry {
        path: PathBuf,
        entry: String,
        reason: String,
    },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::Validation { valid: false, .. }
            | Diagnostic::MultipleDocBlocks { .. }
            | Diagnostic::PublicButInvalid { .. }
            | Diagnostic::SkippedCommonEntry { .. } => Level::Warning,
            _ => Level::Info,
        }
    }
}

/// Ordered diagnostics collector.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn section(&mut self, title: impl Into<String>) {
        self.push(Diagnostic::Section {
            title: title.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of warning-level entries.
    pub fn warning_count(&self) -> usize {
        self.iter().filter(|d| d.level() == Level::Warning).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let at = Span { line: 1, column: 1 };
        let invalid = Diagnostic::Validation {
            name: "f".into(),
            span: at,
            stated: StatedParams::Undocumented,
            actual: vec![],
            valid: false,
            is_last: true,
        };
        let valid = Diagnostic::Validation {
            name: "g".into(),
            span: at,
            stated: StatedParams::Documented(vec![]),
            actual: vec![],
            valid: true,
            is_last: true,
        };
        assert_eq!(invalid.level(), Level::Warning);
        assert_eq!(valid.level(), Level::Info);

        let mut diagnostics = Diagnostics::default();
        diagnostics.section("lib/Adaptor.js");
        diagnostics.push(invalid);
        diagnostics.push(valid);
        diagnostics.push(Diagnostic::PublicButInvalid {
            name: "f".into(),
            span: Some(at),
        });
        assert_eq!(diagnostics.len(), 4);
        assert_eq!(diagnostics.warning_count(), 2);
    }
}
