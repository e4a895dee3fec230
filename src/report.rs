//! Console output for a run.
//!
//! Diagnostics render as a tree per analyzed file:
//!
//! ```text
//!   lib/Adaptor.js
//!   ├── ✓ get(path, params) line 12
//!   ├── ✗ post(path, data) line 20
//!   │      documented: (path)
//!   │   ⚠ public operation post does not match its documentation (lib/Adaptor.js:20:1)
//!   └── ✓ each(path, operation) line 31
//! ```

use colored::*;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::Span;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::manifest::Manifest;

const BRANCH: &str = "├──";
const LAST_BRANCH: &str = "└──";
const PIPE: &str = "│";

/// Print the run header.
pub fn write_header(adaptor: &Path) {
    println!();
    print!("  ");
    print!("{}", "adaptordoc".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", adaptor.display());
}

/// Print diagnostics to stdout.
pub fn write_diagnostics(diagnostics: &Diagnostics) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = render_diagnostics(&mut out, diagnostics);
}

/// Render diagnostics in recorded order.
///
/// Warnings raised inside a file's tree are drawn under its rail and end
/// with the `file:line:column` they refer to.
pub fn render_diagnostics<W: Write>(out: &mut W, diagnostics: &Diagnostics) -> io::Result<()> {
    let mut section: Option<&str> = None;
    // Whether the current tree continues below the last entry.
    let mut open = false;

    for diagnostic in diagnostics.iter() {
        match diagnostic {
            Diagnostic::Section { title } => {
                writeln!(out)?;
                writeln!(out, "  {}", title.bold())?;
                section = Some(title.as_str());
                open = true;
            }
            Diagnostic::Validation {
                name,
                span,
                stated,
                actual,
                valid,
                is_last,
            } => {
                let glyph = if *is_last { LAST_BRANCH } else { BRANCH };
                let signature = format!("{}({})", name, actual.join(", "));
                let line = format!("line {}", span.line);
                if *valid {
                    writeln!(
                        out,
                        "  {} {} {} {}",
                        glyph.dimmed(),
                        "✓".green(),
                        signature,
                        line.dimmed()
                    )?;
                } else {
                    writeln!(
                        out,
                        "  {} {} {} {}",
                        glyph.dimmed(),
                        "✗".red(),
                        signature.red(),
                        line.dimmed()
                    )?;
                    let rail = if *is_last { " " } else { PIPE };
                    writeln!(
                        out,
                        "  {}      {} {}",
                        rail.dimmed(),
                        "documented:".dimmed(),
                        stated.to_string().yellow()
                    )?;
                }
                open = !*is_last;
            }
            Diagnostic::MultipleDocBlocks {
                name,
                span,
                kept,
                discarded,
            } => {
                // Recorded just before the declaration's own entry.
                let message = format!(
                    "{} has {} leading doc blocks; using the first",
                    name,
                    discarded.len() + 1
                );
                write_warning(out, PIPE, &message, location(section, Some(*span)))?;
                write_block(out, PIPE, "kept", kept)?;
                for block in discarded {
                    write_block(out, PIPE, "discarded", block)?;
                }
            }
            Diagnostic::PublicButInvalid { name, span } => {
                let rail = if open { PIPE } else { " " };
                let message =
                    format!("public operation {} does not match its documentation", name);
                write_warning(out, rail, &message, location(section, *span))?;
            }
            Diagnostic::CommonLibraryUnavailable { path, .. } => {
                writeln!(out)?;
                writeln!(
                    out,
                    "  {}",
                    format!("No shared library at {}", path.display()).dimmed()
                )?;
                open = false;
            }
            Diagnostic::SkippedCommonEntry {
                path,
                entry,
                reason,
            } => {
                let message = format!(
                    "skipped shared-library entry {} in {}: {}",
                    entry,
                    path.display(),
                    reason
                );
                writeln!(out, "  {} {}", "⚠".yellow(), message.yellow())?;
                open = false;
            }
        }
    }
    Ok(())
}

fn location(section: Option<&str>, span: Option<Span>) -> Option<String> {
    match (section, span) {
        (Some(file), Some(span)) => Some(format!("{}:{}", file, span)),
        (None, Some(span)) => Some(span.to_string()),
        (_, None) => None,
    }
}

fn write_warning<W: Write>(
    out: &mut W,
    rail: &str,
    message: &str,
    location: Option<String>,
) -> io::Result<()> {
    write!(out, "  {}   {} {}", rail.dimmed(), "⚠".yellow(), message.yellow())?;
    if let Some(location) = location {
        write!(out, " {}", format!("({})", location).dimmed())?;
    }
    writeln!(out)
}

fn write_block<W: Write>(out: &mut W, rail: &str, label: &str, block: &str) -> io::Result<()> {
    writeln!(out, "  {}       {}", rail.dimmed(), format!("{}:", label).dimmed())?;
    for line in block.lines() {
        writeln!(out, "  {}         {}", rail.dimmed(), line.trim_end().dimmed())?;
    }
    Ok(())
}

/// Print the final status line.
pub fn write_summary(manifest: &Manifest, output: &Path, diagnostics: &Diagnostics) {
    println!();
    print!("  {}", "✓ Done".green());
    print!(
        "  {} operations, {} export groups, {} common",
        manifest.operations.len(),
        manifest.exports.len(),
        manifest.common.len()
    );
    let warnings = diagnostics.warning_count();
    if warnings > 0 {
        print!("  {}", format!("({} warnings)", warnings).yellow());
    }
    println!();
    print!("  {}", "Wrote: ".dimmed());
    println!("{}", output.display());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::StatedParams;

    fn at(line: usize) -> Span {
        Span { line, column: 1 }
    }

    fn render(diagnostics: &Diagnostics) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        render_diagnostics(&mut buf, diagnostics).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_tree_glyphs() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.section("lib/Adaptor.js");
        diagnostics.push(Diagnostic::Validation {
            name: "get".into(),
            span: at(3),
            stated: StatedParams::Documented(vec!["path".into()]),
            actual: vec!["path".into()],
            valid: true,
            is_last: false,
        });
        diagnostics.push(Diagnostic::Validation {
            name: "post".into(),
            span: at(7),
            stated: StatedParams::Undocumented,
            actual: vec!["path".into(), "data".into()],
            valid: false,
            is_last: true,
        });

        let text = render(&diagnostics);
        assert_eq!(
            text,
            "\n  lib/Adaptor.js\n  ├── ✓ get(path) line 3\n  └── ✗ post(path, data) line 7\n         documented: No docs.\n"
        );
    }

    #[test]
    fn test_multiple_doc_blocks_lists_every_block() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.section("lib/Adaptor.js");
        diagnostics.push(Diagnostic::MultipleDocBlocks {
            name: "add".into(),
            span: at(9),
            kept: "/** first */".into(),
            discarded: vec!["/** second */".into()],
        });

        let text = render(&diagnostics);
        assert!(text.contains(
            "  │   ⚠ add has 2 leading doc blocks; using the first (lib/Adaptor.js:9:1)\n"
        ));
        assert!(text.contains("  │         /** first */\n"));
        assert!(text.contains("  │         /** second */\n"));
    }

    #[test]
    fn test_public_but_invalid_warning_stays_in_tree() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.section("lib/Adaptor.js");
        diagnostics.push(Diagnostic::Validation {
            name: "add".into(),
            span: at(4),
            stated: StatedParams::Documented(vec!["a".into()]),
            actual: vec!["a".into(), "b".into()],
            valid: false,
            is_last: false,
        });
        diagnostics.push(Diagnostic::PublicButInvalid {
            name: "add".into(),
            span: Some(at(4)),
        });

        let text = render(&diagnostics);
        assert!(text.ends_with(
            "  │   ⚠ public operation add does not match its documentation (lib/Adaptor.js:4:1)\n"
        ));
    }

    #[test]
    fn test_public_but_invalid_after_closed_tree() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.section("lib/Utils.js");
        diagnostics.push(Diagnostic::Validation {
            name: "helper".into(),
            span: at(2),
            stated: StatedParams::Undocumented,
            actual: vec!["x".into()],
            valid: false,
            is_last: true,
        });
        diagnostics.push(Diagnostic::PublicButInvalid {
            name: "helper".into(),
            span: Some(at(2)),
        });

        let text = render(&diagnostics);
        assert!(text.ends_with(
            "      ⚠ public operation helper does not match its documentation (lib/Utils.js:2:1)\n"
        ));
    }
}
