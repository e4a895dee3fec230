//! The manifest pipeline.
//!
//! ```text
//! adaptor ─▶ parse ─▶ classify ─▶ validate ─▶ filter_public ─▶ operations
//!              │
//!              ├─▶ local imports ─▶ (same stages, by external ref) ─▶ exports
//!              └─▶ shared-library manifest ─▶ (by external ref) ───▶ common
//! ```
//!
//! Everything runs sequentially in that order, so diagnostics come out in
//! declaration order.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::analysis::{
    classify, discover_local_imports, extract_docs, LocalImport, ModuleFacts,
};
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::manifest::{self, Manifest, Operation};
use crate::parser::ModuleParser;
use crate::validate::validate;

/// Pipeline state for one run.
pub struct Pipeline {
    parser: ModuleParser,
    config: Config,
    diagnostics: Diagnostics,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            parser: ModuleParser::javascript(),
            config,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Diagnostics recorded so far. Still populated after a failed run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Build the manifest for `adaptor`.
    pub fn run(&mut self, adaptor: &Path) -> Result<Manifest> {
        let parsed = self.parser.parse_file(adaptor)?;
        let facts = classify(&parsed, &self.config.classify_options());
        let imports = discover_local_imports(
            &parsed,
            self.parser.language(),
            &self.config.source_extension,
        )?;
        info!(
            path = %adaptor.display(),
            functions = facts.functions.len(),
            variable_operations = facts.variable_operations.len(),
            external_references = facts.external_references.len(),
            imports = imports.len(),
            "classified module"
        );

        self.diagnostics.section(adaptor.display().to_string());
        let operations = extract_operations(&facts, &mut self.diagnostics);
        let operations = filter_public(operations, &mut self.diagnostics);

        let exports = self.resolve_exports(&imports, &facts)?;
        let common = self.resolve_common(parsed.dir(), &facts);

        Ok(Manifest {
            operations,
            exports,
            common,
        })
    }

    /// One `exports` entry per import, in discovery order.
    ///
    /// Each import must read and parse; failures abort the run.
    pub fn resolve_exports(
        &mut self,
        imports: &[LocalImport],
        main: &ModuleFacts,
    ) -> Result<Vec<Vec<Operation>>> {
        let mut exports = Vec::with_capacity(imports.len());
        let options = self.config.classify_options();

        for import in imports {
            debug!(specifier = %import.specifier, path = %import.path.display(), "resolving import");
            let parsed = self.parser.parse_file(&import.path)?;
            let facts = classify(&parsed, &options);

            self.diagnostics.section(import.path.display().to_string());
            let referenced = extract_operations(&facts, &mut self.diagnostics)
                .into_iter()
                .filter(|op| main.is_external_reference(&op.name))
                .collect();
            exports.push(filter_public(referenced, &mut self.diagnostics));
        }

        Ok(exports)
    }

    /// Shared-library operations the module re-exposes.
    ///
    /// The shared library is optional: a missing or unreadable manifest
    /// yields no operations. Entries that fail to deserialize are dropped
    /// one by one with a [`Diagnostic::SkippedCommonEntry`].
    pub fn resolve_common(&mut self, module_dir: &Path, main: &ModuleFacts) -> Vec<Operation> {
        let Some(path) = self.config.common_manifest_path(module_dir) else {
            debug!("shared-library lookup disabled");
            return Vec::new();
        };

        let shared = match manifest::load_operations(&path) {
            Ok(shared) => shared,
            Err(err) => {
                match &err {
                    Error::Read { .. } => debug!(path = %path.display(), "no shared-library manifest"),
                    _ => warn!(path = %path.display(), error = %err, "ignoring shared-library manifest"),
                }
                self.diagnostics.push(Diagnostic::CommonLibraryUnavailable {
                    path,
                    reason: err.to_string(),
                });
                return Vec::new();
            }
        };

        for skipped in shared.skipped {
            warn!(
                path = %path.display(),
                entry = %skipped.entry,
                error = %skipped.reason,
                "skipping shared-library entry"
            );
            self.diagnostics.push(Diagnostic::SkippedCommonEntry {
                path: path.clone(),
                entry: skipped.entry,
                reason: skipped.reason,
            });
        }

        shared
            .operations
            .into_iter()
            .filter(|op| main.is_external_reference(&op.name))
            .collect()
    }
}

/// Build operations for every declaration: functions first, then
/// variable-operations, each group validated in source order.
pub fn extract_operations(facts: &ModuleFacts, diagnostics: &mut Diagnostics) -> Vec<Operation> {
    let mut operations = Vec::new();

    for group in facts.groups() {
        for (index, declaration) in group.iter().enumerate() {
            let is_last = index + 1 == group.len();
            let docs = extract_docs(declaration, diagnostics);
            let valid = validate(
                &declaration.name,
                declaration.span,
                docs.as_ref(),
                &declaration.params,
                is_last,
                diagnostics,
            );
            operations.push(Operation {
                name: declaration.name.clone(),
                params: declaration.params.clone(),
                docs,
                valid,
                span: Some(declaration.span),
            });
        }
    }

    operations
}

/// Keep `@public` operations.
///
/// A public operation that failed validation is kept and reported with
/// [`Diagnostic::PublicButInvalid`].
pub fn filter_public(operations: Vec<Operation>, diagnostics: &mut Diagnostics) -> Vec<Operation> {
    operations
        .into_iter()
        .filter(Operation::is_public)
        .inspect(|op| {
            if !op.valid {
                diagnostics.push(Diagnostic::PublicButInvalid {
                    name: op.name.clone(),
                    span: op.span,
                });
            }
        })
        .collect()
}
