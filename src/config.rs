//! Run configuration.
//!
//! Settings come from an optional YAML file; every key has a default, so no
//! file is needed for the usual adaptor layout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::ClassifyOptions;
use crate::error::{Error, Result};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["adaptordoc.yaml", ".adaptordoc.yaml"];

/// Shared-library manifest location, relative to the adaptor's directory.
pub const DEFAULT_COMMON_MANIFEST: &str = "../node_modules/language-common/ast.json";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Shared-library manifest. Relative paths resolve against the adaptor's
    /// directory; `null` disables the lookup.
    pub common_manifest: Option<PathBuf>,
    /// Names with this prefix are private (default `_`).
    pub private_prefix: String,
    /// Function names that are never operations (default `execute`).
    pub reserved_names: Vec<String>,
    /// Extension appended to extensionless relative imports (default `js`).
    pub source_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        let classify = ClassifyOptions::default();
        Self {
            common_manifest: Some(PathBuf::from(DEFAULT_COMMON_MANIFEST)),
            private_prefix: classify.private_prefix,
            reserved_names: classify.reserved_names,
            source_extension: "js".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_yaml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.source_extension = config.source_extension.trim_start_matches('.').to_string();
        config.validate().map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load `explicit` if given, else a discovered file in `dir`, else
    /// defaults. Returns the file that was used, if any.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(dir),
        };
        match path {
            Some(path) => Ok((Self::parse_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.source_extension.is_empty() {
            return Err("source_extension must not be empty".to_string());
        }
        if self.reserved_names.iter().any(|n| n.trim().is_empty()) {
            return Err("reserved_names must not contain empty names".to_string());
        }
        Ok(())
    }

    /// Classifier naming rules.
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            private_prefix: self.private_prefix.clone(),
            reserved_names: self.reserved_names.clone(),
        }
    }

    /// Absolute or module-relative location of the shared-library manifest.
    pub fn common_manifest_path(&self, module_dir: &Path) -> Option<PathBuf> {
        self.common_manifest
            .as_ref()
            .map(|path| module_dir.join(path))
    }
}
