//! Command-line interface for adaptordoc.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::manifest;
use crate::pipeline::Pipeline;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Adaptor manifest generator.
///
/// Reads an adaptor module, checks that each operation's documented
/// parameters match its signature, and writes a JSON manifest of the public
/// operations, including those re-exported from sibling files and the shared
/// common library.
#[derive(Parser)]
#[command(name = "adaptordoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the adaptor module to analyze
    #[arg(short, long)]
    pub adaptor: Option<PathBuf>,

    /// Manifest output file (a directory receives ast.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Shared-library manifest to resolve re-exported operations against
    #[arg(long)]
    pub common: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the generator.
///
/// A missing `--adaptor` or `--output` is reported on stderr but exits with
/// `EXIT_SUCCESS`, matching the behavior existing build scripts rely on.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    init_tracing(cli.verbose);

    let Some(adaptor) = cli.adaptor.as_deref() else {
        eprintln!("Error: no adaptor specified (use --adaptor <PATH>)");
        return Ok(EXIT_SUCCESS);
    };
    let Some(output) = cli.output.as_deref() else {
        eprintln!("Error: no output path specified (use --output <PATH>)");
        return Ok(EXIT_SUCCESS);
    };

    let cwd = std::env::current_dir()?;
    let (mut config, config_path) = match Config::load(cli.config.as_deref(), &cwd) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(path) = &config_path {
        debug!(path = %path.display(), "loaded config");
    }
    if let Some(common) = &cli.common {
        config.common_manifest = Some(absolute(&cwd, common));
    }

    // Resolve path
    let adaptor = match adaptor.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", adaptor, e);
            return Ok(EXIT_ERROR);
        }
    };

    report::write_header(&adaptor);

    let mut pipeline = Pipeline::new(config);
    let result = pipeline.run(&adaptor);
    report::write_diagnostics(pipeline.diagnostics());
    let built = result?;

    let output = manifest::output_path(output);
    built.write(&output)?;
    info!(path = %output.display(), operations = built.operation_count(), "wrote manifest");

    report::write_summary(&built, &output, pipeline.diagnostics());
    Ok(EXIT_SUCCESS)
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "adaptordoc",
            "--adaptor",
            "lib/Adaptor.js",
            "--output",
            "docs/ast.json",
            "--common",
            "../common/ast.json",
        ])
        .unwrap();
        assert_eq!(cli.adaptor, Some(PathBuf::from("lib/Adaptor.js")));
        assert_eq!(cli.output, Some(PathBuf::from("docs/ast.json")));
        assert_eq!(cli.common, Some(PathBuf::from("../common/ast.json")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_missing_options_parse() {
        let cli = Cli::try_parse_from(["adaptordoc", "-a", "lib/Adaptor.js"]).unwrap();
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_missing_output_exits_success() {
        let cli = Cli::try_parse_from(["adaptordoc", "--adaptor", "does-not-matter.js"]).unwrap();
        assert_eq!(run(&cli).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_absolute() {
        let cwd = Path::new("/work");
        assert_eq!(absolute(cwd, Path::new("a/b.json")), PathBuf::from("/work/a/b.json"));
        assert_eq!(absolute(cwd, Path::new("/x.json")), PathBuf::from("/x.json"));
    }
}
