//! # hed-cli: Command-Line Validation of HED Annotations
//!
//! Provides the `hedv` command-line interface over the validation engine.
//!
//! ## Subcommands
//!
//! - `hedv validate`: validate annotation strings given as arguments or
//!   one per line in a file.
//! - `hedv schema`: summarize a schema attribute dictionary snapshot.
//!
//! ```bash
//! hedv validate --schema schemas/hed-mini.yaml "Event/Duration/3 ms"
//! hedv validate --schema schemas/hed-mini.yaml --warnings --file annotations.txt
//! hedv schema --schema schemas/hed-mini.yaml
//! ```
//!
//! Exit codes: 0 when no error-severity issue was found, 1 when at least
//! one was, 2 on operational failure.

pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hed_validator::ValidatorConfig;

/// Resolve a path that may be relative to the repository root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `repo_root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Base validator configuration: the `--config` file if given, otherwise
/// defaults, with `HED_*` environment overrides applied on top.
pub fn load_config(config: Option<&Path>) -> Result<ValidatorConfig> {
    let base = match config {
        Some(path) => ValidatorConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    base.with_env_overrides()
        .context("invalid HED_* environment override")
}
