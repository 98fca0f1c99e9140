//! # Schema Subcommand
//!
//! Prints the version of a dictionary snapshot and how many names are
//! registered under each attribute key. Useful for checking that a
//! snapshot decodes and normalizes the way it was intended to.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hed_core::{HedKey, SchemaAttributeDictionary};

use crate::validate::OutputFormat;

/// Arguments for the `hedv schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Schema attribute dictionary snapshot (YAML, or JSON by extension).
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Version and per-key entry counts of a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    /// Version label, if declared.
    pub version: Option<String>,
    /// Entry count per attribute key, keyed by the key's snapshot name.
    pub counts: BTreeMap<String, usize>,
}

impl SchemaSummary {
    /// Summarize `dictionary`.
    pub fn of(dictionary: &SchemaAttributeDictionary) -> Result<Self> {
        let mut counts = BTreeMap::new();
        for key in HedKey::ALL {
            counts.insert(key_name(key)?, dictionary.attribute_count(key));
        }
        Ok(Self {
            version: dictionary.version().map(str::to_string),
            counts,
        })
    }

    /// Human-readable rendering.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Schema version: {}\n",
            self.version.as_deref().unwrap_or("unversioned")
        );
        for (key, count) in &self.counts {
            out.push_str(&format!("  {key:<28} {count}\n"));
        }
        out
    }
}

/// Execute the schema subcommand. Returns exit code 0.
pub fn run_schema(args: &SchemaArgs, repo_root: &Path) -> Result<u8> {
    let resolved = crate::resolve_path(&args.schema, repo_root);
    let dictionary = SchemaAttributeDictionary::load(&resolved)
        .with_context(|| format!("failed to load schema {}", resolved.display()))?;
    let summary = SchemaSummary::of(&dictionary)?;
    match args.format {
        OutputFormat::Text => print!("{}", summary.render_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        ),
    }
    Ok(0)
}

/// The snapshot spelling of `key`, e.g. `unitClass`.
fn key_name(key: HedKey) -> Result<String> {
    let value = serde_json::to_value(key).context("failed to encode attribute key")?;
    value
        .as_str()
        .map(str::to_string)
        .context("attribute key did not encode as a string")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_every_key() {
        let dictionary = SchemaAttributeDictionary::builder()
            .version("t")
            .takes_value("Event/Label")
            .unit_symbol("s")
            .build()
            .unwrap();
        let summary = SchemaSummary::of(&dictionary).unwrap();
        assert_eq!(summary.counts.len(), HedKey::ALL.len());
        assert_eq!(summary.counts["allTags"], 2);
        assert_eq!(summary.counts["takesValue"], 1);
        assert_eq!(summary.counts["unitSymbol"], 1);
        assert_eq!(summary.counts["siUnitModifier"], 0);
        assert_eq!(summary.version.as_deref(), Some("t"));
    }

    #[test]
    fn text_rendering_starts_with_version() {
        let dictionary = SchemaAttributeDictionary::builder().build().unwrap();
        let text = SchemaSummary::of(&dictionary).unwrap().render_text();
        assert!(text.starts_with("Schema version: unversioned\n"));
        assert!(text.contains("requireChild"));
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = SchemaArgs {
            schema: dir.path().join("missing.yaml"),
            format: OutputFormat::Text,
        };
        let err = run_schema(&args, dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load schema"));
    }
}
