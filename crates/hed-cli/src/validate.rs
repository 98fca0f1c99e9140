//! # Validate Subcommand
//!
//! Validates annotation strings given on the command line and/or one per
//! line in a file, against a schema attribute dictionary snapshot.
//!
//! Blank and non-UTF-8 lines in `--file` are skipped. Every input is
//! validated even after a failure, so one run reports everything.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use hed_core::{IssueSummary, SchemaAttributeDictionary, SchemaQuery, ValidationIssue};
use hed_validator::{HedValidator, ValidatorConfig};

/// Arguments for the `hedv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema attribute dictionary snapshot (YAML, or JSON by extension).
    /// Required unless --no-semantic is given.
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Also run warning-class checks.
    #[arg(long)]
    pub warnings: bool,

    /// Only run checks that need no schema.
    #[arg(long)]
    pub no_semantic: bool,

    /// Accept `#` wherever a number is required.
    #[arg(long)]
    pub allow_pound: bool,

    /// Read annotation strings from a file, one per line.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Annotation strings to validate.
    #[arg(value_name = "STRING")]
    pub strings: Vec<String>,
}

/// How results are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per input and per issue.
    Text,
    /// A JSON array of reports.
    Json,
}

/// One annotation string and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// `arg N` or `path:line`.
    pub origin: String,
    /// The annotation text.
    pub text: String,
}

/// Validation result for one annotation.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationReport {
    /// Where the annotation came from.
    pub origin: String,
    /// The annotation text.
    pub annotation: String,
    /// Issues in detection order.
    pub issues: Vec<ValidationIssue>,
}

impl AnnotationReport {
    fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when no error-severity issue was found, 1
/// otherwise. Operational failures are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, base: ValidatorConfig, repo_root: &Path) -> Result<u8> {
    let config = effective_config(args, base);
    let validator = build_validator(args, config, repo_root)?;
    let annotations = collect_annotations(args, repo_root)?;
    if annotations.is_empty() {
        bail!("no annotation strings given; pass STRING arguments or --file");
    }

    tracing::info!(
        inputs = annotations.len(),
        warnings = config.check_for_warnings,
        semantic = config.run_semantic_validation,
        "validating annotations"
    );

    let reports = validate_all(&validator, annotations);
    match args.format {
        OutputFormat::Text => print!("{}", render_text(&reports)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("failed to encode report")?
        ),
    }

    let failed = reports.iter().filter(|r| r.has_errors()).count();
    if failed > 0 {
        tracing::warn!(failed, total = reports.len(), "annotations failed validation");
        Ok(1)
    } else {
        Ok(0)
    }
}

/// The base configuration with command-line switches applied.
pub fn effective_config(args: &ValidateArgs, base: ValidatorConfig) -> ValidatorConfig {
    let mut config = base;
    if args.warnings {
        config = config.with_warnings(true);
    }
    if args.no_semantic {
        config = config.with_semantic_validation(false);
    }
    if args.allow_pound {
        config = config.with_pound_numbers(true);
    }
    config
}

fn build_validator(
    args: &ValidateArgs,
    config: ValidatorConfig,
    repo_root: &Path,
) -> Result<HedValidator> {
    let schema = match &args.schema {
        Some(path) => {
            let resolved = crate::resolve_path(path, repo_root);
            let dictionary = SchemaAttributeDictionary::load(&resolved)
                .with_context(|| format!("failed to load schema {}", resolved.display()))?;
            tracing::debug!(
                version = dictionary.version().unwrap_or("unversioned"),
                "loaded schema"
            );
            Some(Arc::new(dictionary) as Arc<dyn SchemaQuery>)
        }
        None => None,
    };
    HedValidator::new(schema, config)
        .context("--schema is required unless --no-semantic is given")
}

/// Positional strings first, then the non-blank lines of `--file`. Lines
/// that are not valid UTF-8 are skipped with a warning.
pub fn collect_annotations(args: &ValidateArgs, repo_root: &Path) -> Result<Vec<Annotation>> {
    let mut annotations: Vec<Annotation> = args
        .strings
        .iter()
        .enumerate()
        .map(|(i, text)| Annotation {
            origin: format!("arg {}", i + 1),
            text: text.clone(),
        })
        .collect();

    if let Some(path) = &args.file {
        let resolved = crate::resolve_path(path, repo_root);
        let content = std::fs::read(&resolved)
            .with_context(|| format!("failed to read {}", resolved.display()))?;
        for (number, raw) in content.split(|&b| b == b'\n').enumerate() {
            let origin = format!("{}:{}", path.display(), number + 1);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let Ok(line) = std::str::from_utf8(raw) else {
                tracing::warn!(%origin, "skipping line that is not valid UTF-8");
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }
            annotations.push(Annotation {
                origin,
                text: line.to_string(),
            });
        }
    }
    Ok(annotations)
}

/// Validate every annotation, in order.
pub fn validate_all(validator: &HedValidator, annotations: Vec<Annotation>) -> Vec<AnnotationReport> {
    annotations
        .into_iter()
        .map(|annotation| {
            let issues = validator.validate_hed_string(&annotation.text);
            AnnotationReport {
                origin: annotation.origin,
                annotation: annotation.text,
                issues,
            }
        })
        .collect()
}

/// Text report: a status line per input, an indented line per issue, and
/// a closing summary.
pub fn render_text(reports: &[AnnotationReport]) -> String {
    let mut out = String::new();
    let mut totals = IssueSummary::default();
    for report in reports {
        let summary = IssueSummary::of(&report.issues);
        totals.errors += summary.errors;
        totals.warnings += summary.warnings;
        let status = if summary.has_errors() { "FAIL" } else { "OK" };
        out.push_str(&format!("{status}: {} {}\n", report.origin, report.annotation));
        for issue in &report.issues {
            out.push_str(&format!("  {issue}\n"));
        }
    }
    let passed = reports.iter().filter(|r| !r.has_errors()).count();
    out.push_str(&format!(
        "\nAnnotations: {passed}/{} passed ({} errors, {} warnings)\n",
        reports.len(),
        totals.errors,
        totals.warnings
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_root() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates/
        dir.pop(); // repo root
        dir
    }

    fn args(strings: &[&str]) -> ValidateArgs {
        ValidateArgs {
            schema: Some(PathBuf::from("schemas/hed-mini.yaml")),
            warnings: false,
            no_semantic: false,
            allow_pound: false,
            file: None,
            format: OutputFormat::Text,
            strings: strings.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn switches_only_turn_features_on_or_semantics_off() {
        let mut a = args(&[]);
        a.warnings = true;
        a.no_semantic = true;
        let config = effective_config(&a, ValidatorConfig::default());
        assert!(config.check_for_warnings);
        assert!(!config.run_semantic_validation);
        assert!(!config.allow_numbers_to_be_pound_sign);

        let untouched = effective_config(&args(&[]), ValidatorConfig::default().with_warnings(true));
        assert!(untouched.check_for_warnings);
    }

    #[test]
    fn file_lines_follow_positional_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.txt");
        std::fs::write(&path, "Event\n\n   \nItem/Object/Ball\n").unwrap();
        let mut a = args(&["Event/Label/Go"]);
        a.file = Some(path.clone());
        let annotations = collect_annotations(&a, &repo_root()).unwrap();
        let texts: Vec<&str> = annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["Event/Label/Go", "Event", "Item/Object/Ball"]);
        assert_eq!(annotations[0].origin, "arg 1");
        assert_eq!(annotations[2].origin, format!("{}:4", path.display()));
    }

    #[test]
    fn non_utf8_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");
        std::fs::write(&path, b"Event\r\nItem/\xff\xfeBall\nItem/Object/Ball\n").unwrap();
        let mut a = args(&[]);
        a.file = Some(path.clone());
        let annotations = collect_annotations(&a, &repo_root()).unwrap();
        let texts: Vec<&str> = annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["Event", "Item/Object/Ball"]);
        assert_eq!(annotations[1].origin, format!("{}:3", path.display()));
    }

    #[test]
    fn exit_code_reflects_errors() {
        let root = repo_root();
        let ok = run_validate(&args(&["Event/Duration/3 ms"]), ValidatorConfig::default(), &root);
        assert_eq!(ok.unwrap(), 0);
        let bad = run_validate(&args(&["Event/Nonsense"]), ValidatorConfig::default(), &root);
        assert_eq!(bad.unwrap(), 1);
    }

    #[test]
    fn warnings_alone_do_not_fail() {
        let mut a = args(&["Event/Duration/3"]);
        a.warnings = true;
        assert_eq!(run_validate(&a, ValidatorConfig::default(), &repo_root()).unwrap(), 0);
    }

    #[test]
    fn semantic_mode_without_schema_is_operational_error() {
        let mut a = args(&["Event"]);
        a.schema = None;
        let err = run_validate(&a, ValidatorConfig::default(), &repo_root()).unwrap_err();
        assert!(format!("{err:#}").contains("--schema is required"));
        a.no_semantic = true;
        assert_eq!(run_validate(&a, ValidatorConfig::default(), &repo_root()).unwrap(), 0);
    }

    #[test]
    fn no_inputs_is_operational_error() {
        assert!(run_validate(&args(&[]), ValidatorConfig::default(), &repo_root()).is_err());
    }

    #[test]
    fn text_report_lists_issues_and_summary() {
        let validator = HedValidator::new(
            None,
            ValidatorConfig::default().with_semantic_validation(false),
        )
        .unwrap();
        let reports = validate_all(
            &validator,
            vec![
                Annotation {
                    origin: "arg 1".into(),
                    text: "A,,B".into(),
                },
                Annotation {
                    origin: "arg 2".into(),
                    text: "A, B".into(),
                },
            ],
        );
        let text = render_text(&reports);
        assert!(text.contains("FAIL: arg 1 A,,B\n  [ERROR] EMPTY_TAG"));
        assert!(text.contains("OK: arg 2 A, B\n"));
        assert!(text.ends_with("Annotations: 1/2 passed (1 errors, 0 warnings)\n"));
    }

    #[test]
    fn json_report_carries_codes() {
        let validator = HedValidator::new(
            None,
            ValidatorConfig::default().with_semantic_validation(false),
        )
        .unwrap();
        let reports = validate_all(
            &validator,
            vec![Annotation {
                origin: "arg 1".into(),
                text: "A~".into(),
            }],
        );
        let json = serde_json::to_value(&reports).unwrap();
        assert_eq!(json[0]["issues"][0]["kind"], "TILDES_NOT_SUPPORTED");
        assert_eq!(json[0]["issues"][0]["severity"], "error");
        assert_eq!(json[0]["issues"][0]["placeholders"]["index"], 1);
    }
}
