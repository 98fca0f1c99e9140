//! Validator configuration.
//!
//! Defaults: warnings off, semantic validation on, `#` not accepted as a
//! number. Override from a YAML file, from environment variables, or by
//! explicit construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable enabling warning-class checks.
pub const ENV_CHECK_FOR_WARNINGS: &str = "HED_CHECK_FOR_WARNINGS";
/// Environment variable enabling schema-dependent checks.
pub const ENV_RUN_SEMANTIC_VALIDATION: &str = "HED_RUN_SEMANTIC_VALIDATION";
/// Environment variable accepting `#` wherever a number is required.
pub const ENV_ALLOW_POUND_NUMBERS: &str = "HED_ALLOW_POUND_NUMBERS";

/// Which checks a validator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Run warning-class checks.
    pub check_for_warnings: bool,
    /// Run schema-dependent checks. When off only lexical, formatting, and
    /// duplicate checks run.
    pub run_semantic_validation: bool,
    /// Accept a lone `#` wherever a number is required, for validating
    /// templates rather than concrete data.
    pub allow_numbers_to_be_pound_sign: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            check_for_warnings: false,
            run_semantic_validation: true,
            allow_numbers_to_be_pound_sign: false,
        }
    }
}

impl ValidatorConfig {
    /// Enable or disable warning-class checks.
    #[must_use]
    pub fn with_warnings(mut self, enabled: bool) -> Self {
        self.check_for_warnings = enabled;
        self
    }

    /// Enable or disable schema-dependent checks.
    #[must_use]
    pub fn with_semantic_validation(mut self, enabled: bool) -> Self {
        self.run_semantic_validation = enabled;
        self
    }

    /// Enable or disable `#` as a number.
    #[must_use]
    pub fn with_pound_numbers(mut self, enabled: bool) -> Self {
        self.allow_numbers_to_be_pound_sign = enabled;
        self
    }

    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Defaults with environment overrides applied.
    ///
    /// Variables:
    /// - `HED_CHECK_FOR_WARNINGS`
    /// - `HED_RUN_SEMANTIC_VALIDATION`
    /// - `HED_ALLOW_POUND_NUMBERS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply any of the `HED_*` environment variables that are set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(enabled) = env_flag(ENV_CHECK_FOR_WARNINGS, &lookup)? {
            self.check_for_warnings = enabled;
        }
        if let Some(enabled) = env_flag(ENV_RUN_SEMANTIC_VALIDATION, &lookup)? {
            self.run_semantic_validation = enabled;
        }
        if let Some(enabled) = env_flag(ENV_ALLOW_POUND_NUMBERS, &lookup)? {
            self.allow_numbers_to_be_pound_sign = enabled;
        }
        Ok(self)
    }
}

fn env_flag(
    var: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidFlag {
            var: var.to_string(),
            value: raw,
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {reason}")]
    Read { path: String, reason: String },
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("invalid boolean for {var}: {value:?}")]
    InvalidFlag { var: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ValidatorConfig::default();
        assert!(!cfg.check_for_warnings);
        assert!(cfg.run_semantic_validation);
        assert!(!cfg.allow_numbers_to_be_pound_sign);
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let cfg = ValidatorConfig::from_yaml_str("check_for_warnings: true\n").unwrap();
        assert!(cfg.check_for_warnings);
        assert!(cfg.run_semantic_validation);
    }

    #[test]
    fn yaml_rejects_unknown_fields() {
        let err = ValidatorConfig::from_yaml_str("check_warnings: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn yaml_file_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hed.yaml");
        std::fs::write(&path, "allow_numbers_to_be_pound_sign: true\n").unwrap();
        let cfg = ValidatorConfig::from_yaml_file(&path).unwrap();
        assert!(cfg.allow_numbers_to_be_pound_sign);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ValidatorConfig::from_yaml_file("/nonexistent/hed.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn env_overrides_apply_when_set() {
        let cfg = ValidatorConfig::default()
            .apply_overrides(lookup_from(&[
                (ENV_CHECK_FOR_WARNINGS, "yes"),
                (ENV_RUN_SEMANTIC_VALIDATION, "0"),
            ]))
            .unwrap();
        assert!(cfg.check_for_warnings);
        assert!(!cfg.run_semantic_validation);
        assert!(!cfg.allow_numbers_to_be_pound_sign);
    }

    #[test]
    fn env_override_rejects_garbage() {
        let err = ValidatorConfig::default()
            .apply_overrides(lookup_from(&[(ENV_ALLOW_POUND_NUMBERS, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { .. }));
        assert!(err.to_string().contains(ENV_ALLOW_POUND_NUMBERS));
    }

    #[test]
    fn builder_methods_set_fields() {
        let cfg = ValidatorConfig::default()
            .with_warnings(true)
            .with_semantic_validation(false)
            .with_pound_numbers(true);
        assert_eq!(
            cfg,
            ValidatorConfig {
                check_for_warnings: true,
                run_semantic_validation: false,
                allow_numbers_to_be_pound_sign: true,
            }
        );
    }
}
