//! # Tag-List Validation
//!
//! Checks over the tags of one nesting level (duplicates, unique
//! prefixes) and over every tag of a string (required prefixes).
//!
//! Prefix matching is a case-insensitive `starts_with` on the full tag
//! text.

use std::collections::HashSet;

use hed_core::{ErrorKind, IssueBuilder, Placeholders, SchemaQuery, ValidationIssue};

use crate::config::ValidatorConfig;

/// Validates lists of tags.
#[derive(Clone, Copy)]
pub struct TagListValidator<'a> {
    schema: Option<&'a dyn SchemaQuery>,
    config: ValidatorConfig,
    reporter: &'a dyn IssueBuilder,
}

impl<'a> TagListValidator<'a> {
    /// Create a tag-list validator. Schema-dependent checks are skipped
    /// when `schema` is `None`.
    pub fn new(
        schema: Option<&'a dyn SchemaQuery>,
        config: ValidatorConfig,
        reporter: &'a dyn IssueBuilder,
    ) -> Self {
        Self {
            schema,
            config,
            reporter,
        }
    }

    fn semantic_schema(&self) -> Option<&'a dyn SchemaQuery> {
        self.schema.filter(|_| self.config.run_semantic_validation)
    }

    /// Uniqueness (semantic mode) then duplicates, for one level.
    pub fn run_tag_level_validators<T: AsRef<str>>(&self, tags: &[T]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if let Some(schema) = self.semantic_schema() {
            issues.extend(self.check_multiple_unique_tags(schema, tags));
        }
        issues.extend(self.check_duplicate_tags(tags));
        issues
    }

    /// Required prefixes over every tag of a string (semantic and warning
    /// mode).
    pub fn run_string_tag_validators<T: AsRef<str>>(&self, tags: &[T]) -> Vec<ValidationIssue> {
        match self.semantic_schema() {
            Some(schema) if self.config.check_for_warnings => {
                self.check_required_prefixes(schema, tags)
            }
            _ => Vec::new(),
        }
    }

    /// `DUPLICATE` for every repeat of an earlier tag, compared
    /// case-insensitively. The first occurrence is never flagged.
    pub fn check_duplicate_tags<T: AsRef<str>>(&self, tags: &[T]) -> Vec<ValidationIssue> {
        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            if !seen.insert(tag.to_lowercase()) {
                issues.extend(
                    self.reporter
                        .error(ErrorKind::Duplicate, Placeholders::tag(tag)),
                );
            }
        }
        issues
    }

    /// One `MULTIPLE_UNIQUE` per unique prefix shared by two or more tags.
    pub fn check_multiple_unique_tags<T: AsRef<str>>(
        &self,
        schema: &dyn SchemaQuery,
        tags: &[T],
    ) -> Vec<ValidationIssue> {
        let lowered = lowercase_all(tags);
        let mut issues = Vec::new();
        for (prefix, display) in schema.unique_prefixes() {
            let count = lowered.iter().filter(|tag| tag.starts_with(prefix)).count();
            if count > 1 {
                issues.extend(
                    self.reporter
                        .error(ErrorKind::MultipleUnique, Placeholders::prefix(display)),
                );
            }
        }
        issues
    }

    /// `REQUIRED_PREFIX_MISSING` warning per required prefix no tag starts
    /// with.
    pub fn check_required_prefixes<T: AsRef<str>>(
        &self,
        schema: &dyn SchemaQuery,
        tags: &[T],
    ) -> Vec<ValidationIssue> {
        let lowered = lowercase_all(tags);
        let mut issues = Vec::new();
        for (prefix, display) in schema.required_prefixes() {
            if !lowered.iter().any(|tag| tag.starts_with(prefix)) {
                issues.extend(self.reporter.warning(
                    ErrorKind::RequiredPrefixMissing,
                    Placeholders::prefix(display),
                ));
            }
        }
        issues
    }
}

fn lowercase_all<T: AsRef<str>>(tags: &[T]) -> Vec<String> {
    tags.iter().map(|tag| tag.as_ref().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::{IssueReporter, SchemaAttributeDictionary, Severity};

    fn schema() -> SchemaAttributeDictionary {
        SchemaAttributeDictionary::builder()
            .takes_value("Event/Label")
            .unique("Event/Label")
            .required_prefix("Event/Category")
            .required_prefix("Event/Description")
            .build()
            .unwrap()
    }

    fn validator<'a>(
        dict: &'a SchemaAttributeDictionary,
        config: ValidatorConfig,
    ) -> TagListValidator<'a> {
        TagListValidator::new(Some(dict), config, &IssueReporter)
    }

    #[test]
    fn duplicate_flags_second_occurrence_only() {
        let dict = schema();
        let issues = validator(&dict, ValidatorConfig::default())
            .check_duplicate_tags(&["Event/Label/foo", "Item", "event/label/FOO"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, ErrorKind::Duplicate);
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("event/label/FOO"));
    }

    #[test]
    fn different_values_are_not_duplicates() {
        let dict = schema();
        let issues = validator(&dict, ValidatorConfig::default())
            .check_duplicate_tags(&["Event/Label/A", "Event/Label/B"]);
        assert!(issues.is_empty());
    }

    #[test]
    fn triple_repeat_flags_two() {
        let dict = schema();
        let issues =
            validator(&dict, ValidatorConfig::default()).check_duplicate_tags(&["A", "a", "A"]);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn unique_prefix_reported_once_with_display_text() {
        let dict = schema();
        let issues = validator(&dict, ValidatorConfig::default())
            .check_multiple_unique_tags(&dict, &["Event/Label/A", "Event/Label/B", "event/label/C"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, ErrorKind::MultipleUnique);
        assert_eq!(issues[0].placeholders.prefix.as_deref(), Some("Event/Label"));
    }

    #[test]
    fn single_unique_tag_is_fine() {
        let dict = schema();
        let issues = validator(&dict, ValidatorConfig::default())
            .check_multiple_unique_tags(&dict, &["Event/Label/A", "Item"]);
        assert!(issues.is_empty());
    }

    #[test]
    fn missing_required_prefixes_warn_each() {
        let dict = schema();
        let issues = validator(&dict, ValidatorConfig::default())
            .check_required_prefixes(&dict, &["Event/Category/Experimental-stimulus"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].placeholders.prefix.as_deref(), Some("Event/Description"));
    }

    #[test]
    fn level_validators_run_unique_before_duplicates() {
        let dict = schema();
        let tags = ["Event/Label/A", "Event/Label/A"];
        let kinds: Vec<ErrorKind> = validator(&dict, ValidatorConfig::default())
            .run_tag_level_validators(&tags)
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(kinds, vec![ErrorKind::MultipleUnique, ErrorKind::Duplicate]);
    }

    #[test]
    fn level_validators_without_semantics_keep_duplicates() {
        let dict = schema();
        let config = ValidatorConfig::default().with_semantic_validation(false);
        let issues = validator(&dict, config)
            .run_tag_level_validators(&["Event/Label/A", "Event/Label/A"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, ErrorKind::Duplicate);
    }

    #[test]
    fn string_validators_need_warnings() {
        let dict = schema();
        let tags: [&str; 0] = [];
        assert!(validator(&dict, ValidatorConfig::default())
            .run_string_tag_validators(&tags)
            .is_empty());
        let warned = validator(&dict, ValidatorConfig::default().with_warnings(true))
            .run_string_tag_validators(&tags);
        assert_eq!(warned.len(), 2);
    }
}
