//! # Validation Pipeline
//!
//! [`HedValidator`] ties the stages together for one annotation string:
//!
//! 1. Lexical checks on the raw text. Any finding stops here, since a
//!    structurally broken string cannot be tokenized reliably.
//! 2. Tokenization into tags and groups.
//! 3. Per-tag checks for every tag, in document order.
//! 4. Tag-level checks for the top level and every group.
//! 5. Group checks for every group.
//! 6. Required-prefix check over all tags of the string.
//!
//! Issues are returned in detection order. A validator holds no mutable
//! state; one instance can serve many threads.

use std::fmt;
use std::sync::Arc;

use hed_core::{
    ErrorKind, HedError, HedString, IssueBuilder, IssueReporter, IssueSummary, Placeholders,
    SchemaQuery, ValidationIssue,
};

use crate::config::ValidatorConfig;
use crate::group::GroupValidator;
use crate::lexical::{LexicalValidator, CLOSING_GROUP, OPENING_GROUP};
use crate::pluralize::{EnglishPluralizer, Pluralizer};
use crate::tag::TagValidator;
use crate::tag_list::TagListValidator;

/// Validates annotation strings against one schema and configuration.
#[derive(Clone)]
pub struct HedValidator {
    schema: Option<Arc<dyn SchemaQuery>>,
    config: ValidatorConfig,
    reporter: Arc<dyn IssueBuilder>,
    pluralizer: Arc<dyn Pluralizer>,
}

impl fmt::Debug for HedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HedValidator")
            .field("has_schema", &self.schema.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HedValidator {
    /// Create a validator with the default issue builder and pluralizer.
    ///
    /// # Errors
    ///
    /// Returns `HedError::SchemaRequired` if `config` requests semantic
    /// validation and `schema` is `None`.
    pub fn new(
        schema: Option<Arc<dyn SchemaQuery>>,
        config: ValidatorConfig,
    ) -> Result<Self, HedError> {
        if config.run_semantic_validation && schema.is_none() {
            return Err(HedError::SchemaRequired);
        }
        Ok(Self {
            schema,
            config,
            reporter: Arc::new(IssueReporter),
            pluralizer: Arc::new(EnglishPluralizer::default()),
        })
    }

    /// Replace the issue builder.
    #[must_use]
    pub fn with_issue_builder(mut self, reporter: Arc<dyn IssueBuilder>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the pluralizer used for word units.
    #[must_use]
    pub fn with_pluralizer(mut self, pluralizer: Arc<dyn Pluralizer>) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> ValidatorConfig {
        self.config
    }

    /// The schema, if one was supplied.
    pub fn schema(&self) -> Option<&dyn SchemaQuery> {
        self.schema.as_deref()
    }

    /// Raw-string checks.
    pub fn lexical(&self) -> LexicalValidator<'_> {
        LexicalValidator::new(&*self.reporter)
    }

    /// Per-tag checks.
    pub fn tag_validator(&self) -> TagValidator<'_> {
        TagValidator::from_parts(self.schema(), self.config, &*self.reporter, &*self.pluralizer)
    }

    /// Tag-list checks.
    pub fn tag_list_validator(&self) -> TagListValidator<'_> {
        TagListValidator::new(self.schema(), self.config, &*self.reporter)
    }

    /// Group checks.
    pub fn group_validator(&self) -> GroupValidator {
        GroupValidator
    }

    /// Validate one raw annotation string.
    pub fn validate_hed_string(&self, raw: &str) -> Vec<ValidationIssue> {
        let lexical = self.lexical().run_hed_string_validators(raw);
        if !lexical.is_empty() {
            tracing::debug!(issues = lexical.len(), "lexical validation failed");
            return lexical;
        }

        let issues = match HedString::parse(raw) {
            Ok(parsed) => self.validate_tokenized(&parsed),
            Err(err) => {
                tracing::debug!(error = %err, "annotation string did not tokenize");
                let index = match err {
                    HedError::Tokenize { index, .. } => Some(index),
                    _ => None,
                };
                self.tokenize_failure(raw, index)
            }
        };

        let summary = IssueSummary::of(&issues);
        tracing::debug!(
            errors = summary.errors,
            warnings = summary.warnings,
            "validated annotation string"
        );
        issues
    }

    /// Validate an already tokenized string. Lexical checks are not
    /// repeated.
    pub fn validate_tokenized(&self, hed: &HedString) -> Vec<ValidationIssue> {
        let tag_validator = self.tag_validator();
        let list_validator = self.tag_list_validator();
        let group_validator = self.group_validator();
        let all_tags = hed.all_tags();

        let mut issues = Vec::new();
        for tag in &all_tags {
            issues.extend(tag_validator.run_individual_tag_validators(tag));
        }
        for level in hed.levels() {
            let tags: Vec<_> = level.tags().collect();
            issues.extend(list_validator.run_tag_level_validators(&tags));
        }
        for group in hed.all_groups() {
            issues.extend(group_validator.run_tag_group_validators(group));
        }
        issues.extend(list_validator.run_string_tag_validators(&all_tags));
        issues
    }

    /// Validate many strings. Results are in input order.
    pub fn validate_batch<S: AsRef<str>>(&self, strings: &[S]) -> Vec<Vec<ValidationIssue>> {
        strings
            .iter()
            .map(|raw| self.validate_hed_string(raw.as_ref()))
            .collect()
    }

    /// Ill-nested parentheses with balanced counts. Any tokenizer failure
    /// lands here, so a string that cannot be split is never reported clean.
    fn tokenize_failure(&self, raw: &str, index: Option<usize>) -> Vec<ValidationIssue> {
        let count = |target: char| raw.chars().filter(|&c| c == target).count();
        self.reporter.error(
            ErrorKind::Parentheses,
            Placeholders {
                opening_count: Some(count(OPENING_GROUP)),
                closing_count: Some(count(CLOSING_GROUP)),
                index,
                source: Some(raw.to_string()),
                ..Placeholders::default()
            },
        )
    }
}
