//! # Tag Semantic Validation
//!
//! Per-tag checks against the schema: formatting, existence, unit
//! validity, required children, and the two per-tag warnings.
//!
//! ## Pipeline
//!
//! 1. Formatting scan. Any finding here ends the pipeline for the tag.
//! 2. Existence, unit validity, require-child (semantic mode).
//! 3. Default-unit warning (semantic and warning mode).
//! 4. Capitalization warning (warning mode).

use hed_core::{
    is_clock_face_time, is_date_time, ErrorKind, HedError, HedKey, HedTag, IssueBuilder,
    Placeholders, SchemaQuery, ValidationIssue,
};

use crate::config::ValidatorConfig;
use crate::lexical::LexicalValidator;
use crate::pluralize::Pluralizer;
use crate::units::{
    is_numeric_literal, UnitStripper, CLOCK_TIME_CLASS, DATE_TIME_CLASS, TIME_CLASS,
};

/// Validates one tag at a time.
#[derive(Clone, Copy)]
pub struct TagValidator<'a> {
    schema: Option<&'a dyn SchemaQuery>,
    config: ValidatorConfig,
    reporter: &'a dyn IssueBuilder,
    pluralizer: &'a dyn Pluralizer,
}

impl<'a> TagValidator<'a> {
    /// Create a tag validator.
    ///
    /// # Errors
    ///
    /// Returns `HedError::SchemaRequired` if `config` requests semantic
    /// validation and `schema` is `None`.
    pub fn new(
        schema: Option<&'a dyn SchemaQuery>,
        config: ValidatorConfig,
        reporter: &'a dyn IssueBuilder,
        pluralizer: &'a dyn Pluralizer,
    ) -> Result<Self, HedError> {
        if config.run_semantic_validation && schema.is_none() {
            return Err(HedError::SchemaRequired);
        }
        Ok(Self::from_parts(schema, config, reporter, pluralizer))
    }

    pub(crate) fn from_parts(
        schema: Option<&'a dyn SchemaQuery>,
        config: ValidatorConfig,
        reporter: &'a dyn IssueBuilder,
        pluralizer: &'a dyn Pluralizer,
    ) -> Self {
        Self {
            schema,
            config,
            reporter,
            pluralizer,
        }
    }

    /// Run every applicable check on `tag`, in pipeline order.
    pub fn run_individual_tag_validators(&self, tag: &HedTag) -> Vec<ValidationIssue> {
        let formatting = self.check_tag_formatting(tag);
        if !formatting.is_empty() {
            return formatting;
        }
        let mut issues = Vec::new();
        if let Some(schema) = self.semantic_schema() {
            issues.extend(self.tag_exist_in_schema(schema, tag));
            issues.extend(self.check_unit_class_units_are_valid(schema, tag));
            issues.extend(self.check_tag_requires_child(schema, tag));
            if self.config.check_for_warnings {
                issues.extend(self.check_unit_class_units_exist(schema, tag));
            }
        }
        if self.config.check_for_warnings {
            issues.extend(self.check_capitalization(tag));
        }
        issues
    }

    fn semantic_schema(&self) -> Option<&'a dyn SchemaQuery> {
        self.schema.filter(|_| self.config.run_semantic_validation)
    }

    /// Doubled slashes or blanks and leading or trailing slashes.
    pub fn check_tag_formatting(&self, tag: &HedTag) -> Vec<ValidationIssue> {
        LexicalValidator::new(self.reporter).check_tag_formatting(tag)
    }

    /// `INVALID_TAG` unless the tag is a term, a value of a value-taking
    /// tag, or a descendant of a tag that allows extension.
    pub fn tag_exist_in_schema(
        &self,
        schema: &dyn SchemaQuery,
        tag: &HedTag,
    ) -> Vec<ValidationIssue> {
        let known = schema.tag_exists(tag.lower())
            || takes_value(schema, tag)
            || tag
                .ancestor_paths()
                .any(|path| schema.tag_has_attribute(path, HedKey::ExtensionAllowedPropagated));
        if known {
            return Vec::new();
        }
        self.reporter
            .error(ErrorKind::InvalidTag, Placeholders::tag(tag.text()))
    }

    /// `UNIT_CLASS_INVALID_UNIT` when the value of a unit-class tag is not
    /// a number with an acceptable unit.
    ///
    /// Time-like classes accept bare temporal values first: a date-time
    /// under `dateTime`, a clock-face time under `clockTime`, and a
    /// clock-face time under plain `time` when the schema has neither of
    /// the other two.
    pub fn check_unit_class_units_are_valid(
        &self,
        schema: &dyn SchemaQuery,
        tag: &HedTag,
    ) -> Vec<ValidationIssue> {
        if schema.tag_exists(tag.lower()) || !is_unit_class_tag(schema, tag) {
            return Vec::new();
        }
        let classes = schema.unit_classes_for(&tag.takes_value_form());
        let value = tag.original_value_segment();
        if is_temporal_value(schema, &classes, value) {
            return Vec::new();
        }

        let units = units_for_classes(schema, &classes);
        let stripper = UnitStripper::new(schema, self.pluralizer);
        let remainder = stripper
            .strip_unit(value, &units)
            .unwrap_or_else(|| value.to_string());
        if is_numeric_literal(&remainder, self.config.allow_numbers_to_be_pound_sign) {
            return Vec::new();
        }

        let mut listed = units;
        listed.sort_unstable();
        listed.dedup();
        self.reporter.error(
            ErrorKind::UnitClassInvalidUnit,
            Placeholders::tag(tag.text()).with_units(listed.join(",")),
        )
    }

    /// `REQUIRE_CHILD` when the tag is used as a leaf but must not be.
    pub fn check_tag_requires_child(
        &self,
        schema: &dyn SchemaQuery,
        tag: &HedTag,
    ) -> Vec<ValidationIssue> {
        if !schema.tag_has_attribute(tag.lower(), HedKey::RequireChild) {
            return Vec::new();
        }
        self.reporter
            .error(ErrorKind::RequireChild, Placeholders::tag(tag.text()))
    }

    /// `UNIT_CLASS_DEFAULT_USED` warning when a unit-class value is a bare
    /// number.
    pub fn check_unit_class_units_exist(
        &self,
        schema: &dyn SchemaQuery,
        tag: &HedTag,
    ) -> Vec<ValidationIssue> {
        if !is_unit_class_tag(schema, tag) {
            return Vec::new();
        }
        let value = tag.original_value_segment();
        if !is_numeric_literal(value, self.config.allow_numbers_to_be_pound_sign) {
            return Vec::new();
        }
        let classes = schema.unit_classes_for(&tag.takes_value_form());
        let default_unit = classes
            .iter()
            .find_map(|class| schema.default_unit_for_class(class))
            .unwrap_or_default();
        self.reporter.warning(
            ErrorKind::UnitClassDefaultUsed,
            Placeholders::tag(tag.text()).with_units(default_unit),
        )
    }

    /// One `CAPITALIZATION` warning when any path segment is neither
    /// capitalized nor camel case. The value of a value-taking tag is not
    /// checked.
    pub fn check_capitalization(&self, tag: &HedTag) -> Vec<ValidationIssue> {
        let mut segments: Vec<&str> = tag.segments().collect();
        if self.schema.is_some_and(|schema| takes_value(schema, tag)) {
            segments.pop();
        }
        let offending = segments
            .iter()
            .any(|segment| capitalize(segment) != *segment && !is_camel_case(segment));
        if !offending {
            return Vec::new();
        }
        self.reporter
            .warning(ErrorKind::Capitalization, Placeholders::tag(tag.text()))
    }
}

fn takes_value(schema: &dyn SchemaQuery, tag: &HedTag) -> bool {
    schema.tag_has_attribute(&tag.takes_value_form(), HedKey::TakesValue)
}

fn is_unit_class_tag(schema: &dyn SchemaQuery, tag: &HedTag) -> bool {
    schema.has_unit_classes()
        && schema.tag_has_attribute(&tag.takes_value_form(), HedKey::UnitClass)
}

fn is_temporal_value(schema: &dyn SchemaQuery, classes: &[&str], value: &str) -> bool {
    let accepts = |class: &str| schema.has_unit_class(class) && classes.contains(&class);
    if accepts(DATE_TIME_CLASS) && is_date_time(value) {
        return true;
    }
    if accepts(CLOCK_TIME_CLASS) && is_clock_face_time(value) {
        return true;
    }
    !schema.has_unit_class(DATE_TIME_CLASS)
        && !schema.has_unit_class(CLOCK_TIME_CLASS)
        && accepts(TIME_CLASS)
        && is_clock_face_time(value)
}

fn units_for_classes(schema: &dyn SchemaQuery, classes: &[&str]) -> Vec<String> {
    classes
        .iter()
        .filter_map(|class| schema.units_for_class(class))
        .flatten()
        .cloned()
        .collect()
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let mut capitalized: String = first.to_uppercase().collect();
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
        None => String::new(),
    }
}

/// Some run of upper-case letters or hyphens occurs in the segment,
/// optionally followed by whitespace and lower-case letters or hyphens:
/// `SensoryEvent`, `Sensory Event`, `sensoryEvent`, `EEG2`. The match is
/// unanchored, so the first upper-case letter or hyphen is enough.
fn is_camel_case(segment: &str) -> bool {
    segment.chars().any(|c| c.is_ascii_uppercase() || c == '-')
}
