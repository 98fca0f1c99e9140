//! # Validation Issues
//!
//! The validator reports *what* went wrong and *where*, never how to say
//! it. Every finding is a [`ValidationIssue`]: an [`ErrorKind`] from the
//! closed taxonomy, a [`Severity`], and a bag of named [`Placeholders`]
//! that a downstream renderer turns into prose.
//!
//! Issues are built through the [`IssueBuilder`] collaborator so callers can
//! substitute their own construction (for example to attach file and line
//! context) without touching the validator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an issue blocks acceptance of the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The annotation is not legal under the schema.
    Error,
    /// The annotation is legal but questionable.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Broad family an [`ErrorKind`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueClass {
    /// Raw-string structure, detected without a schema.
    Lexical,
    /// Malformed slashes or whitespace inside a single tag.
    Formatting,
    /// Schema-backed checks on tags and tag lists.
    Semantic,
}

/// The closed taxonomy of validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A character from `[]{}` appeared in the string.
    InvalidCharacter,
    /// A `~` appeared in the string.
    TildesNotSupported,
    /// Opening and closing parenthesis counts differ.
    Parentheses,
    /// A delimiter with no tag before it, or a trailing delimiter.
    EmptyTag,
    /// Two tags or groups are adjacent without a delimiter.
    CommaMissing,
    /// Doubled slashes/whitespace or a leading/trailing slash in a tag.
    ExtraSlashesOrSpaces,
    /// The tag is not in the schema and no ancestor allows extension.
    InvalidTag,
    /// The value of a unit-class tag carries no acceptable unit.
    UnitClassInvalidUnit,
    /// The tag must be followed by a more specific descendant.
    RequireChild,
    /// The same tag appears twice at one nesting level.
    Duplicate,
    /// More than one tag at a level starts with a unique prefix.
    MultipleUnique,
    /// A path segment is not capitalized.
    Capitalization,
    /// A unit-class value has no unit, so the default unit applies.
    UnitClassDefaultUsed,
    /// No tag in the string starts with a required prefix.
    RequiredPrefixMissing,
}

impl ErrorKind {
    /// Every kind, in taxonomy order.
    pub const ALL: [ErrorKind; 14] = [
        ErrorKind::InvalidCharacter,
        ErrorKind::TildesNotSupported,
        ErrorKind::Parentheses,
        ErrorKind::EmptyTag,
        ErrorKind::CommaMissing,
        ErrorKind::ExtraSlashesOrSpaces,
        ErrorKind::InvalidTag,
        ErrorKind::UnitClassInvalidUnit,
        ErrorKind::RequireChild,
        ErrorKind::Duplicate,
        ErrorKind::MultipleUnique,
        ErrorKind::Capitalization,
        ErrorKind::UnitClassDefaultUsed,
        ErrorKind::RequiredPrefixMissing,
    ];

    /// The stable code string, e.g. `"COMMA_MISSING"`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacter => "INVALID_CHARACTER",
            ErrorKind::TildesNotSupported => "TILDES_NOT_SUPPORTED",
            ErrorKind::Parentheses => "PARENTHESES",
            ErrorKind::EmptyTag => "EMPTY_TAG",
            ErrorKind::CommaMissing => "COMMA_MISSING",
            ErrorKind::ExtraSlashesOrSpaces => "EXTRA_SLASHES_OR_SPACES",
            ErrorKind::InvalidTag => "INVALID_TAG",
            ErrorKind::UnitClassInvalidUnit => "UNIT_CLASS_INVALID_UNIT",
            ErrorKind::RequireChild => "REQUIRE_CHILD",
            ErrorKind::Duplicate => "DUPLICATE",
            ErrorKind::MultipleUnique => "MULTIPLE_UNIQUE",
            ErrorKind::Capitalization => "CAPITALIZATION",
            ErrorKind::UnitClassDefaultUsed => "UNIT_CLASS_DEFAULT_USED",
            ErrorKind::RequiredPrefixMissing => "REQUIRED_PREFIX_MISSING",
        }
    }

    /// The family this kind belongs to.
    pub fn class(&self) -> IssueClass {
        match self {
            ErrorKind::InvalidCharacter
            | ErrorKind::TildesNotSupported
            | ErrorKind::Parentheses
            | ErrorKind::EmptyTag
            | ErrorKind::CommaMissing => IssueClass::Lexical,
            ErrorKind::ExtraSlashesOrSpaces => IssueClass::Formatting,
            _ => IssueClass::Semantic,
        }
    }

    /// Severity this kind is normally reported with.
    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorKind::Capitalization
            | ErrorKind::UnitClassDefaultUsed
            | ErrorKind::RequiredPrefixMissing => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Named values a renderer substitutes into the message for an issue.
///
/// Only the fields relevant to the issue's kind are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholders {
    /// Original-case tag text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Offending character or matched substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    /// Character offset of the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Number of `(` in the string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_count: Option<usize>,
    /// Number of `)` in the string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_count: Option<usize>,
    /// Display form of a unique or required prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Comma-joined unit list, or a single default unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// The full annotation string a lexical finding came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Placeholders {
    /// Placeholders carrying only a tag.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Placeholders carrying only a prefix.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Placeholders for a character found at `index` of `source`.
    pub fn character_at(character: impl Into<String>, index: usize, source: &str) -> Self {
        Self {
            character: Some(character.into()),
            index: Some(index),
            source: Some(source.to_string()),
            ..Self::default()
        }
    }

    /// Attach a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach a unit list or unit.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    fn write_fields(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, " tag={tag:?}")?;
        }
        if let Some(character) = &self.character {
            write!(f, " character={character:?}")?;
        }
        if let Some(index) = self.index {
            write!(f, " index={index}")?;
        }
        if let (Some(open), Some(close)) = (self.opening_count, self.closing_count) {
            write!(f, " opening={open} closing={close}")?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, " prefix={prefix:?}")?;
        }
        if let Some(units) = &self.units {
            write!(f, " units={units:?}")?;
        }
        Ok(())
    }
}

/// A single finding. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// What was found.
    pub kind: ErrorKind,
    /// Whether it blocks acceptance.
    pub severity: Severity,
    /// Values for the renderer.
    pub placeholders: Placeholders,
}

impl ValidationIssue {
    /// Build an issue with an explicit severity.
    pub fn new(kind: ErrorKind, severity: Severity, placeholders: Placeholders) -> Self {
        Self {
            kind,
            severity,
            placeholders,
        }
    }

    /// True for error-severity issues.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.kind)?;
        self.placeholders.write_fields(f)
    }
}

/// Constructs issue records on behalf of the validators.
///
/// Implementations may return more than one record per call (for example a
/// primary issue plus a context note) or none at all to suppress a kind.
pub trait IssueBuilder: Send + Sync {
    /// Build error-severity records for `kind`.
    fn error(&self, kind: ErrorKind, placeholders: Placeholders) -> Vec<ValidationIssue>;

    /// Build warning-severity records for `kind`.
    fn warning(&self, kind: ErrorKind, placeholders: Placeholders) -> Vec<ValidationIssue>;
}

/// Default [`IssueBuilder`]: exactly one record per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueReporter;

impl IssueBuilder for IssueReporter {
    fn error(&self, kind: ErrorKind, placeholders: Placeholders) -> Vec<ValidationIssue> {
        tracing::trace!(code = kind.code(), "reporting validation error");
        vec![ValidationIssue::new(kind, Severity::Error, placeholders)]
    }

    fn warning(&self, kind: ErrorKind, placeholders: Placeholders) -> Vec<ValidationIssue> {
        tracing::trace!(code = kind.code(), "reporting validation warning");
        vec![ValidationIssue::new(kind, Severity::Warning, placeholders)]
    }
}

/// Error and warning counts over a slice of issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    /// Number of error-severity issues.
    pub errors: usize,
    /// Number of warning-severity issues.
    pub warnings: usize,
}

impl IssueSummary {
    /// Count the issues in `issues`.
    pub fn of(issues: &[ValidationIssue]) -> Self {
        issues.iter().fold(Self::default(), |mut acc, issue| {
            match issue.severity {
                Severity::Error => acc.errors += 1,
                Severity::Warning => acc.warnings += 1,
            }
            acc
        })
    }

    /// True when at least one error was found.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
