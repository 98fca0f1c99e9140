//! # hed-validator: HED Annotation Validation Engine
//!
//! Decides whether an annotation string is legal under a schema and, if
//! not, reports every finding as a structured issue.
//!
//! ## Stages
//!
//! - [`lexical`]: raw-string structure (characters, parentheses,
//!   delimiters) and the tag-local formatting scan. Needs no schema.
//! - [`tag`]: per-tag existence, units, required children, and the
//!   capitalization and default-unit warnings.
//! - [`tag_list`]: duplicates and unique prefixes per nesting level, and
//!   required prefixes per string.
//! - [`group`]: per-group hook, currently without rules.
//! - [`validator`]: the [`HedValidator`] pipeline running the stages in
//!   order.
//!
//! ## Crate Policy
//!
//! - Validation returns issues, never `Err`. Construction fails only when
//!   semantic validation is requested without a schema.
//! - Validators borrow the schema read-only and hold no mutable state.
//! - No `unsafe` code.

pub mod config;
pub mod group;
pub mod lexical;
pub mod pluralize;
pub mod tag;
pub mod tag_list;
pub mod units;
pub mod validator;

pub use config::{ConfigError, ValidatorConfig};
pub use group::GroupValidator;
pub use lexical::LexicalValidator;
pub use pluralize::{EnglishPluralizer, Pluralizer};
pub use tag::TagValidator;
pub use tag_list::TagListValidator;
pub use units::{is_numeric_literal, UnitStripper};
pub use validator::HedValidator;
