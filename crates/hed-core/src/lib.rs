//! # hed-core: Foundational Types for HED Tag Validation
//!
//! Defines the data the validation engine works on and produces. Every
//! other crate in the workspace depends on `hed-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Findings are data.** Validation never fails with an `Err`; it
//!    returns [`ValidationIssue`] records from the closed [`ErrorKind`]
//!    taxonomy. [`HedError`] is reserved for faults such as an unreadable
//!    dictionary or a validator built without the schema it needs.
//!
//! 2. **One schema capability.** Validators see the schema only through
//!    [`SchemaQuery`]. [`SchemaAttributeDictionary`] is the production
//!    implementation; tests can substitute a fake.
//!
//! 3. **Immutable schema.** A dictionary is normalized once at build time
//!    and never mutated afterwards, so one instance can serve any number of
//!    concurrent validations.
//!
//! 4. **Positions are character offsets.** Every index in an issue counts
//!    `char`s, not bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hed-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod hed_string;
pub mod issue;
pub mod schema;
pub mod tag;
pub mod temporal;

pub use error::HedError;
pub use hed_string::{HedGroup, HedNode, HedString};
pub use issue::{
    ErrorKind, IssueBuilder, IssueClass, IssueReporter, IssueSummary, Placeholders, Severity,
    ValidationIssue,
};
pub use schema::{
    AttributeValue, DictionaryBuilder, DictionarySnapshot, HedKey, SchemaAttributeDictionary,
    SchemaQuery,
};
pub use tag::HedTag;
pub use temporal::{is_clock_face_time, is_date_time};
