//! # Error Types: Structured Error Hierarchy
//!
//! Errors here are faults: a dictionary that cannot be loaded, a builder
//! fed contradictory input, a validator constructed without the schema it
//! needs. Validation *findings* are never errors; they are
//! [`ValidationIssue`](crate::issue::ValidationIssue) records.

use thiserror::Error;

/// Top-level error type for HED validation.
#[derive(Error, Debug)]
pub enum HedError {
    /// A dictionary snapshot could not be read or decoded.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path or identifier of the snapshot.
        path: String,
        /// Reason the snapshot could not be loaded.
        reason: String,
    },

    /// The dictionary contents are inconsistent.
    #[error("invalid schema attribute dictionary: {0}")]
    InvalidDictionary(String),

    /// Semantic validation was requested but no schema was supplied.
    #[error("semantic validation requires a schema attribute dictionary")]
    SchemaRequired,

    /// The annotation string could not be split into tags and groups.
    #[error("cannot tokenize annotation at character {index}: {reason}")]
    Tokenize {
        /// Character offset where tokenization failed.
        index: usize,
        /// What went wrong.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HedError {
    fn from(err: serde_json::Error) -> Self {
        HedError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for HedError {
    fn from(err: serde_yaml::Error) -> Self {
        HedError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_error_names_the_index() {
        let err = HedError::Tokenize {
            index: 7,
            reason: "unexpected ')'".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot tokenize annotation at character 7: unexpected ')'"
        );
    }

    #[test]
    fn json_errors_convert_to_serialization() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HedError = bad.into();
        assert!(matches!(err, HedError::Serialization(_)));
    }
}
