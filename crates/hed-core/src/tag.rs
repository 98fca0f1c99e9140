//! # Tags
//!
//! A [`HedTag`] is one slash-delimited path extracted from an annotation
//! string, e.g. `Event/Duration/3 ms`. The final segment may be a
//! vocabulary term, a free value, a value with a unit, or `#`.
//!
//! The lower-cased path and the byte offset of every `/` in it are computed
//! once at construction. Ancestor lookups walk that offset table instead of
//! re-scanning and re-allocating the path for each prefix.

use std::fmt;

use serde::Serialize;

/// One tag and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HedTag {
    text: String,
    #[serde(skip)]
    lower: String,
    position: usize,
    #[serde(skip)]
    slash_indices: Vec<usize>,
}

impl HedTag {
    /// Create a tag from its surface text and its character offset in the
    /// owning string.
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        let slash_indices = lower
            .char_indices()
            .filter(|&(_, c)| c == '/')
            .map(|(i, _)| i)
            .collect();
        Self {
            text,
            lower,
            position,
            slash_indices,
        }
    }

    /// Original-case text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lower-cased path used for schema lookups.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Character offset of the tag in its annotation string.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offsets of `/` in [`lower`](Self::lower).
    pub fn slash_indices(&self) -> &[usize] {
        &self.slash_indices
    }

    /// Lower-cased prefixes ending at each slash, in order.
    ///
    /// A slash at offset 0 yields the whole path rather than an empty
    /// prefix.
    pub fn ancestor_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.slash_indices.iter().map(move |&index| {
            if index == 0 {
                self.lower.as_str()
            } else {
                &self.lower[..index]
            }
        })
    }

    /// Lower-cased text after the final slash, or the whole path.
    pub fn value_segment(&self) -> &str {
        match self.slash_indices.last() {
            Some(&index) => &self.lower[index + 1..],
            None => &self.lower,
        }
    }

    /// Original-case text after the final slash, or the whole path.
    pub fn original_value_segment(&self) -> &str {
        match self.text.rfind('/') {
            Some(index) => &self.text[index + 1..],
            None => &self.text,
        }
    }

    /// The lower-cased path with its final segment replaced by `#`.
    ///
    /// A single-segment tag becomes `#`.
    pub fn takes_value_form(&self) -> String {
        match self.slash_indices.last() {
            Some(&index) => format!("{}/#", &self.lower[..index]),
            None => "#".to_string(),
        }
    }

    /// Original-case path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.split('/')
    }
}

impl fmt::Display for HedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for HedTag {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
