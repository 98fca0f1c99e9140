//! Plural forms of unit words.
//!
//! Unit words such as `second` or `metre` may appear pluralized in values
//! (`3 seconds`). Symbols are never pluralized and never reach this module.

use std::collections::HashMap;

/// Produces the plural of a unit word.
pub trait Pluralizer: Send + Sync {
    /// The plural form of `word`. May equal `word`.
    fn plural_of(&self, word: &str) -> String;
}

/// Regular English pluralization with an exception table.
#[derive(Debug, Clone)]
pub struct EnglishPluralizer {
    exceptions: HashMap<String, String>,
}

impl Default for EnglishPluralizer {
    fn default() -> Self {
        Self::empty()
            .with_exception("hertz", "hertz")
            .with_exception("foot", "feet")
    }
}

impl EnglishPluralizer {
    /// A pluralizer with no exceptions.
    pub fn empty() -> Self {
        Self {
            exceptions: HashMap::new(),
        }
    }

    /// Register an irregular plural. Lookups are case-insensitive.
    #[must_use]
    pub fn with_exception(mut self, singular: &str, plural: &str) -> Self {
        self.exceptions
            .insert(singular.to_lowercase(), plural.to_string());
        self
    }
}

impl Pluralizer for EnglishPluralizer {
    fn plural_of(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        if let Some(plural) = self.exceptions.get(&word.to_lowercase()) {
            return plural.clone();
        }
        let lower = word.to_lowercase();
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
            return format!("{word}es");
        }
        if let Some(stem) = word.strip_suffix(|c: char| c == 'y' || c == 'Y') {
            let before_y = stem.chars().last();
            if before_y.is_some_and(|c| !"aeiouAEIOU".contains(c)) {
                return format!("{stem}ies");
            }
        }
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_plurals() {
        let p = EnglishPluralizer::default();
        assert_eq!(p.plural_of("second"), "seconds");
        assert_eq!(p.plural_of("metre"), "metres");
        assert_eq!(p.plural_of("inch"), "inches");
        assert_eq!(p.plural_of("lux"), "luxes");
        assert_eq!(p.plural_of("candela"), "candelas");
    }

    #[test]
    fn consonant_y_becomes_ies() {
        let p = EnglishPluralizer::default();
        assert_eq!(p.plural_of("century"), "centuries");
        assert_eq!(p.plural_of("day"), "days");
    }

    #[test]
    fn exceptions_win() {
        let p = EnglishPluralizer::default();
        assert_eq!(p.plural_of("hertz"), "hertz");
        assert_eq!(p.plural_of("foot"), "feet");
    }

    #[test]
    fn custom_exceptions_can_be_added() {
        let p = EnglishPluralizer::empty().with_exception("Ohm", "ohm");
        assert_eq!(p.plural_of("ohm"), "ohm");
        assert_eq!(p.plural_of("hertz"), "hertzes");
    }

    #[test]
    fn empty_word_stays_empty() {
        assert_eq!(EnglishPluralizer::default().plural_of(""), "");
    }
}
