//! # Lexical Validation
//!
//! Structural checks on a raw annotation string that need no schema:
//! forbidden characters, parenthesis counts, and delimiter placement. Also
//! hosts the tag-local formatting scan, which is schema-free as well.
//!
//! Every scan is a single left-to-right pass over `char`s; reported
//! indices are character offsets.
//!
//! ## Delimiter scan
//!
//! State: the text of the tag being accumulated and the last
//! non-whitespace character seen.
//!
//! | Input | Condition | Action |
//! |---|---|---|
//! | `,` | buffer is only the comma | `EMPTY_TAG`, reset buffer, keep last char |
//! | `,` | otherwise | reset buffer |
//! | `(` | buffer is only the paren | reset buffer |
//! | `(` | otherwise | `COMMA_MISSING` with the buffered tag |
//! | other, not `)` | last char was `)` | `COMMA_MISSING`, stop scanning |
//!
//! A trailing comma yields a final `EMPTY_TAG` at its index. Stopping after
//! the close-paren case means later delimiter problems in the same string
//! go unreported.

use hed_core::{ErrorKind, HedTag, IssueBuilder, Placeholders, ValidationIssue};

/// Characters never allowed in an annotation string.
pub const INVALID_STRING_CHARS: [char; 5] = ['[', ']', '{', '}', '~'];
/// Separates tags and groups.
pub const DELIMITER: char = ',';
/// Opens a group.
pub const OPENING_GROUP: char = '(';
/// Closes a group.
pub const CLOSING_GROUP: char = ')';

/// Schema-free checks on raw strings and single tags.
#[derive(Clone, Copy)]
pub struct LexicalValidator<'a> {
    reporter: &'a dyn IssueBuilder,
}

impl<'a> LexicalValidator<'a> {
    /// Report through `reporter`.
    pub fn new(reporter: &'a dyn IssueBuilder) -> Self {
        Self { reporter }
    }

    /// All string-level lexical checks, in order: characters, parentheses,
    /// delimiters.
    pub fn run_hed_string_validators(&self, hed_string: &str) -> Vec<ValidationIssue> {
        let mut issues = self.find_invalid_character_issues(hed_string);
        issues.extend(self.count_tag_group_parentheses(hed_string));
        issues.extend(self.find_delimiter_issues(hed_string));
        issues
    }

    /// One issue per forbidden character. `~` is reported as
    /// `TILDES_NOT_SUPPORTED`, the rest as `INVALID_CHARACTER`.
    pub fn find_invalid_character_issues(&self, hed_string: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (index, character) in hed_string.chars().enumerate() {
            if !INVALID_STRING_CHARS.contains(&character) {
                continue;
            }
            let kind = if character == '~' {
                ErrorKind::TildesNotSupported
            } else {
                ErrorKind::InvalidCharacter
            };
            issues.extend(self.reporter.error(
                kind,
                Placeholders::character_at(character, index, hed_string),
            ));
        }
        issues
    }

    /// A single `PARENTHESES` issue when the `(` and `)` counts differ.
    /// Nesting order is not checked.
    pub fn count_tag_group_parentheses(&self, hed_string: &str) -> Vec<ValidationIssue> {
        let (opening, closing) = hed_string.chars().fold((0, 0), |(open, close), c| match c {
            OPENING_GROUP => (open + 1, close),
            CLOSING_GROUP => (open, close + 1),
            _ => (open, close),
        });
        if opening == closing {
            return Vec::new();
        }
        self.reporter.error(
            ErrorKind::Parentheses,
            Placeholders {
                opening_count: Some(opening),
                closing_count: Some(closing),
                source: Some(hed_string.to_string()),
                ..Placeholders::default()
            },
        )
    }

    /// Empty tags and missing commas around groups.
    pub fn find_delimiter_issues(&self, hed_string: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut current_tag = String::new();
        let mut last_non_empty: Option<(usize, char)> = None;

        for (index, character) in hed_string.chars().enumerate() {
            current_tag.push(character);
            if character.is_whitespace() {
                continue;
            }
            if character == DELIMITER {
                let is_empty = current_tag.trim() == ",";
                current_tag.clear();
                if is_empty {
                    issues.extend(self.reporter.error(
                        ErrorKind::EmptyTag,
                        Placeholders::character_at(character, index, hed_string),
                    ));
                    continue;
                }
            } else if character == OPENING_GROUP {
                if current_tag.trim() == "(" {
                    current_tag.clear();
                } else {
                    let tag = without_last(&current_tag).trim();
                    issues.extend(self.comma_missing(tag, index));
                }
            } else if last_non_empty.is_some_and(|(_, last)| last == CLOSING_GROUP)
                && character != CLOSING_GROUP
            {
                issues.extend(self.comma_missing(without_last(&current_tag), index));
                break;
            }
            last_non_empty = Some((index, character));
        }

        if let Some((index, DELIMITER)) = last_non_empty {
            issues.extend(self.reporter.error(
                ErrorKind::EmptyTag,
                Placeholders::character_at(DELIMITER, index, hed_string),
            ));
        }
        issues
    }

    /// `COMMA_MISSING` naming `tag`, found at `index`.
    fn comma_missing(&self, tag: &str, index: usize) -> Vec<ValidationIssue> {
        self.reporter.error(
            ErrorKind::CommaMissing,
            Placeholders {
                tag: Some(tag.to_string()),
                index: Some(index),
                ..Placeholders::default()
            },
        )
    }

    /// One `EXTRA_SLASHES_OR_SPACES` per run of two or more slash, space, or
    /// tab characters, and for a leading or trailing slash.
    ///
    /// Runs are matched greedily left to right and never overlap; a
    /// leading or trailing slash that is part of a longer run is reported
    /// once, as the run.
    pub fn check_tag_formatting(&self, tag: &HedTag) -> Vec<ValidationIssue> {
        let chars: Vec<char> = tag.text().chars().collect();
        let mut issues = Vec::new();
        let mut index = 0;

        while index < chars.len() {
            let run = chars[index..]
                .iter()
                .take_while(|&&c| is_slash_or_blank(c))
                .count();
            if run >= 2 {
                let matched: String = chars[index..index + run].iter().collect();
                issues.extend(self.formatting_issue(tag, matched, index));
                index += run;
                continue;
            }
            let at_edge = index == 0 || index == chars.len() - 1;
            if chars[index] == '/' && at_edge {
                issues.extend(self.formatting_issue(tag, "/".to_string(), index));
            }
            index += 1;
        }
        issues
    }

    fn formatting_issue(&self, tag: &HedTag, matched: String, index: usize) -> Vec<ValidationIssue> {
        self.reporter.error(
            ErrorKind::ExtraSlashesOrSpaces,
            Placeholders {
                tag: Some(tag.text().to_string()),
                character: Some(matched),
                index: Some(index),
                ..Placeholders::default()
            },
        )
    }
}

fn is_slash_or_blank(c: char) -> bool {
    matches!(c, '/' | ' ' | '\t')
}

/// The buffer without the character that triggered the finding.
fn without_last(buffer: &str) -> &str {
    let mut chars = buffer.chars();
    chars.next_back();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::IssueReporter;

    fn lexical() -> LexicalValidator<'static> {
        LexicalValidator::new(&IssueReporter)
    }

    fn kinds(issues: &[ValidationIssue]) -> Vec<ErrorKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn invalid_characters_reported_at_each_index() {
        let issues = lexical().find_invalid_character_issues("A[b]{c}");
        let indices: Vec<usize> = issues.iter().filter_map(|i| i.placeholders.index).collect();
        assert_eq!(indices, vec![1, 3, 4, 6]);
        assert!(issues.iter().all(|i| i.kind == ErrorKind::InvalidCharacter));
    }

    #[test]
    fn tilde_has_its_own_code() {
        let issues = lexical().find_invalid_character_issues("A~B");
        assert_eq!(kinds(&issues), vec![ErrorKind::TildesNotSupported]);
        assert_eq!(issues[0].placeholders.index, Some(1));
        assert_eq!(issues[0].placeholders.character.as_deref(), Some("~"));
    }

    #[test]
    fn invalid_character_index_counts_chars() {
        let issues = lexical().find_invalid_character_issues("é[");
        assert_eq!(issues[0].placeholders.index, Some(1));
    }

    #[test]
    fn parentheses_mismatch_carries_counts() {
        let issues = lexical().count_tag_group_parentheses("((A), B");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].placeholders.opening_count, Some(2));
        assert_eq!(issues[0].placeholders.closing_count, Some(1));
    }

    #[test]
    fn parentheses_badly_nested_but_balanced_is_fine() {
        assert!(lexical().count_tag_group_parentheses(")A(").is_empty());
    }

    #[test]
    fn lone_comma_reported_once() {
        let issues = lexical().find_delimiter_issues(",");
        assert_eq!(kinds(&issues), vec![ErrorKind::EmptyTag]);
        assert_eq!(issues[0].placeholders.index, Some(0));
    }

    #[test]
    fn double_comma_is_empty_tag() {
        let issues = lexical().find_delimiter_issues("A,,B");
        assert_eq!(kinds(&issues), vec![ErrorKind::EmptyTag]);
        assert_eq!(issues[0].placeholders.index, Some(2));
    }

    #[test]
    fn comma_and_blank_is_empty_tag() {
        let issues = lexical().find_delimiter_issues("A, ,B");
        assert_eq!(issues[0].placeholders.index, Some(3));
    }

    #[test]
    fn trailing_comma_is_empty_tag() {
        let issues = lexical().find_delimiter_issues("A, B, ");
        assert_eq!(kinds(&issues), vec![ErrorKind::EmptyTag]);
        assert_eq!(issues[0].placeholders.index, Some(4));
    }

    #[test]
    fn tag_directly_before_group() {
        let issues = lexical().find_delimiter_issues("A(B");
        assert_eq!(kinds(&issues), vec![ErrorKind::CommaMissing]);
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("A"));
    }

    #[test]
    fn well_formed_groups_pass() {
        assert!(lexical().find_delimiter_issues("A,(B),C").is_empty());
        assert!(lexical().find_delimiter_issues("(A, (B, C)), D").is_empty());
        assert!(lexical().find_delimiter_issues("((A))").is_empty());
    }

    #[test]
    fn tag_after_group_stops_the_scan() {
        let issues = lexical().find_delimiter_issues("A,(B)C,,D,");
        assert_eq!(kinds(&issues), vec![ErrorKind::CommaMissing]);
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("B)"));
        assert_eq!(issues[0].placeholders.index, Some(5));
    }

    #[test]
    fn whitespace_between_group_and_tag_still_missing_comma() {
        let issues = lexical().find_delimiter_issues("(A) B");
        assert_eq!(kinds(&issues), vec![ErrorKind::CommaMissing]);
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("A) "));
        assert_eq!(issues[0].placeholders.index, Some(4));
    }

    #[test]
    fn tag_before_group_is_trimmed() {
        let issues = lexical().find_delimiter_issues("A, B (C)");
        assert_eq!(kinds(&issues), vec![ErrorKind::CommaMissing]);
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("B"));
        assert_eq!(issues[0].placeholders.index, Some(5));
    }

    #[test]
    fn adjacent_groups_missing_comma() {
        let issues = lexical().find_delimiter_issues("(A)(B)");
        assert_eq!(kinds(&issues), vec![ErrorKind::CommaMissing]);
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("A)"));
    }

    #[test]
    fn string_validators_run_in_order() {
        let issues = lexical().run_hed_string_validators("A[,(B");
        assert_eq!(
            kinds(&issues),
            vec![ErrorKind::InvalidCharacter, ErrorKind::Parentheses]
        );
    }

    #[test]
    fn formatting_flags_double_slash() {
        let tag = HedTag::new("Event//Label", 0);
        let issues = lexical().check_tag_formatting(&tag);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].placeholders.character.as_deref(), Some("//"));
        assert_eq!(issues[0].placeholders.index, Some(5));
        assert_eq!(issues[0].placeholders.tag.as_deref(), Some("Event//Label"));
    }

    #[test]
    fn formatting_flags_leading_and_trailing_slash() {
        let tag = HedTag::new("/Event/Label/", 0);
        let issues = lexical().check_tag_formatting(&tag);
        let indices: Vec<usize> = issues.iter().filter_map(|i| i.placeholders.index).collect();
        assert_eq!(indices, vec![0, 12]);
    }

    #[test]
    fn formatting_flags_blank_runs() {
        let tag = HedTag::new("Event/Label/a  b/c \t/d", 0);
        let issues = lexical().check_tag_formatting(&tag);
        let matched: Vec<&str> = issues
            .iter()
            .filter_map(|i| i.placeholders.character.as_deref())
            .collect();
        assert_eq!(matched, vec!["  ", " \t/"]);
    }

    #[test]
    fn formatting_accepts_clean_tags() {
        let tag = HedTag::new("Event/Duration/3 ms", 0);
        assert!(lexical().check_tag_formatting(&tag).is_empty());
    }

    #[test]
    fn formatting_lone_slash_reported_once() {
        let tag = HedTag::new("/", 0);
        assert_eq!(lexical().check_tag_formatting(&tag).len(), 1);
    }
}
