//! # Annotation Strings
//!
//! Splits a raw annotation string such as
//! `Event/Label/Go, (Item/Ball, Attribute/Color/Red)` into tags and
//! parenthesized groups, keeping document order and character offsets.
//!
//! Tokenization assumes lexical validation already ran: empty tokens are
//! skipped silently and delimiter placement is not re-checked. Unbalanced
//! or ill-nested parentheses are the only tokenization failures.

use serde::Serialize;

use crate::error::HedError;
use crate::tag::HedTag;

/// One element of a group: a tag or a nested group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HedNode {
    /// A single tag.
    Tag(HedTag),
    /// A parenthesized group.
    Group(HedGroup),
}

/// A nesting level: the top level of a string or one parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HedGroup {
    position: usize,
    children: Vec<HedNode>,
}

impl HedGroup {
    fn new(position: usize) -> Self {
        Self {
            position,
            children: Vec::new(),
        }
    }

    /// Character offset of the opening `(`, or 0 for the top level.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Children in document order.
    pub fn children(&self) -> &[HedNode] {
        &self.children
    }

    /// Tags directly at this level.
    pub fn tags(&self) -> impl Iterator<Item = &HedTag> + '_ {
        self.children.iter().filter_map(|node| match node {
            HedNode::Tag(tag) => Some(tag),
            HedNode::Group(_) => None,
        })
    }

    /// Groups directly at this level.
    pub fn groups(&self) -> impl Iterator<Item = &HedGroup> + '_ {
        self.children.iter().filter_map(|node| match node {
            HedNode::Group(group) => Some(group),
            HedNode::Tag(_) => None,
        })
    }

    fn collect_tags<'a>(&'a self, acc: &mut Vec<&'a HedTag>) {
        for node in &self.children {
            match node {
                HedNode::Tag(tag) => acc.push(tag),
                HedNode::Group(group) => group.collect_tags(acc),
            }
        }
    }

    fn collect_groups<'a>(&'a self, acc: &mut Vec<&'a HedGroup>) {
        for group in self.groups() {
            acc.push(group);
            group.collect_groups(acc);
        }
    }
}

/// A tokenized annotation string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HedString {
    raw: String,
    root: HedGroup,
}

impl HedString {
    /// Tokenize `raw` into tags and groups.
    ///
    /// # Errors
    ///
    /// Returns `HedError::Tokenize` on a `)` with no open group or a `(`
    /// that is never closed.
    pub fn parse(raw: &str) -> Result<Self, HedError> {
        let mut parents: Vec<HedGroup> = Vec::new();
        let mut current = HedGroup::new(0);
        let mut token = String::new();
        let mut token_start: Option<usize> = None;

        for (index, c) in raw.chars().enumerate() {
            match c {
                ',' => flush_token(&mut current, &mut token, &mut token_start),
                '(' => {
                    flush_token(&mut current, &mut token, &mut token_start);
                    parents.push(std::mem::replace(&mut current, HedGroup::new(index)));
                }
                ')' => {
                    flush_token(&mut current, &mut token, &mut token_start);
                    let Some(parent) = parents.pop() else {
                        return Err(HedError::Tokenize {
                            index,
                            reason: "closing parenthesis without an open group".into(),
                        });
                    };
                    let finished = std::mem::replace(&mut current, parent);
                    current.children.push(HedNode::Group(finished));
                }
                _ => {
                    if token_start.is_none() && !c.is_whitespace() {
                        token_start = Some(index);
                    }
                    token.push(c);
                }
            }
        }
        flush_token(&mut current, &mut token, &mut token_start);

        if !parents.is_empty() {
            return Err(HedError::Tokenize {
                index: current.position,
                reason: "group is never closed".into(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            root: current,
        })
    }

    /// The string as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The top nesting level.
    pub fn top_level(&self) -> &HedGroup {
        &self.root
    }

    /// Every tag at every depth, in document order.
    pub fn all_tags(&self) -> Vec<&HedTag> {
        let mut tags = Vec::new();
        self.root.collect_tags(&mut tags);
        tags
    }

    /// Every parenthesized group at every depth, outer groups first.
    pub fn all_groups(&self) -> Vec<&HedGroup> {
        let mut groups = Vec::new();
        self.root.collect_groups(&mut groups);
        groups
    }

    /// The top level followed by every group, depth first.
    pub fn levels(&self) -> Vec<&HedGroup> {
        let mut levels = vec![&self.root];
        levels.extend(self.all_groups());
        levels
    }
}

fn flush_token(group: &mut HedGroup, token: &mut String, start: &mut Option<usize>) {
    let text = token.trim();
    if let (false, Some(position)) = (text.is_empty(), *start) {
        group.children.push(HedNode::Tag(HedTag::new(text, position)));
    }
    token.clear();
    *start = None;
}
