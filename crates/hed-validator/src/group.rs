//! Group-level validation.
//!
//! Runs once per parenthesized group, after the tag and level checks. No
//! group rules are defined yet; the stage exists so that arity or nesting
//! rules can be added without changing the pipeline.

use hed_core::{HedGroup, ValidationIssue};

/// Validates parenthesized groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupValidator;

impl GroupValidator {
    /// Issues for one group. Currently always empty.
    pub fn run_tag_group_validators(&self, group: &HedGroup) -> Vec<ValidationIssue> {
        tracing::trace!(position = group.position(), "group validators");
        Vec::new()
    }
}
