//! Canonical order validation
//!
//! Global invariants enforced:
//! - A unit already in canonical order yields no violations
//! - At most one violation per statement
//! - Violations are reported in source order

use crate::ast::Statement;
use crate::classify::{Category, ClassifiedGroups};

/// A statement that appears before material it must follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Index of the offending statement
    pub statement: usize,
    /// Category of the offending statement
    pub category: Category,
    /// Category it is interleaved with and must follow
    pub must_follow: Category,
    pub message: String,
}

impl Violation {
    fn new(statement: usize, category: Category, must_follow: Category) -> Self {
        Violation {
            statement,
            category,
            must_follow,
            message: format!("{} must follow {}", category.label(), must_follow.plural()),
        }
    }
}

/// Find every statement that starts before some statement of the preceding
/// category ends
///
/// Only neighbouring categories are compared: declarations against imports,
/// functions against declarations, lifecycle calls against functions.
pub fn validate(statements: &[Statement], groups: &ClassifiedGroups) -> Vec<Violation> {
    let mut violations = Vec::new();

    for later in Category::ALL {
        let Some(earlier) = later.previous() else {
            continue;
        };
        let earlier_end = groups
            .get(earlier)
            .iter()
            .map(|&e| statements[e].range.end)
            .max();
        let Some(earlier_end) = earlier_end else {
            continue;
        };
        for &l in groups.get(later) {
            if statements[l].range.start < earlier_end {
                violations.push(Violation::new(l, later, earlier));
            }
        }
    }

    violations.sort_by_key(|v| statements[v.statement].range.start);
    violations
}

/// Classified statement indices in their current source order
pub fn current_order(groups: &ClassifiedGroups) -> Vec<usize> {
    let mut order: Vec<usize> = Category::ALL
        .iter()
        .flat_map(|c| groups.get(*c).iter().copied())
        .collect();
    order.sort_unstable();
    order
}

/// Classified statement indices in canonical order
///
/// Stable: statements of one category keep their relative order.
pub fn canonical_order(groups: &ClassifiedGroups) -> Vec<usize> {
    Category::ALL
        .iter()
        .flat_map(|c| groups.get(*c).iter().copied())
        .collect()
}

/// Structural check whether the unit needs reordering
pub fn needs_reorder(groups: &ClassifiedGroups) -> bool {
    current_order(groups) != canonical_order(groups)
}
