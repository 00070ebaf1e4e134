//! Functions that check the validity of a project before it is settled.
//!
//! The settlement engine accepts any input and degrades gracefully. These are the
//! checks that request handlers run to reject inconsistent expenses in the first place.

use std::collections::HashSet;

mod expense;

use crate::error::ValidationError;
use crate::types::{ExpenseId, Participant, Project};
pub use expense::validate_expense;

/// A problem found in a project, with the expense it belongs to (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectIssue {
    pub expense_id: Option<ExpenseId>,
    pub error: ValidationError,
}

/// Check that no participant id is used twice.
pub fn validate_participants(participants: &[Participant]) -> Result<(), ValidationError> {
    // A HashSet returns false upon insertion if the element is already present.
    let mut uniq = HashSet::new();
    match participants.iter().find(|p| !uniq.insert(p.id.as_str())) {
        Some(p) => Err(ValidationError::duplicate_participant(&p.id)),
        None => Ok(()),
    }
}

/// Run every check on the project and collect all the problems found.
pub fn validate_project(project: &Project) -> Vec<ProjectIssue> {
    let participants = validate_participants(&project.participants)
        .err()
        .map(|error| ProjectIssue {
            expense_id: None,
            error,
        });

    let expenses = project.expenses.iter().filter_map(|expense| {
        validate_expense(expense, &project.participants)
            .err()
            .map(|error| ProjectIssue {
                expense_id: Some(expense.id.clone()),
                error,
            })
    });

    participants.into_iter().chain(expenses).collect()
}
