//! crates/portal_core/src/projection.rs
//!
//! Pure functions that turn the last successful load response into the
//! state a dashboard renders. Nothing here touches the network.

use std::collections::HashMap;

use crate::domain::{Assignment, AssignmentStatus, Submission};

/// Assignment id -> the latest submission for that assignment.
pub type SubmissionsByAssignment = HashMap<String, Submission>;

/// Keeps one submission per assignment: the one with the greatest
/// `created_at`. Equal timestamps resolve to the greatest `id`, so the
/// result does not depend on input order.
pub fn latest_submissions_by_assignment<I>(submissions: I) -> SubmissionsByAssignment
where
    I: IntoIterator<Item = Submission>,
{
    let mut latest = SubmissionsByAssignment::new();
    for submission in submissions {
        match latest.get(&submission.assignment_id) {
            Some(current) if !supersedes(&submission, current) => {}
            _ => {
                latest.insert(submission.assignment_id.clone(), submission);
            }
        }
    }
    latest
}

fn supersedes(candidate: &Submission, current: &Submission) -> bool {
    (candidate.created_at, &candidate.id) > (current.created_at, &current.id)
}

/// Summary counts shown above the teacher's assignment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    pub total: usize,
    pub draft: usize,
    pub published: usize,
    pub completed: usize,
}

impl AssignmentStats {
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        assignments.iter().fold(
            Self { total: assignments.len(), ..Self::default() },
            |mut stats, assignment| {
                match assignment.status {
                    AssignmentStatus::Draft => stats.draft += 1,
                    AssignmentStatus::Published => stats.published += 1,
                    AssignmentStatus::Completed => stats.completed += 1,
                }
                stats
            },
        )
    }
}
