//! services/portal/src/app/student.rs
//!
//! The student dashboard: visible assignments, the student's latest
//! submission per assignment, and the submission modal.

use chrono::{DateTime, Utc};
use portal_core::domain::{Assignment, NewSubmission, StatusFilter, Submission};
use portal_core::ports::{PortError, PortResult, PortalBackend};
use portal_core::projection::{latest_submissions_by_assignment, SubmissionsByAssignment};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::session::SessionStore;

/// The modal is either composing a new submission or showing an existing
/// one, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionModal {
    #[default]
    Closed,
    Composing {
        assignment: Assignment,
        content: String,
    },
    Viewing(Submission),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentProjection {
    pub assignments: Vec<Assignment>,
    pub submissions: SubmissionsByAssignment,
}

impl StudentProjection {
    pub fn new(assignments: Vec<Assignment>, submissions: Vec<Submission>) -> Self {
        Self {
            assignments,
            submissions: latest_submissions_by_assignment(submissions),
        }
    }
}

/// One line of the student's list.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentRow<'a> {
    pub assignment: &'a Assignment,
    pub submission: Option<&'a Submission>,
}

impl AssignmentRow<'_> {
    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submission.map(|s| s.created_at)
    }
}

pub struct StudentDashboard {
    backend: Arc<dyn PortalBackend>,
    sessions: Arc<SessionStore>,
    projection: StudentProjection,
    modal: SubmissionModal,
    stale: bool,
    lifecycle: CancellationToken,
}

impl StudentDashboard {
    pub fn new(backend: Arc<dyn PortalBackend>, sessions: Arc<SessionStore>) -> Self {
        Self {
            backend,
            sessions,
            projection: StudentProjection::default(),
            modal: SubmissionModal::Closed,
            stale: false,
            lifecycle: CancellationToken::new(),
        }
    }

    pub async fn mount(
        backend: Arc<dyn PortalBackend>,
        sessions: Arc<SessionStore>,
    ) -> PortResult<Self> {
        let mut dashboard = Self::new(backend, sessions);
        dashboard.load().await?;
        Ok(dashboard)
    }

    pub fn projection(&self) -> &StudentProjection {
        &self.projection
    }

    pub fn rows(&self) -> Vec<AssignmentRow<'_>> {
        self.projection
            .assignments
            .iter()
            .map(|assignment| AssignmentRow {
                assignment,
                submission: self.projection.submissions.get(&assignment.id),
            })
            .collect()
    }

    pub fn submission_for(&self, assignment_id: &str) -> Option<&Submission> {
        self.projection.submissions.get(assignment_id)
    }

    pub fn modal(&self) -> &SubmissionModal {
        &self.modal
    }

    /// True when a submission went through but the reload after it failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn unmount_handle(&self) -> CancellationToken {
        self.lifecycle.clone()
    }

    pub fn unmount(&self) {
        self.lifecycle.cancel();
    }

    //-------------------------------------------------------------------------------------
    // Load protocol
    //-------------------------------------------------------------------------------------

    /// Fetches visible assignments, then the student's submissions. Only the
    /// first fetch can fail the load; a failed submissions fetch counts as
    /// "nothing submitted yet".
    pub async fn load(&mut self) -> PortResult<()> {
        let assignments = self.backend.list_assignments(StatusFilter::All).await?;

        let student_id = self.sessions.current_session().and_then(|s| s.user_id);
        let submissions = match student_id {
            Some(student_id) => match self.backend.list_student_submissions(&student_id).await {
                Ok(list) => list,
                Err(e) => {
                    warn!("Could not fetch submissions for student {}: {}", student_id, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if self.lifecycle.is_cancelled() {
            debug!("Student dashboard unmounted, discarding load result");
            return Ok(());
        }
        self.projection = StudentProjection::new(assignments, submissions);
        self.stale = false;
        Ok(())
    }

    //-------------------------------------------------------------------------------------
    // Modal
    //-------------------------------------------------------------------------------------

    pub fn open_submit(&mut self, assignment_id: &str) -> PortResult<()> {
        let assignment = self
            .projection
            .assignments
            .iter()
            .find(|a| a.id == assignment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("assignment {}", assignment_id)))?;
        self.modal = SubmissionModal::Composing {
            assignment,
            content: String::new(),
        };
        Ok(())
    }

    pub fn open_view(&mut self, assignment_id: &str) -> PortResult<()> {
        let submission = self
            .submission_for(assignment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("submission for {}", assignment_id)))?;
        self.modal = SubmissionModal::Viewing(submission);
        Ok(())
    }

    pub fn set_content(&mut self, text: &str) -> PortResult<()> {
        match &mut self.modal {
            SubmissionModal::Composing { content, .. } => {
                *content = text.to_string();
                Ok(())
            }
            _ => Err(PortError::Validation("No submission is being composed".to_string())),
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = SubmissionModal::Closed;
    }

    //-------------------------------------------------------------------------------------
    // Mutation
    //-------------------------------------------------------------------------------------

    /// Sends the composed submission and reloads.
    ///
    /// Refused without a request when the projection already holds a
    /// submission for the assignment. The projection may be stale, so the
    /// backend still has the final say. A failed reload does not fail the
    /// submit: the created submission is kept in the projection so a retry
    /// is still refused.
    pub async fn submit(&mut self) -> PortResult<Submission> {
        let payload = match &self.modal {
            SubmissionModal::Composing { assignment, content } => NewSubmission {
                assignment_id: assignment.id.clone(),
                content: content.clone(),
            },
            _ => {
                return Err(PortError::Validation(
                    "Choose an assignment to submit first".to_string(),
                ))
            }
        };

        if !self.sessions.is_authenticated() {
            return Err(PortError::Validation("You must be logged in to submit.".to_string()));
        }

        if self.projection.submissions.contains_key(&payload.assignment_id) {
            self.close_modal();
            return Err(PortError::Validation(
                "You have already submitted this assignment.".to_string(),
            ));
        }

        let created = self.backend.create_submission(&payload).await?;
        info!("Submitted assignment {} as {}", payload.assignment_id, created.id);
        self.close_modal();

        if let Err(e) = self.load().await {
            warn!("Submitted, but the reload failed, projection is stale: {}", e);
            self.projection
                .submissions
                .insert(created.assignment_id.clone(), created.clone());
            self.stale = true;
        }
        Ok(created)
    }
}
