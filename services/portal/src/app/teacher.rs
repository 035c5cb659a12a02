//! services/portal/src/app/teacher.rs
//!
//! The teacher dashboard: a projection of the teacher's assignments plus the
//! create/update/delete operations. Every successful write is followed by a
//! full reload; the projection is never patched in place. A reload that
//! fails after a successful write leaves the dashboard marked stale.

use chrono::NaiveDate;
use portal_core::domain::{
    Assignment, AssignmentStatus, AssignmentUpdate, NewAssignment, StatusFilter, Submission,
};
use portal_core::ports::{PortError, PortResult, PortalBackend};
use portal_core::projection::AssignmentStats;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::session::SessionStore;

//=========================================================================================
// Form
//=========================================================================================

/// The create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentForm {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
}

impl Default for AssignmentForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: None,
            status: AssignmentStatus::Published,
        }
    }
}

impl AssignmentForm {
    /// Prefills the form for editing an existing assignment.
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            due_date: assignment.due_date.map(|d| d.date_naive()),
            status: assignment.status,
        }
    }

    pub fn validate(&self) -> PortResult<()> {
        if self.title.trim().is_empty() {
            return Err(PortError::Validation("Title required".to_string()));
        }
        Ok(())
    }

    fn to_new(&self, created_by: Option<String>) -> NewAssignment {
        NewAssignment {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            due_date: self.due_date,
            status: self.status,
            created_by,
        }
    }

    fn to_update(&self, created_by: Option<String>) -> AssignmentUpdate {
        AssignmentUpdate {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            due_date: Some(self.due_date),
            status: Some(self.status),
            created_by,
        }
    }
}

//=========================================================================================
// Projection
//=========================================================================================

/// What the teacher sees: the list as last loaded and counts derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherProjection {
    pub assignments: Vec<Assignment>,
    pub stats: AssignmentStats,
}

impl TeacherProjection {
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        let stats = AssignmentStats::from_assignments(&assignments);
        Self { assignments, stats }
    }
}

//=========================================================================================
// Dashboard
//=========================================================================================

pub struct TeacherDashboard {
    backend: Arc<dyn PortalBackend>,
    sessions: Arc<SessionStore>,
    filter: StatusFilter,
    projection: TeacherProjection,
    stale: bool,
    lifecycle: CancellationToken,
}

impl TeacherDashboard {
    pub fn new(backend: Arc<dyn PortalBackend>, sessions: Arc<SessionStore>) -> Self {
        Self {
            backend,
            sessions,
            filter: StatusFilter::All,
            projection: TeacherProjection::default(),
            stale: false,
            lifecycle: CancellationToken::new(),
        }
    }

    /// Creates the dashboard and runs the initial load.
    pub async fn mount(
        backend: Arc<dyn PortalBackend>,
        sessions: Arc<SessionStore>,
        filter: StatusFilter,
    ) -> PortResult<Self> {
        let mut dashboard = Self::new(backend, sessions);
        dashboard.filter = filter;
        dashboard.load().await?;
        Ok(dashboard)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.projection.assignments
    }

    pub fn stats(&self) -> AssignmentStats {
        self.projection.stats
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn find(&self, assignment_id: &str) -> Option<&Assignment> {
        self.projection.assignments.iter().find(|a| a.id == assignment_id)
    }

    /// True when a write went through but the reload after it failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// A handle that unmounts the dashboard when cancelled, usable while a
    /// load is in flight.
    pub fn unmount_handle(&self) -> CancellationToken {
        self.lifecycle.clone()
    }

    pub fn unmount(&self) {
        self.lifecycle.cancel();
    }

    fn teacher_id(&self) -> Option<String> {
        self.sessions.current_session().and_then(|s| s.user_id)
    }

    //-------------------------------------------------------------------------------------
    // Load protocol
    //-------------------------------------------------------------------------------------

    /// Replaces the projection with a fresh listing. On error the previous
    /// projection is kept.
    pub async fn load(&mut self) -> PortResult<()> {
        let assignments = self.fetch_assignments().await?;
        if self.lifecycle.is_cancelled() {
            debug!("Teacher dashboard unmounted, discarding {} assignments", assignments.len());
            return Ok(());
        }
        self.projection = TeacherProjection::from_assignments(assignments);
        self.stale = false;
        Ok(())
    }

    async fn reload_after_write(&mut self) {
        if let Err(e) = self.load().await {
            warn!("Write succeeded but the reload failed, projection is stale: {}", e);
            self.stale = true;
        }
    }

    /// The teacher-scoped listing, falling back once to the general listing
    /// when the scoped endpoint fails or no teacher id is known.
    async fn fetch_assignments(&self) -> PortResult<Vec<Assignment>> {
        if let Some(teacher_id) = self.teacher_id() {
            match self
                .backend
                .list_teacher_assignments(&teacher_id, self.filter)
                .await
            {
                Ok(list) => return Ok(list),
                Err(e) => warn!(
                    "Teacher endpoint failed for {}, falling back to /assignments: {}",
                    teacher_id, e
                ),
            }
        }
        self.backend.list_assignments(self.filter).await
    }

    /// Changes the status filter and reloads.
    pub async fn set_filter(&mut self, filter: StatusFilter) -> PortResult<()> {
        self.filter = filter;
        self.load().await
    }

    //-------------------------------------------------------------------------------------
    // Mutations
    //-------------------------------------------------------------------------------------

    pub async fn create_assignment(&mut self, form: &AssignmentForm) -> PortResult<Assignment> {
        form.validate()?;
        let created = self
            .backend
            .create_assignment(&form.to_new(self.teacher_id()))
            .await?;
        info!("Created assignment {} ({})", created.id, created.title);
        self.reload_after_write().await;
        Ok(created)
    }

    pub async fn update_assignment(
        &mut self,
        assignment_id: &str,
        form: &AssignmentForm,
    ) -> PortResult<Assignment> {
        form.validate()?;
        let updated = self
            .backend
            .update_assignment(assignment_id, &form.to_update(self.teacher_id()))
            .await?;
        info!("Updated assignment {}", assignment_id);
        self.reload_after_write().await;
        Ok(updated)
    }

    /// Publishes a draft or completed assignment, or moves a published one
    /// back to draft. Returns the new status.
    pub async fn toggle_publish(&mut self, assignment_id: &str) -> PortResult<AssignmentStatus> {
        let current = self
            .find(assignment_id)
            .ok_or_else(|| PortError::NotFound(format!("assignment {}", assignment_id)))?
            .status;
        let next = current.toggled();

        self.backend
            .update_assignment(assignment_id, &AssignmentUpdate::status_only(next))
            .await?;
        info!("Assignment {} moved from {} to {}", assignment_id, current, next);
        self.reload_after_write().await;
        Ok(next)
    }

    /// Deletes the assignment; the backend also drops its submissions.
    pub async fn delete_assignment(&mut self, assignment_id: &str) -> PortResult<()> {
        self.backend.delete_assignment(assignment_id).await?;
        info!("Deleted assignment {}", assignment_id);
        self.reload_after_write().await;
        Ok(())
    }

    /// Everything submitted for one assignment.
    pub async fn submissions_for(&self, assignment_id: &str) -> PortResult<Vec<Submission>> {
        self.backend.list_assignment_submissions(assignment_id).await
    }
}
