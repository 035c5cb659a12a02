//! services/portal/src/app/state.rs
//!
//! Defines the process-wide client state: the session store and the backend
//! gateway, built once at startup and handed to every view.

use portal_core::domain::StatusFilter;
use portal_core::ports::{PortalBackend, SessionStorage};
use std::sync::Arc;

use crate::adapters::{FileSessionStorage, HttpGateway};
use crate::app::guard::{AccessGuard, View};
use crate::app::session::SessionStore;
use crate::app::student::StudentDashboard;
use crate::app::teacher::TeacherDashboard;
use crate::config::Config;
use crate::error::PortalError;

/// The shared client state, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn PortalBackend>,
    pub sessions: Arc<SessionStore>,
    pub guard: AccessGuard,
}

impl AppState {
    /// Wires the file-backed session store and the HTTP gateway together.
    /// The gateway reads its credential from the same store.
    pub fn from_config(config: &Config) -> Result<Self, PortalError> {
        let storage: Arc<dyn SessionStorage> =
            Arc::new(FileSessionStorage::new(config.session_path.clone()));
        let sessions = Arc::new(SessionStore::rehydrate(storage));
        let backend = Arc::new(HttpGateway::new(&config.api_base_url, sessions.clone())?);
        Ok(Self::new(backend, sessions))
    }

    pub fn new(backend: Arc<dyn PortalBackend>, sessions: Arc<SessionStore>) -> Self {
        let guard = AccessGuard::new(sessions.clone());
        Self {
            backend,
            sessions,
            guard,
        }
    }

    /// Passes the guard for the teacher view, then mounts the dashboard.
    pub async fn open_teacher_dashboard(
        &self,
        filter: StatusFilter,
    ) -> Result<TeacherDashboard, PortalError> {
        self.guard
            .require(View::TeacherDashboard)
            .map_err(PortalError::Redirected)?;
        Ok(TeacherDashboard::mount(self.backend.clone(), self.sessions.clone(), filter).await?)
    }

    pub async fn open_student_dashboard(&self) -> Result<StudentDashboard, PortalError> {
        self.guard
            .require(View::StudentDashboard)
            .map_err(PortalError::Redirected)?;
        Ok(StudentDashboard::mount(self.backend.clone(), self.sessions.clone()).await?)
    }
}
