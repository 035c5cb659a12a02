//! services/portal/src/app/guard.rs
//!
//! Access control for navigable views. The guard owns no state; every
//! decision is a fresh read of the session store.

use portal_core::domain::{Role, Session};
use std::fmt;
use std::sync::Arc;

use crate::app::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    TeacherDashboard,
    StudentDashboard,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Register => "/register",
            View::TeacherDashboard => "/teacher",
            View::StudentDashboard => "/student",
        }
    }

    /// The role a session needs to see this view, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            View::TeacherDashboard => Some(Role::Teacher),
            View::StudentDashboard => Some(Role::Student),
            View::Login | View::Register => None,
        }
    }

    fn is_guarded(&self) -> bool {
        matches!(self, View::TeacherDashboard | View::StudentDashboard)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render(View),
    Redirect(View),
}

/// Maps a path to a view. The root and unknown paths have no view of their own.
pub fn resolve_path(path: &str) -> Option<View> {
    let trimmed = path.trim();
    let trimmed = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);
    match trimmed {
        "/login" => Some(View::Login),
        "/register" => Some(View::Register),
        "/teacher" => Some(View::TeacherDashboard),
        "/student" => Some(View::StudentDashboard),
        _ => None,
    }
}

/// The guard decision for `view` given the current session.
pub fn decide(session: Option<&Session>, view: View) -> Access {
    if !view.is_guarded() {
        return Access::Render(view);
    }
    match (session, view.required_role()) {
        (None, _) => Access::Redirect(View::Login),
        (Some(session), Some(required)) if session.role != required => {
            Access::Redirect(View::Login)
        }
        _ => Access::Render(view),
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    sessions: Arc<SessionStore>,
}

impl AccessGuard {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn navigate(&self, path: &str) -> Access {
        match resolve_path(path) {
            Some(view) => self.check(view),
            None => Access::Redirect(View::Login),
        }
    }

    pub fn check(&self, view: View) -> Access {
        decide(self.sessions.current_session().as_ref(), view)
    }

    /// Returns the session allowed to render `view`, or the view to go to instead.
    pub fn require(&self, view: View) -> Result<Session, View> {
        let session = self.sessions.current_session();
        match decide(session.as_ref(), view) {
            Access::Render(_) => session.ok_or(View::Login),
            Access::Redirect(target) => Err(target),
        }
    }
}
