//! crates/portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client logic depends on.
//! These traits form the boundary of the hexagonal architecture: the session
//! store and dashboards talk to the backend and to persisted storage only
//! through them, so HTTP and file adapters can be swapped for fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Assignment, AssignmentUpdate, Credentials, LoginResponse, NewAssignment, NewSubmission,
    RegisterInput, StatusFilter, Submission,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy for every client operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// Bad credentials or a rejected registration.
    #[error("{0}")]
    Auth(String),
    /// Any other non-2xx answer (`status` is set) or a transport failure (`status` is `None`).
    #[error("HTTP error ({}): {body}", describe_status(.status))]
    Http { status: Option<u16>, body: String },
    /// A local precondition failed before any request was sent.
    #[error("{0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Session storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// Text to show the user: the backend's `message` field when the body
    /// carries one, otherwise `fallback` for HTTP failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortError::Http { body, .. } => backend_message(body).unwrap_or_else(|| fallback.to_string()),
            PortError::Auth(msg) | PortError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "transport".to_string(),
    }
}

/// Extracts `{"message": "..."}` from an error body.
pub fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The backend REST contract as the client consumes it.
#[async_trait]
pub trait PortalBackend: Send + Sync {
    // --- Auth ---
    async fn login(&self, credentials: &Credentials) -> PortResult<LoginResponse>;

    async fn register(&self, input: &RegisterInput) -> PortResult<()>;

    // --- Assignments ---
    async fn list_assignments(&self, filter: StatusFilter) -> PortResult<Vec<Assignment>>;

    /// May be missing in some deployments; callers fall back to `list_assignments`.
    async fn list_teacher_assignments(
        &self,
        teacher_id: &str,
        filter: StatusFilter,
    ) -> PortResult<Vec<Assignment>>;

    async fn create_assignment(&self, assignment: &NewAssignment) -> PortResult<Assignment>;

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: &AssignmentUpdate,
    ) -> PortResult<Assignment>;

    /// Also removes the assignment's submissions on the backend.
    async fn delete_assignment(&self, assignment_id: &str) -> PortResult<()>;

    // --- Submissions ---
    async fn list_student_submissions(&self, student_id: &str) -> PortResult<Vec<Submission>>;

    async fn list_assignment_submissions(&self, assignment_id: &str)
        -> PortResult<Vec<Submission>>;

    async fn create_submission(&self, submission: &NewSubmission) -> PortResult<Submission>;
}

/// Supplies the bearer credential for outbound requests, if a session is active.
pub trait CredentialSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// The persisted session record. Each field sits under a fixed key; a
/// valid record has all of token, role and name or none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.role.is_none() && self.name.is_none() && self.user_id.is_none()
    }
}

/// Durable storage for the session record, surviving process restarts.
///
/// `save` and `clear` act on the whole record at once.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> PortResult<PersistedSession>;

    fn save(&self, record: &PersistedSession) -> PortResult<()>;

    fn clear(&self) -> PortResult<()>;
}
