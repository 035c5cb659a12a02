//! services/portal/src/adapters/http.rs
//!
//! The authenticated request gateway: the concrete implementation of the
//! `PortalBackend` port over HTTP using `reqwest`. Every request is built by
//! `HttpGateway::request`, which attaches the session credential as a bearer
//! token when one is available.

use async_trait::async_trait;
use portal_core::domain::{
    Assignment, AssignmentUpdate, Credentials, LoginResponse, NewAssignment, NewSubmission,
    RegisterInput, StatusFilter, Submission,
};
use portal_core::ports::{CredentialSource, PortError, PortResult, PortalBackend};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `PortalBackend` port.
///
/// No retries, no caching and no timeout beyond the transport default:
/// failures come back to the caller as `PortError::Http`.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpGateway {
    /// Creates a new `HttpGateway` rooted at `base_url`.
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialSource>) -> PortResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| PortError::Unexpected(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PortError::Unexpected(format!("'{}' cannot be a base URL", base_url)));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            credentials,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// The single place outbound requests are built.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_checked(builder: RequestBuilder) -> PortResult<Response> {
        let response = builder.send().await.map_err(|e| PortError::Http {
            status: None,
            body: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(PortError::Http {
            status: Some(status.as_u16()),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> PortResult<T> {
        Self::send_checked(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to decode response: {}", e)))
    }

    fn with_filter(builder: RequestBuilder, filter: StatusFilter) -> RequestBuilder {
        match filter.query_value() {
            Some(status) => builder.query(&[("status", status)]),
            None => builder,
        }
    }
}

//=========================================================================================
// PortalBackend Trait Implementation
//=========================================================================================

#[async_trait]
impl PortalBackend for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> PortResult<LoginResponse> {
        Self::send_json(self.request(Method::POST, &["auth", "login"]).json(credentials)).await
    }

    async fn register(&self, input: &RegisterInput) -> PortResult<()> {
        Self::send_checked(self.request(Method::POST, &["auth", "register"]).json(input)).await?;
        Ok(())
    }

    async fn list_assignments(&self, filter: StatusFilter) -> PortResult<Vec<Assignment>> {
        let builder = Self::with_filter(self.request(Method::GET, &["assignments"]), filter);
        Self::send_json(builder).await
    }

    async fn list_teacher_assignments(
        &self,
        teacher_id: &str,
        filter: StatusFilter,
    ) -> PortResult<Vec<Assignment>> {
        let builder = Self::with_filter(
            self.request(Method::GET, &["assignments", "teacher", teacher_id]),
            filter,
        );
        Self::send_json(builder).await
    }

    async fn create_assignment(&self, assignment: &NewAssignment) -> PortResult<Assignment> {
        Self::send_json(self.request(Method::POST, &["assignments"]).json(assignment)).await
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: &AssignmentUpdate,
    ) -> PortResult<Assignment> {
        Self::send_json(
            self.request(Method::PUT, &["assignments", assignment_id])
                .json(update),
        )
        .await
    }

    async fn delete_assignment(&self, assignment_id: &str) -> PortResult<()> {
        Self::send_checked(self.request(Method::DELETE, &["assignments", assignment_id])).await?;
        Ok(())
    }

    async fn list_student_submissions(&self, student_id: &str) -> PortResult<Vec<Submission>> {
        Self::send_json(self.request(Method::GET, &["submissions", "student", student_id])).await
    }

    async fn list_assignment_submissions(
        &self,
        assignment_id: &str,
    ) -> PortResult<Vec<Submission>> {
        Self::send_json(self.request(Method::GET, &["submissions", "assignment", assignment_id]))
            .await
    }

    async fn create_submission(&self, submission: &NewSubmission) -> PortResult<Submission> {
        Self::send_json(self.request(Method::POST, &["submissions"]).json(submission)).await
    }
}
