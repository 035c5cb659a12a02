//! services/portal/src/app/session.rs
//!
//! The session store: the one piece of state shared by the whole process.
//! It is rehydrated from persisted storage at startup and only written by
//! login, registration and logout.

use portal_core::domain::{Credentials, RegisterInput, Role, Session};
use portal_core::ports::{
    CredentialSource, PersistedSession, PortError, PortResult, PortalBackend, SessionStorage,
};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::app::guard::View;

const LOGIN_FALLBACK: &str = "Invalid email or password";
const REGISTER_FALLBACK: &str = "Registration failed";

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Builds the store from whatever an earlier run persisted.
    ///
    /// A record with a token but no valid role or name is not a session; its
    /// remnants are cleared so storage never holds a partial record.
    pub fn rehydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage.load() {
            Ok(record) => {
                let session = session_from_record(&record);
                if session.is_none() && !record.is_empty() {
                    warn!("Discarding incomplete persisted session");
                    if let Err(e) = storage.clear() {
                        warn!("Failed to clear incomplete session: {}", e);
                    }
                }
                session
            }
            Err(e) => {
                warn!("Could not read persisted session, starting signed out: {}", e);
                if let Err(e) = storage.clear() {
                    warn!("Failed to clear unreadable session: {}", e);
                }
                None
            }
        };

        if let Some(session) = &session {
            info!("Restored session for {} ({})", session.name, session.role);
        }

        Self {
            storage,
            current: RwLock::new(session),
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Signs in and persists the session. Returns the role so the caller can
    /// pick where to go next.
    pub async fn login(
        &self,
        backend: &dyn PortalBackend,
        identifier: &str,
        secret: &str,
    ) -> PortResult<Role> {
        let credentials = Credentials {
            email: identifier.trim().to_string(),
            password: secret.to_string(),
        };
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(PortError::Validation("Email and password are required".to_string()));
        }

        let response = backend
            .login(&credentials)
            .await
            .map_err(|e| auth_error(e, LOGIN_FALLBACK))?;

        let session = response.into_session();
        let role = session.role;
        self.establish(session)?;
        Ok(role)
    }

    /// Creates the account, then signs in with the same credentials.
    pub async fn register(
        &self,
        backend: &dyn PortalBackend,
        input: RegisterInput,
    ) -> PortResult<Role> {
        let input = RegisterInput {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            ..input
        };
        if input.name.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(PortError::Validation(
                "Name, email and password are required".to_string(),
            ));
        }

        backend
            .register(&input)
            .await
            .map_err(|e| auth_error(e, REGISTER_FALLBACK))?;
        info!("Registered {} as {}", input.email, input.role);

        self.login(backend, &input.email, &input.password).await
    }

    /// Forgets the session, in memory and on disk. Safe to call when signed out.
    /// Storage is cleared first; if that fails the session stays signed in
    /// so memory and disk never disagree.
    pub fn logout(&self) -> PortResult<()> {
        self.storage.clear()?;
        let previous = self.current.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(session) = previous {
            info!("Signed out {}", session.name);
        }
        Ok(())
    }

    /// Where a freshly signed-in user lands.
    pub fn landing_view(role: Role) -> View {
        match role {
            Role::Teacher => View::TeacherDashboard,
            Role::Student => View::StudentDashboard,
        }
    }

    fn establish(&self, session: Session) -> PortResult<()> {
        self.storage.save(&record_from_session(&session))?;
        info!("Signed in {} ({})", session.name, session.role);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
        Ok(())
    }
}

impl CredentialSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.token.clone())
    }
}

fn auth_error(error: PortError, fallback: &str) -> PortError {
    match error {
        PortError::Http { .. } => PortError::Auth(error.user_message(fallback)),
        other => other,
    }
}

fn session_from_record(record: &PersistedSession) -> Option<Session> {
    let token = record.token.as_ref().filter(|t| !t.is_empty())?;
    let role = record.role.as_deref()?.parse::<Role>().ok()?;
    let name = record.name.as_ref()?;
    Some(Session {
        token: token.clone(),
        role,
        name: name.clone(),
        user_id: record.user_id.clone(),
    })
}

fn record_from_session(session: &Session) -> PersistedSession {
    PersistedSession {
        token: Some(session.token.clone()),
        role: Some(session.role.as_str().to_string()),
        name: Some(session.name.clone()),
        user_id: session.user_id.clone(),
    }
}
