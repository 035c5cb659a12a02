//! A recording in-memory backend shared by the dashboard tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use portal_core::domain::{
    Assignment, AssignmentStatus, AssignmentUpdate, Credentials, LoginResponse, NewAssignment,
    NewSubmission, RegisterInput, Role, StatusFilter, Submission,
};
use portal_core::ports::{PersistedSession, PortError, PortResult, PortalBackend};
use portal_lib::adapters::MemorySessionStorage;
use portal_lib::app::SessionStore;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    Register(String),
    ListAssignments(StatusFilter),
    ListTeacherAssignments(String, StatusFilter),
    CreateAssignment(NewAssignment),
    UpdateAssignment(String, AssignmentUpdate),
    DeleteAssignment(String),
    ListStudentSubmissions(String),
    ListAssignmentSubmissions(String),
    CreateSubmission(NewSubmission),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    assignments: Vec<Assignment>,
    submissions: Vec<Submission>,
    accounts: Vec<(RegisterInput, String)>,
    next_id: u32,
    clock: i64,
}

/// Knobs for simulating partial backends.
#[derive(Default)]
pub struct Faults {
    pub teacher_endpoint: bool,
    pub student_submissions: bool,
    pub list_assignments: bool,
    pub assignment_submissions: bool,
    pub writes: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
    pub faults: Mutex<Faults>,
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
}

pub fn assignment(id: &str, status: AssignmentStatus) -> Assignment {
    Assignment {
        id: id.to_string(),
        title: format!("Assignment {}", id),
        description: String::new(),
        due_date: None,
        status,
        created_by: Some("t1".to_string()),
        created_at: Some(at(0)),
        submitted_count: None,
    }
}

pub fn submission(id: &str, assignment_id: &str, student_id: &str, secs: i64) -> Submission {
    Submission {
        id: id.to_string(),
        assignment_id: assignment_id.to_string(),
        student_id: Some(student_id.to_string()),
        content: format!("work for {}", assignment_id),
        file_url: None,
        created_at: at(secs),
    }
}

fn server_error(message: &str) -> PortError {
    PortError::Http {
        status: Some(500),
        body: format!(r#"{{"message":"{}"}}"#, message),
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_data(assignments: Vec<Assignment>, submissions: Vec<Submission>) -> Arc<Self> {
        let backend = Self::default();
        {
            let mut inner = backend.inner.lock().unwrap();
            inner.assignments = assignments;
            inner.submissions = submissions;
            inner.clock = 1_000;
        }
        Arc::new(backend)
    }

    pub fn add_account(&self, email: &str, password: &str, name: &str, role: Role, id: &str) {
        self.inner.lock().unwrap().accounts.push((
            RegisterInput {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role,
            },
            id.to_string(),
        ));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn filtered(&self, filter: StatusFilter) -> Vec<Assignment> {
        self.inner
            .lock()
            .unwrap()
            .assignments
            .iter()
            .filter(|a| match filter {
                StatusFilter::All => true,
                StatusFilter::Only(status) => a.status == status,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PortalBackend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> PortResult<LoginResponse> {
        self.record(Call::Login(credentials.email.clone()));
        let inner = self.inner.lock().unwrap();
        inner
            .accounts
            .iter()
            .find(|(a, _)| a.email == credentials.email && a.password == credentials.password)
            .map(|(a, id)| LoginResponse {
                token: format!("token-{}", id),
                role: a.role,
                name: a.name.clone(),
                id: Some(id.clone()),
            })
            .ok_or(PortError::Http {
                status: Some(401),
                body: r#"{"message":"Invalid credentials"}"#.to_string(),
            })
    }

    async fn register(&self, input: &RegisterInput) -> PortResult<()> {
        self.record(Call::Register(input.email.clone()));
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.iter().any(|(a, _)| a.email == input.email) {
            return Err(PortError::Http {
                status: Some(409),
                body: r#"{"message":"Email already registered"}"#.to_string(),
            });
        }
        inner.next_id += 1;
        let id = format!("u{}", inner.next_id);
        inner.accounts.push((input.clone(), id));
        Ok(())
    }

    async fn list_assignments(&self, filter: StatusFilter) -> PortResult<Vec<Assignment>> {
        self.record(Call::ListAssignments(filter));
        if self.faults.lock().unwrap().list_assignments {
            return Err(server_error("Assignments unavailable"));
        }
        Ok(self.filtered(filter))
    }

    async fn list_teacher_assignments(
        &self,
        teacher_id: &str,
        filter: StatusFilter,
    ) -> PortResult<Vec<Assignment>> {
        self.record(Call::ListTeacherAssignments(teacher_id.to_string(), filter));
        if self.faults.lock().unwrap().teacher_endpoint {
            return Err(PortError::Http { status: Some(404), body: "Not Found".to_string() });
        }
        Ok(self
            .filtered(filter)
            .into_iter()
            .filter(|a| a.created_by.as_deref() == Some(teacher_id))
            .collect())
    }

    async fn create_assignment(&self, assignment: &NewAssignment) -> PortResult<Assignment> {
        self.record(Call::CreateAssignment(assignment.clone()));
        if self.faults.lock().unwrap().writes {
            return Err(server_error("Database offline"));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let created = Assignment {
            id: format!("a-new-{}", inner.next_id),
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            due_date: assignment
                .due_date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| Utc.from_utc_datetime(&d)),
            status: assignment.status,
            created_by: assignment.created_by.clone(),
            created_at: Some(at(inner.clock)),
            submitted_count: Some(0),
        };
        inner.assignments.push(created.clone());
        Ok(created)
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: &AssignmentUpdate,
    ) -> PortResult<Assignment> {
        self.record(Call::UpdateAssignment(assignment_id.to_string(), update.clone()));
        if self.faults.lock().unwrap().writes {
            return Err(server_error("Database offline"));
        }
        let mut inner = self.inner.lock().unwrap();
        let target = inner
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id)
            .ok_or(PortError::Http { status: Some(404), body: "{}".to_string() })?;
        if let Some(title) = &update.title {
            target.title = title.clone();
        }
        if let Some(description) = &update.description {
            target.description = description.clone();
        }
        if let Some(due_date) = update.due_date {
            target.due_date = due_date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| Utc.from_utc_datetime(&d));
        }
        if let Some(status) = update.status {
            target.status = status;
        }
        Ok(target.clone())
    }

    async fn delete_assignment(&self, assignment_id: &str) -> PortResult<()> {
        self.record(Call::DeleteAssignment(assignment_id.to_string()));
        if self.faults.lock().unwrap().writes {
            return Err(server_error("Database offline"));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.assignments.retain(|a| a.id != assignment_id);
        inner.submissions.retain(|s| s.assignment_id != assignment_id);
        Ok(())
    }

    async fn list_student_submissions(&self, student_id: &str) -> PortResult<Vec<Submission>> {
        self.record(Call::ListStudentSubmissions(student_id.to_string()));
        if self.faults.lock().unwrap().student_submissions {
            return Err(server_error("Submissions unavailable"));
        }
        Ok(self
            .inner
            .lock()
            .unwrap()
            .submissions
            .iter()
            .filter(|s| s.student_id.as_deref() == Some(student_id))
            .cloned()
            .collect())
    }

    async fn list_assignment_submissions(
        &self,
        assignment_id: &str,
    ) -> PortResult<Vec<Submission>> {
        self.record(Call::ListAssignmentSubmissions(assignment_id.to_string()));
        if self.faults.lock().unwrap().assignment_submissions {
            return Err(server_error("Submissions unavailable"));
        }
        Ok(self
            .inner
            .lock()
            .unwrap()
            .submissions
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect())
    }

    async fn create_submission(&self, submission: &NewSubmission) -> PortResult<Submission> {
        self.record(Call::CreateSubmission(submission.clone()));
        if self.faults.lock().unwrap().writes {
            return Err(server_error("Submission window closed"));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        inner.clock += 60;
        let created = Submission {
            id: uuid::Uuid::new_v4().to_string(),
            assignment_id: submission.assignment_id.clone(),
            student_id: Some("s1".to_string()),
            content: submission.content.clone(),
            file_url: None,
            created_at: at(inner.clock),
        };
        inner.submissions.push(created.clone());
        Ok(created)
    }
}

/// A session store that starts signed in with the given identity.
pub fn signed_in(role: Role, user_id: Option<&str>) -> Arc<SessionStore> {
    let record = PersistedSession {
        token: Some("tok".to_string()),
        role: Some(role.as_str().to_string()),
        name: Some("Tester".to_string()),
        user_id: user_id.map(str::to_string),
    };
    Arc::new(SessionStore::rehydrate(Arc::new(MemorySessionStorage::with_record(record))))
}
