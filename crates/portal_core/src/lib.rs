pub mod domain;
pub mod ports;
pub mod projection;

pub use domain::{
    Assignment, AssignmentStatus, AssignmentUpdate, Credentials, LoginResponse, NewAssignment,
    NewSubmission, RegisterInput, Role, Session, StatusFilter, Submission,
};
pub use ports::{
    CredentialSource, PersistedSession, PortError, PortResult, PortalBackend, SessionStorage,
};
pub use projection::{latest_submissions_by_assignment, AssignmentStats, SubmissionsByAssignment};
