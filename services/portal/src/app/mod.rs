pub mod guard;
pub mod session;
pub mod state;
pub mod student;
pub mod teacher;

// Re-export the pieces the binary and tests wire together.
pub use guard::{Access, AccessGuard, View};
pub use session::SessionStore;
pub use state::AppState;
pub use student::{StudentDashboard, SubmissionModal};
pub use teacher::{AssignmentForm, TeacherDashboard};
