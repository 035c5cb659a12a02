mod common;

use common::{assignment, signed_in, submission, Call, FakeBackend};
use portal_core::domain::{AssignmentStatus, NewSubmission, Role, StatusFilter};
use portal_core::ports::PortError;
use portal_lib::app::{StudentDashboard, SubmissionModal};
use std::sync::Arc;

fn seeded() -> Arc<FakeBackend> {
    FakeBackend::with_data(
        vec![
            assignment("a1", AssignmentStatus::Published),
            assignment("a2", AssignmentStatus::Published),
        ],
        vec![
            submission("old", "a1", "s1", 10),
            submission("new", "a1", "s1", 20),
            submission("someone-else", "a2", "s9", 30),
        ],
    )
}

async fn mounted(backend: &Arc<FakeBackend>) -> StudentDashboard {
    StudentDashboard::mount(backend.clone(), signed_in(Role::Student, Some("s1")))
        .await
        .unwrap()
}

#[tokio::test]
async fn load_projects_latest_submission_per_assignment() {
    let backend = seeded();
    let dashboard = mounted(&backend).await;

    assert_eq!(
        backend.calls(),
        vec![
            Call::ListAssignments(StatusFilter::All),
            Call::ListStudentSubmissions("s1".to_string()),
        ]
    );
    let rows = dashboard.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].submission.map(|s| s.id.as_str()), Some("new"));
    assert!(!rows[1].is_submitted());
}

#[tokio::test]
async fn failed_submissions_fetch_degrades_to_nothing_submitted() {
    let backend = seeded();
    backend.faults.lock().unwrap().student_submissions = true;

    let dashboard = mounted(&backend).await;

    assert_eq!(dashboard.projection().assignments.len(), 2);
    assert!(dashboard.projection().submissions.is_empty());
}

#[tokio::test]
async fn failed_assignments_fetch_is_an_error() {
    let backend = seeded();
    backend.faults.lock().unwrap().list_assignments = true;

    let result = StudentDashboard::mount(backend.clone(), signed_in(Role::Student, Some("s1"))).await;

    assert!(matches!(result, Err(PortError::Http { status: Some(500), .. })));
}

#[tokio::test]
async fn duplicate_submit_is_refused_without_a_request() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;
    backend.clear_calls();

    dashboard.open_submit("a1").unwrap();
    dashboard.set_content("again").unwrap();
    let err = dashboard.submit().await.unwrap_err();

    assert_eq!(
        err,
        PortError::Validation("You have already submitted this assignment.".to_string())
    );
    assert!(backend.calls().is_empty());
    assert_eq!(dashboard.modal(), &SubmissionModal::Closed);
}

#[tokio::test]
async fn first_submission_reloads_once_and_shows_submitted() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;
    backend.clear_calls();

    dashboard.open_submit("a2").unwrap();
    dashboard.set_content("my essay").unwrap();
    let created = dashboard.submit().await.unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            Call::CreateSubmission(NewSubmission {
                assignment_id: "a2".to_string(),
                content: "my essay".to_string(),
            }),
            Call::ListAssignments(StatusFilter::All),
            Call::ListStudentSubmissions("s1".to_string()),
        ]
    );

    let row = dashboard
        .rows()
        .into_iter()
        .find(|r| r.assignment.id == "a2")
        .unwrap();
    assert!(row.is_submitted());
    assert_eq!(row.submitted_at(), Some(created.created_at));
    assert_eq!(dashboard.modal(), &SubmissionModal::Closed);
}

#[tokio::test]
async fn rejected_submit_keeps_modal_and_projection() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;
    let before = dashboard.projection().clone();
    backend.faults.lock().unwrap().writes = true;

    dashboard.open_submit("a2").unwrap();
    dashboard.set_content("late").unwrap();
    let err = dashboard.submit().await.unwrap_err();

    assert_eq!(err.user_message("Submit failed"), "Submission window closed");
    assert_eq!(dashboard.projection(), &before);
    assert!(matches!(dashboard.modal(), SubmissionModal::Composing { content, .. } if content == "late"));
}

#[tokio::test]
async fn viewing_and_composing_replace_each_other() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;

    dashboard.open_view("a1").unwrap();
    assert!(matches!(dashboard.modal(), SubmissionModal::Viewing(s) if s.id == "new"));
    assert!(dashboard.set_content("text").is_err());

    dashboard.open_submit("a2").unwrap();
    assert!(matches!(dashboard.modal(), SubmissionModal::Composing { assignment, content }
        if assignment.id == "a2" && content.is_empty()));

    dashboard.close_modal();
    assert_eq!(dashboard.modal(), &SubmissionModal::Closed);
}

#[tokio::test]
async fn viewing_an_unsubmitted_assignment_is_not_found() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;

    assert!(matches!(dashboard.open_view("a2"), Err(PortError::NotFound(_))));
    assert!(matches!(dashboard.open_submit("zzz"), Err(PortError::NotFound(_))));
}

#[tokio::test]
async fn submit_without_an_open_form_is_rejected() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;
    backend.clear_calls();

    assert!(matches!(dashboard.submit().await, Err(PortError::Validation(_))));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn unknown_student_id_skips_the_submissions_fetch() {
    let backend = seeded();
    StudentDashboard::mount(backend.clone(), signed_in(Role::Student, None))
        .await
        .unwrap();

    assert_eq!(backend.calls(), vec![Call::ListAssignments(StatusFilter::All)]);
}

#[tokio::test]
async fn load_after_unmount_is_discarded() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;
    let before = dashboard.projection().clone();
    dashboard.unmount();

    dashboard.open_submit("a2").unwrap();
    dashboard.submit().await.unwrap();

    // the write went through, the reload result was dropped
    assert_eq!(backend.count(|c| matches!(c, Call::CreateSubmission(_))), 1);
    assert_eq!(dashboard.projection(), &before);
}

#[tokio::test]
async fn reload_failure_after_submit_still_reports_success() {
    let backend = seeded();
    let mut dashboard = mounted(&backend).await;
    backend.faults.lock().unwrap().list_assignments = true;

    dashboard.open_submit("a2").unwrap();
    dashboard.set_content("my essay").unwrap();
    let created = dashboard.submit().await.unwrap();

    assert!(dashboard.is_stale());
    assert_eq!(dashboard.modal(), &SubmissionModal::Closed);
    assert_eq!(dashboard.submission_for("a2").map(|s| s.id.as_str()), Some(created.id.as_str()));

    // a retry is refused locally, so the backend sees a single write
    dashboard.open_submit("a2").unwrap();
    let err = dashboard.submit().await.unwrap_err();
    assert_eq!(
        err,
        PortError::Validation("You have already submitted this assignment.".to_string())
    );
    assert_eq!(backend.count(|c| matches!(c, Call::CreateSubmission(_))), 1);

    backend.faults.lock().unwrap().list_assignments = false;
    dashboard.load().await.unwrap();
    assert!(!dashboard.is_stale());
}
