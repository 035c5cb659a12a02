//! services/portal/src/bin/portal.rs

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use portal_core::domain::{AssignmentStatus, RegisterInput, Role, StatusFilter, Submission};
use portal_core::ports::PortError;
use portal_core::projection::AssignmentStats;
use portal_lib::{
    app::{Access, AppState, AssignmentForm, SessionStore, StudentDashboard, TeacherDashboard},
    config::Config,
    error::PortalError,
};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// portal - assignment portal client
#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account, then sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// teacher or student
        #[arg(long, default_value = "student")]
        role: Role,
    },

    /// Forget the stored session
    Logout,

    /// Show the current session
    Whoami,

    /// Ask the access guard whether a path would render
    Open { path: String },

    /// Teacher dashboard
    #[command(subcommand)]
    Teacher(TeacherCommand),

    /// Student dashboard
    #[command(subcommand)]
    Student(StudentCommand),
}

#[derive(Subcommand, Debug)]
enum TeacherCommand {
    /// List assignments with summary counts
    List {
        /// all, draft, published or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long, default_value = "published")]
        status: AssignmentStatus,
    },
    /// Edit an assignment; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        status: Option<AssignmentStatus>,
    },
    /// Publish a draft, or move a published assignment back to draft
    Toggle { id: String },
    /// Delete an assignment and its submissions
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show what students submitted for an assignment
    Submissions { id: String },
}

#[derive(Subcommand, Debug)]
enum StudentCommand {
    List,
    Submit {
        assignment_id: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Show your latest submission for an assignment
    View { assignment_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Using backend at {}", config.api_base_url);

    // --- 2. Build the Shared AppState & Dispatch ---
    let result = match AppState::from_config(&config) {
        Ok(state) => run(&state, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(PortalError::Redirected(view)) => {
            eprintln!("Not allowed here, redirecting to {}", view);
            ExitCode::FAILURE
        }
        Err(PortalError::Port(e)) => {
            eprintln!("{}", e.user_message("Request failed"));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Commands) -> Result<(), PortalError> {
    match command {
        Commands::Login { email, password } => {
            let role = state
                .sessions
                .login(state.backend.as_ref(), &email, &password)
                .await?;
            println!("Signed in as {}. Continue at {}", role, SessionStore::landing_view(role));
        }
        Commands::Register { name, email, password, role } => {
            let input = RegisterInput { name, email, password, role };
            let role = state.sessions.register(state.backend.as_ref(), input).await?;
            println!("Account created. Continue at {}", SessionStore::landing_view(role));
        }
        Commands::Logout => {
            state.sessions.logout()?;
            println!("Signed out.");
        }
        Commands::Whoami => match state.sessions.current_session() {
            Some(session) => println!("{} ({})", session.name, session.role),
            None => println!("Not signed in."),
        },
        Commands::Open { path } => match state.guard.navigate(&path) {
            Access::Render(view) => println!("render {}", view),
            Access::Redirect(view) => return Err(PortalError::Redirected(view)),
        },
        Commands::Teacher(command) => run_teacher(state, command).await?,
        Commands::Student(command) => run_student(state, command).await?,
    }
    Ok(())
}

//=========================================================================================
// Teacher
//=========================================================================================

async fn run_teacher(state: &AppState, command: TeacherCommand) -> Result<(), PortalError> {
    let filter = match &command {
        TeacherCommand::List { status } => *status,
        _ => StatusFilter::All,
    };
    let mut dashboard = state.open_teacher_dashboard(filter).await?;

    match command {
        TeacherCommand::List { .. } => {}
        TeacherCommand::Create { title, description, due, status } => {
            let form = AssignmentForm { title, description, due_date: due, status };
            let created = dashboard.create_assignment(&form).await?;
            println!("Created {} ({})", created.title, created.id);
        }
        TeacherCommand::Edit { id, title, description, due, status } => {
            let existing = dashboard
                .find(&id)
                .ok_or_else(|| PortError::NotFound(format!("assignment {}", id)))?;
            let mut form = AssignmentForm::from_assignment(existing);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if due.is_some() {
                form.due_date = due;
            }
            if let Some(status) = status {
                form.status = status;
            }
            dashboard.update_assignment(&id, &form).await?;
            println!("Saved {}", id);
        }
        TeacherCommand::Toggle { id } => {
            let status = dashboard.toggle_publish(&id).await?;
            println!("{} is now {}", id, status);
        }
        TeacherCommand::Delete { id, yes } => {
            if !yes {
                println!("This removes the assignment and its submissions. Re-run with --yes.");
                return Ok(());
            }
            dashboard.delete_assignment(&id).await?;
            println!("Assignment deleted");
        }
        TeacherCommand::Submissions { id } => {
            let submissions = dashboard.submissions_for(&id).await?;
            if submissions.is_empty() {
                println!("No submissions yet.");
            }
            for submission in &submissions {
                print_submission(submission);
            }
            return Ok(());
        }
    }

    if dashboard.is_stale() {
        eprintln!("Saved, but the list could not be refreshed.");
    }
    print_teacher(&dashboard);
    Ok(())
}

fn print_teacher(dashboard: &TeacherDashboard) {
    let AssignmentStats { total, draft, published, completed } = dashboard.stats();
    println!(
        "Total {}  Draft {}  Published {}  Completed {}",
        total, draft, published, completed
    );
    if dashboard.assignments().is_empty() {
        println!("No assignments. Create your first assignment to get started.");
    }
    for a in dashboard.assignments() {
        let due = a
            .due_date
            .map(|d| format!(" | due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!(
            "{:<26} {:<10} {} ({} submitted{})",
            a.id,
            a.status,
            a.title,
            a.submitted(),
            due
        );
    }
}

//=========================================================================================
// Student
//=========================================================================================

async fn run_student(state: &AppState, command: StudentCommand) -> Result<(), PortalError> {
    let mut dashboard = state.open_student_dashboard().await?;

    match command {
        StudentCommand::List => print_student(&dashboard),
        StudentCommand::Submit { assignment_id, content } => {
            dashboard.open_submit(&assignment_id)?;
            dashboard.set_content(&content)?;
            let submission = dashboard.submit().await?;
            println!("Submitted successfully at {}", submission.created_at.to_rfc3339());
            if dashboard.is_stale() {
                eprintln!("The list could not be refreshed.");
            }
            print_student(&dashboard);
        }
        StudentCommand::View { assignment_id } => {
            dashboard.open_view(&assignment_id)?;
            if let portal_lib::app::SubmissionModal::Viewing(submission) = dashboard.modal() {
                print_submission(submission);
            }
            dashboard.close_modal();
        }
    }
    Ok(())
}

fn print_student(dashboard: &StudentDashboard) {
    let rows = dashboard.rows();
    if rows.is_empty() {
        println!("No published assignments yet.");
    }
    for row in rows {
        let state = match row.submitted_at() {
            Some(at) => format!("Submitted {}", at.format("%Y-%m-%d %H:%M")),
            None => "Open".to_string(),
        };
        println!("{:<26} {:<28} {}", row.assignment.id, state, row.assignment.title);
    }
}

fn print_submission(submission: &Submission) {
    println!("Submission {}", submission.id);
    if let Some(student) = &submission.student_id {
        println!("  student:   {}", student);
    }
    let content = if submission.content.is_empty() {
        "(no message)"
    } else {
        submission.content.as_str()
    };
    println!("  content:   {}", content);
    if let Some(url) = &submission.file_url {
        println!("  file:      {}", url);
    }
    println!("  submitted: {}", submission.created_at.to_rfc3339());
}
