//! # CLI Argument Definitions
//!
//! Command-line structure of the `registrar` binary, parsed with `clap`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "registrar")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Student course registration")]
pub(crate) struct Cli {
    /// Configuration file (TOML). Defaults to `registrar.toml` in the working directory when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Load the sample students, courses and enrollments
    Seed,
    /// Manage student accounts
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Check a username and password. The password is read from stdin
    Login { username: String },
    /// Browse the course catalog
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Enroll a student (username or id) in a course
    Enroll { student: String, course_code: String },
    /// Drop a student's enrollment in a course
    Drop { student: String, course_code: String },
    /// List a student's current courses
    MyCourses { student: String },
    /// Record a grade on a registration
    Grade { registration_id: String, grade: String },
    /// List the students enrolled in a course
    Roster { course_code: String },
    /// Recompute enrollment counters from registrations
    Reconcile,
}

#[derive(Debug, Subcommand)]
pub(crate) enum StudentAction {
    /// Create a student account. The password is read from stdin
    Add(NewStudentArgs),
    /// Show a student's profile (username or id)
    Show { student: String },
}

#[derive(Debug, Args)]
pub(crate) struct NewStudentArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "Undeclared")]
    pub major: String,
    #[arg(long, default_value_t = 1)]
    pub year: u8,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CourseAction {
    /// All courses
    List,
    /// Courses with free seats
    Available,
    /// Case-insensitive search over code, name, instructor and department
    Search { term: String },
    /// Details of one course
    Show { code: String },
}
