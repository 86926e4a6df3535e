use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AccountCommands, CourseCommands, EnrollmentCommands, GradeCommands, OfferingCommands,
    ProfileCommands, StudentCommands,
};

/// Top-level command tree.
///
/// The first block acts on the calling student's own record; the grouped
/// subcommands after it are administrative.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database and optionally the first administrator.
    Init(InitArgs),

    /// Enroll in a class offering.
    Enroll(EnrollArgs),
    /// Drop one of your enrollments.
    Drop(DropArgs),
    /// List your enrollments.
    Enrollments(OwnEnrollmentsArgs),
    /// List your grades.
    Grades(SemesterArgs),
    /// Recompute and show your cumulative GPA.
    Gpa,
    /// List open offerings with a free seat.
    Available(AvailableArgs),
    /// Show your weekly timetable.
    Timetable(SemesterArgs),
    /// View or update your profile.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },

    /// Grade entry and class grade sheets.
    Grade {
        #[command(subcommand)]
        action: GradeCommands,
    },
    /// Enrollment ledger administration.
    Enrollment {
        #[command(subcommand)]
        action: EnrollmentCommands,
    },
    /// Course catalog.
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },
    /// Class offerings.
    Offering {
        #[command(subcommand)]
        action: OfferingCommands,
    },
    /// Student records.
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Accounts.
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// View the audit trail.
    Audit(AuditArgs),
}

/// Arguments for `regctl init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Email of the first administrator account.
    #[arg(long)]
    pub admin_email: Option<String>,
    #[arg(long, requires = "admin_email")]
    pub display_name: Option<String>,
}

/// Arguments for `regctl enroll`.
#[derive(Clone, Debug, Args)]
pub struct EnrollArgs {
    pub class_id: String,
    /// Semester to record (defaults to the offering's semester).
    #[arg(long)]
    pub semester: Option<String>,
}

/// Arguments for `regctl drop`.
#[derive(Clone, Debug, Args)]
pub struct DropArgs {
    pub enrollment_id: String,
}

/// Arguments for `regctl enrollments`.
#[derive(Clone, Debug, Args)]
pub struct OwnEnrollmentsArgs {
    #[arg(long)]
    pub semester: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

/// Optional semester selector shared by grade and timetable views.
#[derive(Clone, Debug, Args)]
pub struct SemesterArgs {
    #[arg(long)]
    pub semester: Option<String>,
}

/// Arguments for `regctl available`.
#[derive(Clone, Debug, Args)]
pub struct AvailableArgs {
    #[arg(long)]
    pub course: Option<String>,
    #[arg(long)]
    pub semester: Option<String>,
}

/// Arguments for `regctl audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// account, student, course, class_offering, enrollment
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Account id that performed the action.
    #[arg(long)]
    pub actor: Option<String>,
}
