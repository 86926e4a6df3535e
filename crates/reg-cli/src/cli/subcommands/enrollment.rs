use clap::Subcommand;

/// Enrollment ledger commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EnrollmentCommands {
    /// List enrollments, newest registration first.
    List {
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Get an enrollment with its offering, course, and student.
    Get { id: String },
    /// Move an enrollment to another status.
    Assign {
        id: String,
        /// registered, waitlist, auditing, dropped
        status: String,
        #[arg(long)]
        reason: Option<String>,
    },
}
