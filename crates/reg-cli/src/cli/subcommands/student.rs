use clap::Subcommand;

/// Student record commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StudentCommands {
    /// Create a student from a JSON body (`@path` reads a file).
    Create {
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Get a student by ID.
    Get { id: String },
    /// List students.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        cohort: Option<i32>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Update a student from a JSON body.
    Update {
        id: String,
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Delete a student with no enrollments.
    Delete { id: String },
    /// Recompute a student's cumulative GPA.
    Gpa { id: String },
    /// List a student's grades.
    Grades {
        id: String,
        #[arg(long)]
        semester: Option<String>,
    },
    /// Show a student's timetable.
    Timetable {
        id: String,
        #[arg(long)]
        semester: Option<String>,
    },
}
