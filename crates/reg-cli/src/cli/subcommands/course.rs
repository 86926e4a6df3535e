use clap::Subcommand;

/// Course catalog commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CourseCommands {
    /// Create a course from a JSON body (`@path` reads a file).
    Create {
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Get a course by ID.
    Get { id: String },
    /// List courses.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        faculty: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Update a course from a JSON body.
    Update {
        id: String,
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Delete a course with no offerings.
    Delete { id: String },
}
