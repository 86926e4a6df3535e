use clap::Subcommand;

/// Grading commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GradeCommands {
    /// Record a grade from a JSON body (`@path` reads a file).
    Enter {
        enrollment_id: String,
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Grade sheet for a class offering.
    Class { class_id: String },
}
