use clap::Subcommand;

/// Class offering commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OfferingCommands {
    /// Create an offering from a JSON body (`@path` reads a file).
    Create {
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Get an offering by ID.
    Get { id: String },
    /// List offerings.
    List {
        #[arg(long)]
        course: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Update an offering from a JSON body. Capacity is set separately.
    Update {
        id: String,
        #[arg(long, value_name = "JSON")]
        json: String,
    },
    /// Set seat capacity (0 = unlimited).
    Capacity { id: String, capacity: u32 },
    /// Recount enrolled seats from the ledger.
    Reconcile { id: String },
    /// List the offering's enrollments.
    Roster { id: String },
    /// Delete an offering with no enrollments.
    Delete { id: String },
}
