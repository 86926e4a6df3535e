use clap::Subcommand;

/// Account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AccountCommands {
    /// Create an account.
    Create {
        #[arg(long)]
        email: String,
        /// student or admin
        #[arg(long)]
        role: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Get an account by ID.
    Get { id: String },
    /// Find an account by email.
    Find { email: String },
}
