use clap::Subcommand;

/// Own-profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show your student record.
    Show,
    /// Update your profile from a JSON body.
    Update {
        #[arg(long, value_name = "JSON")]
        json: String,
    },
}
