use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands::{self, access, self_service};
use crate::context::AppContext;

/// Gate a parsed command on the acting principal, then hand it to its handler.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let audience = access::audience(&command);
    access::authorize(audience, ctx.principal.as_ref())?;
    tracing::debug!(
        ?audience,
        account_id = ctx.principal.as_ref().map(|p| p.account_id.as_str()),
        "dispatching command"
    );

    match command {
        Commands::Init(args) => commands::init::handle(&args, ctx, flags).await,
        Commands::Enroll(args) => self_service::enroll(&args, ctx, flags).await,
        Commands::Drop(args) => self_service::drop_own(&args, ctx, flags).await,
        Commands::Enrollments(args) => self_service::list_own_enrollments(&args, ctx, flags).await,
        Commands::Grades(args) => self_service::own_grades(&args, ctx, flags).await,
        Commands::Gpa => self_service::own_gpa(ctx, flags).await,
        Commands::Available(args) => self_service::available(&args, ctx, flags).await,
        Commands::Timetable(args) => self_service::own_timetable(&args, ctx, flags).await,
        Commands::Profile { action } => commands::profile::handle(&action, ctx, flags).await,
        Commands::Grade { action } => commands::grade::handle(&action, ctx, flags).await,
        Commands::Enrollment { action } => commands::enrollment::handle(&action, ctx, flags).await,
        Commands::Course { action } => commands::course::handle(&action, ctx, flags).await,
        Commands::Offering { action } => commands::offering::handle(&action, ctx, flags).await,
        Commands::Student { action } => commands::student::handle(&action, ctx, flags).await,
        Commands::Account { action } => commands::account::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
    }
}
