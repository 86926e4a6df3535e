use reg_db::updates::student::ProfileUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProfileCommands;
use crate::commands::shared::payload::read_payload;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl profile`.
pub async fn handle(
    action: &ProfileCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProfileCommands::Show => {
            let student = ctx.current_student().await?;
            output(&student, flags.format)
        }
        ProfileCommands::Update { json } => {
            let profile: ProfileUpdate = read_payload(json, "profile")?;
            // Resolve first so an unlinked account reads as access denied.
            ctx.current_student().await?;
            let student = ctx
                .service
                .update_own_profile(ctx.principal()?, profile)
                .await?;
            output(&student, flags.format)
        }
    }
}
