use reg_db::updates::grade::GradeEntry;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GradeCommands;
use crate::commands::shared::payload::read_payload;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl grade`.
pub async fn handle(
    action: &GradeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GradeCommands::Enter {
            enrollment_id,
            json,
        } => {
            let entry: GradeEntry = read_payload(json, "grade")?;
            let response = ctx
                .service
                .enter_grade(ctx.principal()?, enrollment_id, entry)
                .await?;
            output(&response, flags.format)
        }
        GradeCommands::Class { class_id } => {
            let sheet = ctx.service.grades_for_class(class_id).await?;
            output(&sheet, flags.format)
        }
    }
}
