use reg_core::enums::EnrollmentStatus;
use reg_db::repos::enrollment::EnrollmentQuery;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EnrollmentCommands;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl enrollment`.
pub async fn handle(
    action: &EnrollmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EnrollmentCommands::List {
            student,
            class,
            semester,
            status,
            page,
        } => {
            let query = EnrollmentQuery {
                student_id: student.clone(),
                class_id: class.clone(),
                semester: semester.clone(),
                status: parse_opt_enum(status.as_deref(), "status")?,
            };
            let listing = ctx
                .service
                .list_enrollments(&query, ctx.page(*page, flags))
                .await?;
            output(&listing, flags.format)
        }
        EnrollmentCommands::Get { id } => {
            let detail = ctx.service.get_enrollment_detail(id).await?;
            output(&detail, flags.format)
        }
        EnrollmentCommands::Assign { id, status, reason } => {
            let status: EnrollmentStatus = parse_enum(status, "status")?;
            let detail = ctx
                .service
                .assign_enrollment_status(ctx.principal()?, id, status, reason.as_deref())
                .await?;
            output(&detail, flags.format)
        }
    }
}
