use reg_db::repos::course::CourseFilter;
use reg_db::updates::course::{CourseUpdate, NewCourse};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CourseCommands;
use crate::commands::shared::parse::parse_opt_enum;
use crate::commands::shared::payload::read_payload;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl course`.
pub async fn handle(
    action: &CourseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CourseCommands::Create { json } => {
            let new: NewCourse = read_payload(json, "course")?;
            let course = ctx.service.create_course(ctx.principal()?, new).await?;
            output(&course, flags.format)
        }
        CourseCommands::Get { id } => {
            let course = ctx.service.get_course(id).await?;
            output(&course, flags.format)
        }
        CourseCommands::List {
            status,
            faculty,
            subject,
            page,
        } => {
            let filter = CourseFilter {
                status: parse_opt_enum(status.as_deref(), "status")?,
                faculty: faculty.clone(),
                subject_area: subject.clone(),
            };
            let listing = ctx
                .service
                .list_courses(&filter, ctx.page(*page, flags))
                .await?;
            output(&listing, flags.format)
        }
        CourseCommands::Update { id, json } => {
            let update: CourseUpdate = read_payload(json, "course update")?;
            let course = ctx
                .service
                .update_course(ctx.principal()?, id, update)
                .await?;
            output(&course, flags.format)
        }
        CourseCommands::Delete { id } => {
            let response = ctx.service.delete_course(ctx.principal()?, id).await?;
            output(&response, flags.format)
        }
    }
}
