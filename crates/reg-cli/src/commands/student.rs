use reg_db::repos::student::StudentFilter;
use reg_db::updates::student::{NewStudent, StudentUpdate};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudentCommands;
use crate::commands::shared::parse::parse_opt_enum;
use crate::commands::shared::payload::read_payload;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl student`.
pub async fn handle(
    action: &StudentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        StudentCommands::Create { json } => {
            let new: NewStudent = read_payload(json, "student")?;
            let student = ctx.service.create_student(ctx.principal()?, new).await?;
            output(&student, flags.format)
        }
        StudentCommands::Get { id } => {
            let student = ctx.service.get_student(id).await?;
            output(&student, flags.format)
        }
        StudentCommands::List {
            status,
            cohort,
            page,
        } => {
            let filter = StudentFilter {
                status: parse_opt_enum(status.as_deref(), "status")?,
                cohort_year: *cohort,
            };
            let listing = ctx
                .service
                .list_students(&filter, ctx.page(*page, flags))
                .await?;
            output(&listing, flags.format)
        }
        StudentCommands::Update { id, json } => {
            let update: StudentUpdate = read_payload(json, "student update")?;
            let student = ctx
                .service
                .update_student(ctx.principal()?, id, update)
                .await?;
            output(&student, flags.format)
        }
        StudentCommands::Delete { id } => {
            let response = ctx.service.delete_student(ctx.principal()?, id).await?;
            output(&response, flags.format)
        }
        StudentCommands::Gpa { id } => {
            let response = ctx.service.recompute_gpa(ctx.principal()?, id).await?;
            output(&response, flags.format)
        }
        StudentCommands::Grades { id, semester } => {
            let grades = ctx
                .service
                .grades_for_student(id, semester.as_deref())
                .await?;
            output(&grades, flags.format)
        }
        StudentCommands::Timetable { id, semester } => {
            let student = ctx.service.get_student(id).await?;
            let semester = ctx.timetable_semester(semester.as_deref(), &student);
            let timetable = ctx.service.timetable(id, semester.as_deref()).await?;
            output(&timetable, flags.format)
        }
    }
}
