//! Student self-service: every command here acts on the record linked to
//! the calling account.

use reg_db::repos::class_offering::AvailableFilter;
use reg_db::repos::enrollment::EnrollmentFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{
    AvailableArgs, DropArgs, EnrollArgs, OwnEnrollmentsArgs, SemesterArgs,
};
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn enroll(args: &EnrollArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let principal = ctx.principal()?;
    let student = ctx.current_student().await?;
    let response = ctx
        .service
        .enroll(principal, &student.id, &args.class_id, args.semester.as_deref())
        .await?;
    output(&response, flags.format)
}

pub async fn drop_own(args: &DropArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let principal = ctx.principal()?;
    let student = ctx.current_student().await?;
    let response = ctx
        .service
        .drop_enrollment(principal, &args.enrollment_id, &student.id)
        .await?;
    output(&response, flags.format)
}

pub async fn list_own_enrollments(
    args: &OwnEnrollmentsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let student = ctx.current_student().await?;
    let filter = EnrollmentFilter {
        semester: args.semester.clone(),
        status: parse_opt_enum(args.status.as_deref(), "status")?,
    };
    let enrollments = ctx.service.list_for_student(&student.id, &filter).await?;
    output(&enrollments, flags.format)
}

pub async fn own_grades(args: &SemesterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let student = ctx.current_student().await?;
    let grades = ctx
        .service
        .grades_for_student(&student.id, args.semester.as_deref())
        .await?;
    output(&grades, flags.format)
}

pub async fn own_gpa(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let principal = ctx.principal()?;
    let student = ctx.current_student().await?;
    let response = ctx.service.recompute_gpa(principal, &student.id).await?;
    output(&response, flags.format)
}

pub async fn available(args: &AvailableArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AvailableFilter {
        course_id: args.course.clone(),
        semester: args.semester.clone(),
    };
    let offerings = ctx.service.list_available_offerings(&filter).await?;
    output(&offerings, flags.format)
}

pub async fn own_timetable(
    args: &SemesterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let student = ctx.current_student().await?;
    let semester = ctx.timetable_semester(args.semester.as_deref(), &student);
    let timetable = ctx.service.timetable(&student.id, semester.as_deref()).await?;
    output(&timetable, flags.format)
}
