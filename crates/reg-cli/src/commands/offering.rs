use reg_db::repos::class_offering::OfferingFilter;
use reg_db::updates::class_offering::{ClassOfferingUpdate, NewClassOffering};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OfferingCommands;
use crate::commands::shared::parse::parse_opt_enum;
use crate::commands::shared::payload::read_payload;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl offering`.
pub async fn handle(
    action: &OfferingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OfferingCommands::Create { json } => {
            let new: NewClassOffering = read_payload(json, "offering")?;
            let offering = ctx
                .service
                .create_class_offering(ctx.principal()?, new)
                .await?;
            output(&offering, flags.format)
        }
        OfferingCommands::Get { id } => {
            let offering = ctx.service.get_class_offering(id).await?;
            output(&offering, flags.format)
        }
        OfferingCommands::List {
            course,
            semester,
            status,
            page,
        } => {
            let filter = OfferingFilter {
                course_id: course.clone(),
                semester: semester.clone(),
                status: parse_opt_enum(status.as_deref(), "status")?,
            };
            let listing = ctx
                .service
                .list_class_offerings(&filter, ctx.page(*page, flags))
                .await?;
            output(&listing, flags.format)
        }
        OfferingCommands::Update { id, json } => {
            let update: ClassOfferingUpdate = read_payload(json, "offering update")?;
            let offering = ctx
                .service
                .update_class_offering(ctx.principal()?, id, update)
                .await?;
            output(&offering, flags.format)
        }
        OfferingCommands::Capacity { id, capacity } => {
            let offering = ctx
                .service
                .set_capacity(ctx.principal()?, id, *capacity)
                .await?;
            output(&offering, flags.format)
        }
        OfferingCommands::Reconcile { id } => {
            let response = ctx
                .service
                .reconcile_enrolled_count(ctx.principal()?, id)
                .await?;
            output(&response, flags.format)
        }
        OfferingCommands::Roster { id } => {
            let roster = ctx.service.list_for_class(id).await?;
            output(&roster, flags.format)
        }
        OfferingCommands::Delete { id } => {
            let response = ctx
                .service
                .delete_class_offering(ctx.principal()?, id)
                .await?;
            output(&response, flags.format)
        }
    }
}
