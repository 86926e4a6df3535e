use reg_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl audit`. Newest entries first, capped by `--limit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: parse_opt_enum(args.entity_type.as_deref(), "entity type")?,
        entity_id: args.entity_id.clone(),
        action: parse_opt_enum(args.action.as_deref(), "action")?,
        actor_id: args.actor.clone(),
        limit: Some(ctx.config.general.effective_limit(flags.limit)),
    };
    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
