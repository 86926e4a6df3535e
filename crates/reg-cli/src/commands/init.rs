use serde::Serialize;

use reg_core::entities::Account;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    database: String,
    admin: Option<Account>,
}

/// Handle `regctl init`. Opening the context already ran migrations.
pub async fn handle(args: &InitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let admin = match &args.admin_email {
        Some(email) => Some(
            ctx.service
                .bootstrap_admin(email, args.display_name.clone())
                .await?,
        ),
        None => None,
    };
    if let Some(admin) = &admin {
        tracing::info!(account_id = %admin.id, "administrator bootstrapped");
    }
    output(
        &InitResponse {
            database: ctx.db_path.clone(),
            admin,
        },
        flags.format,
    )
}
