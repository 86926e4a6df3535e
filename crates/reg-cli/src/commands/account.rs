use reg_core::enums::Role;
use reg_db::updates::account::NewAccount;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AccountCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `regctl account`.
pub async fn handle(
    action: &AccountCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AccountCommands::Create {
            email,
            role,
            display_name,
        } => {
            let mut new = NewAccount::new(email.as_str(), parse_enum::<Role>(role, "role")?);
            new.display_name.clone_from(display_name);
            let account = ctx
                .service
                .create_account(Some(ctx.principal()?), new)
                .await?;
            output(&account, flags.format)
        }
        AccountCommands::Get { id } => {
            let account = ctx.service.get_account(id).await?;
            output(&account, flags.format)
        }
        AccountCommands::Find { email } => {
            let account = ctx.service.get_account_by_email(email).await?;
            output(&account, flags.format)
        }
    }
}
