use reg_config::RegistrarConfig;
use reg_core::entities::Student;
use reg_core::enums::AccountStatus;
use reg_core::errors::ErrorKind;
use reg_core::identity::Principal;
use reg_db::paging::PageRequest;
use reg_db::service::RegistrarService;

use crate::cli::GlobalFlags;
use crate::failure::Rejection;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: RegistrarService,
    pub config: RegistrarConfig,
    pub db_path: String,
    /// Resolved from `--as`; `None` when the flag is absent.
    pub principal: Option<Principal>,
}

impl AppContext {
    /// Open the database and resolve the acting principal.
    pub async fn init(
        db_path: &str,
        config: RegistrarConfig,
        acting_as: Option<&str>,
    ) -> anyhow::Result<Self> {
        let service = RegistrarService::new_local(db_path).await?;
        tracing::debug!(db_path, "registrar database opened");

        let principal = match acting_as {
            Some(account_id) => Some(resolve_principal(&service, account_id).await?),
            None => None,
        };

        Ok(Self {
            service,
            config,
            db_path: db_path.to_string(),
            principal,
        })
    }

    /// The acting principal, required by every role-gated command.
    pub fn principal(&self) -> anyhow::Result<&Principal> {
        self.principal.as_ref().ok_or_else(|| {
            Rejection::AccessDenied("this command requires --as <account-id>".into()).into()
        })
    }

    /// The student record linked to the acting account.
    pub async fn current_student(&self) -> anyhow::Result<Student> {
        let principal = self.principal()?;
        match self
            .service
            .get_student_by_account(&principal.account_id)
            .await
        {
            Ok(student) => Ok(student),
            Err(error) if error.kind() == ErrorKind::NotFound => Err(Rejection::AccessDenied(
                format!("account {} has no student record", principal.account_id),
            )
            .into()),
            Err(error) => Err(error.into()),
        }
    }

    /// Page request with the size resolved from `--limit` and config.
    #[must_use]
    pub fn page(&self, page: Option<u32>, flags: &GlobalFlags) -> PageRequest {
        PageRequest::new(
            page.unwrap_or(1),
            self.config.general.effective_limit(flags.limit),
        )
    }

    /// Timetable semester: explicit, then the student's current one, then config.
    #[must_use]
    pub fn timetable_semester(&self, requested: Option<&str>, student: &Student) -> Option<String> {
        requested
            .map(String::from)
            .or_else(|| student.current_semester.clone())
            .or_else(|| self.config.general.default_semester().map(String::from))
    }
}

async fn resolve_principal(
    service: &RegistrarService,
    account_id: &str,
) -> anyhow::Result<Principal> {
    let account = match service.get_account(account_id).await {
        Ok(account) => account,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(Rejection::AccessDenied(format!("unknown account {account_id}")).into());
        }
        Err(error) => return Err(error.into()),
    };
    if account.status != AccountStatus::Active {
        return Err(Rejection::AccessDenied(format!(
            "account {account_id} is {}",
            account.status.as_str()
        ))
        .into());
    }
    tracing::debug!(account_id, role = %account.role, "principal resolved");
    Ok(Principal::new(account.id, account.role))
}
