//! Account repository.
//!
//! Accounts carry identity and role only; credentials are handled by the
//! auth collaborator and never stored here.

use chrono::Utc;

use reg_core::entities::Account;
use reg_core::enums::{AuditAction, EntityType, Role};
use reg_core::identity::Principal;
use reg_core::ids::PREFIX_ACCOUNT;

use crate::constraint::classify_write_error;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::RegistrarService;
use crate::updates::account::NewAccount;

const SELECT_COLS: &str = "id, email, role, status, display_name, created_at, updated_at";

fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        display_name: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl RegistrarService {
    /// Create an account. `actor` is `None` only when bootstrapping the
    /// first administrator.
    ///
    /// # Errors
    ///
    /// `Invalid` for a malformed email, `Conflict` if the email is taken.
    pub async fn create_account(
        &self,
        actor: Option<&Principal>,
        new: NewAccount,
    ) -> Result<Account, DatabaseError> {
        let email = new.normalized_email()?;
        if self.find_account_by_email(&email).await?.is_some() {
            return Err(DatabaseError::Conflict(format!("email {email} already exists")));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ACCOUNT).await?;
        let display_name = new
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO accounts ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    id.as_str(),
                    email.as_str(),
                    new.role.as_str(),
                    new.status.as_str(),
                    display_name.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| classify_write_error(e, &format!("email {email}")))?;

        let account = Account {
            id: id.clone(),
            email,
            role: new.role,
            status: new.status,
            display_name,
            created_at: now,
            updated_at: now,
        };

        self.record::<()>(actor, EntityType::Account, &id, AuditAction::Created, None)
            .await?;
        tracing::info!(account_id = %id, role = %account.role, "account created");
        Ok(account)
    }

    pub async fn get_account(&self, id: &str) -> Result<Account, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM accounts WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Account, id))?;
        row_to_account(&row)
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Account, DatabaseError> {
        let email = email.trim().to_lowercase();
        self.find_account_by_email(&email)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Account, &email))
    }

    /// Create the first administrator account. Refused once any admin exists.
    ///
    /// # Errors
    ///
    /// `Conflict` if an admin account already exists or the email is taken.
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        display_name: Option<String>,
    ) -> Result<Account, DatabaseError> {
        let admins = self
            .db()
            .count("SELECT COUNT(*) FROM accounts WHERE role = 'admin'", ())
            .await?;
        if admins > 0 {
            return Err(DatabaseError::Conflict(
                "an administrator account already exists".into(),
            ));
        }
        let mut new = NewAccount::new(email, Role::Admin);
        new.display_name = display_name;
        self.create_account(None, new).await
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM accounts WHERE email = ?1"), [email])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn set_account_display_name(
        &self,
        id: &str,
        display_name: &str,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE accounts SET display_name = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![display_name, Utc::now().to_rfc3339(), id],
            )
            .await?;
        Ok(())
    }

    pub(crate) async fn delete_account(
        &self,
        actor: &Principal,
        id: &str,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute("DELETE FROM accounts WHERE id = ?1", [id])
            .await?;
        if changed > 0 {
            self.record::<()>(Some(actor), EntityType::Account, id, AuditAction::Deleted, None)
                .await?;
        }
        Ok(changed > 0)
    }
}
