//! Role gating for the command tree.
//!
//! The engine trusts the principal it is handed; this is the only place a
//! role is checked. Both the command audience and the role are matched
//! exhaustively so a new variant of either fails to compile until gated.

use reg_core::enums::Role;
use reg_core::identity::Principal;

use crate::cli::Commands;
use crate::failure::Rejection;

/// Who may run a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience {
    /// No principal needed.
    Anyone,
    /// A student acting on their own record.
    Student,
    Admin,
}

#[must_use]
pub const fn audience(command: &Commands) -> Audience {
    match command {
        Commands::Init(_) => Audience::Anyone,
        Commands::Enroll(_)
        | Commands::Drop(_)
        | Commands::Enrollments(_)
        | Commands::Grades(_)
        | Commands::Gpa
        | Commands::Available(_)
        | Commands::Timetable(_)
        | Commands::Profile { .. } => Audience::Student,
        Commands::Grade { .. }
        | Commands::Enrollment { .. }
        | Commands::Course { .. }
        | Commands::Offering { .. }
        | Commands::Student { .. }
        | Commands::Account { .. }
        | Commands::Audit(_) => Audience::Admin,
    }
}

/// Check the principal against the audience.
///
/// # Errors
///
/// `AccessDenied` when the principal is missing or has the wrong role.
pub fn authorize(audience: Audience, principal: Option<&Principal>) -> Result<(), Rejection> {
    let Some(principal) = principal else {
        return match audience {
            Audience::Anyone => Ok(()),
            Audience::Student | Audience::Admin => Err(Rejection::AccessDenied(
                "this command requires --as <account-id>".into(),
            )),
        };
    };

    match (audience, principal.role) {
        (Audience::Anyone, Role::Student | Role::Admin)
        | (Audience::Student, Role::Student)
        | (Audience::Admin, Role::Admin) => Ok(()),
        (Audience::Student, Role::Admin) => Err(Rejection::AccessDenied(
            "student self-service command; use the administrative commands instead".into(),
        )),
        (Audience::Admin, Role::Student) => Err(Rejection::AccessDenied(
            "administrator privileges required".into(),
        )),
    }
}
