//! Entity structs for all Registrar domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `reg-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema validation.

mod account;
mod audit;
mod class_offering;
mod course;
mod enrollment;
mod student;

pub use account::Account;
pub use audit::AuditEntry;
pub use class_offering::{ClassOffering, Meeting};
pub use course::Course;
pub use enrollment::{Enrollment, ScoreEntry};
pub use student::Student;
