//! ID prefix constants.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, generated in SQL by
//! `RegistrarDb::generate_id`.

pub const PREFIX_ACCOUNT: &str = "acc";
pub const PREFIX_STUDENT: &str = "stu";
pub const PREFIX_COURSE: &str = "crs";
pub const PREFIX_CLASS_OFFERING: &str = "cls";
pub const PREFIX_ENROLLMENT: &str = "enr";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive ID tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ACCOUNT,
    PREFIX_STUDENT,
    PREFIX_COURSE,
    PREFIX_CLASS_OFFERING,
    PREFIX_ENROLLMENT,
    PREFIX_AUDIT,
];
