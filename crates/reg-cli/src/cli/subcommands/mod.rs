mod account;
mod course;
mod enrollment;
mod grade;
mod offering;
mod profile;
mod student;

pub use account::AccountCommands;
pub use course::CourseCommands;
pub use enrollment::EnrollmentCommands;
pub use grade::GradeCommands;
pub use offering::OfferingCommands;
pub use profile::ProfileCommands;
pub use student::StudentCommands;
