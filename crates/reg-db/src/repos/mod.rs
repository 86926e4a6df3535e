//! Repository modules implementing the Registrar operations.
//!
//! Each module adds methods to `RegistrarService` via `impl RegistrarService` blocks.

pub mod account;
pub mod audit;
pub mod capacity;
pub mod class_offering;
pub mod course;
pub mod enrollment;
pub mod gpa;
pub mod grading;
pub mod student;
