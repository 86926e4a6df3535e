//! # reg-core
//!
//! Core types, ID generation, and error types for Registrar.
//!
//! This crate provides the foundational types shared across all Registrar crates:
//! - Entity structs for accounts, students, courses, class offerings, and enrollments
//! - Status enums, including the enrollment state machine and seat-holding rules
//! - ID prefix constants
//! - The closed error taxonomy surfaced at the boundary
//! - Credit-weighted GPA aggregation
//! - Response and projection types returned by `regctl`
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod gpa;
pub mod identity;
pub mod ids;
pub mod responses;
