pub mod access;
mod account;
mod audit;
mod course;
pub mod dispatch;
mod enrollment;
mod grade;
mod init;
mod offering;
mod profile;
mod self_service;
pub mod shared;
mod student;
