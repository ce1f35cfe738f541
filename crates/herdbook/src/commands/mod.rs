//! CLI command implementations.

pub mod classify;
pub mod login;
pub mod profile;
pub mod records;
pub mod save;
pub mod shell;
pub mod signup;
