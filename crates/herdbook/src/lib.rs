//! Cattle Breed Logbook
//!
//! Classifies cattle breeds from photographs with an ONNX model and keeps
//! per-user measurement records in SQLite.

pub mod commands;
pub mod intake;
pub mod session;
pub mod workflow;
