//! Core business logic - framework-agnostic weighing, period and reporting operations.
//!
//! Everything here takes a `DatabaseConnection` (or plain data) and returns
//! structured results; presentation is left to the CLI layer.

pub mod aggregate;
pub mod audit;
pub mod category;
pub mod history;
pub mod period;
pub mod report;
pub mod session;
