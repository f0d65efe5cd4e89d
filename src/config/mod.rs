/// Database configuration and connection management
pub mod database;

/// Category seeding, report and audit settings from config.toml
pub mod categories;

pub use categories::{AppConfig, AuditConfig, CategoryConfig, ReportConfig};
