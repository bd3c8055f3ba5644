//! Database bootstrap, models and data access

pub mod init;
pub mod instruments;
pub mod migrations;
pub mod models;
pub mod notes;
pub mod schema_sync;
pub mod study_notes;
pub mod table_schemas;

pub use init::*;
pub use migrations::run_migrations;
pub use models::*;
pub use schema_sync::*;
pub use table_schemas::*;
