//! Shared database configuration and connection bootstrap.
//! Used by the schema doctor CLI.

pub mod config;
pub mod connect;
pub mod error;

pub use config::db::{sanitize_db_url, DbSettings};
pub use connect::connect;
pub use error::DbInfraError;
