use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{sanitize_db_url, DbSettings};
use crate::error::DbInfraError;

/// Open the single connection used for a doctor run.
///
/// No retries: a connection failure is fatal at the caller and the tool is
/// meant to be re-run by a human after the problem is fixed. The connection
/// is released when the handle is dropped at process exit.
pub async fn connect(settings: &DbSettings) -> Result<DatabaseConnection, DbInfraError> {
    let url = settings.url();
    info!("db_connect url={}", sanitize_db_url(&url));

    let mut opt = ConnectOptions::new(&url);
    opt.min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .sqlx_logging(true);

    Database::connect(opt)
        .await
        .map_err(|e| DbInfraError::connection(format!("failed to connect to MySQL: {e}")))
}
