//! Executes a repair plan. `CREATE TABLE` failing aborts the run before
//! any index statement; index creations are independent of each other and
//! their failures are aggregated, not propagated.

use sea_orm::{ConnectionTrait, Statement};
use tracing::{info, warn};

use crate::descriptor::{create_index_sql, create_table_sql, qualified_name};
use crate::plan::RepairAction;

#[derive(Debug, PartialEq, Eq)]
pub enum RepairReport {
    /// Empty plan: table present or operator declined.
    NothingToDo,
    /// `CREATE TABLE` failed; no index statements were attempted.
    TableCreateFailed { error: String },
    /// Table created; one entry per attempted index.
    Created {
        index_results: Vec<(&'static str, Result<(), String>)>,
    },
}

pub async fn execute_repair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prefix: &str,
    actions: &[RepairAction],
) -> RepairReport {
    if actions.is_empty() {
        return RepairReport::NothingToDo;
    }

    let backend = conn.get_database_backend();
    let mut index_results = Vec::new();

    for action in actions {
        match action {
            RepairAction::CreateTable => {
                let stmt = Statement::from_string(backend, create_table_sql(prefix));
                if let Err(e) = conn.execute(stmt).await {
                    warn!("table_create=failed table={} error={e}", qualified_name(prefix));
                    return RepairReport::TableCreateFailed {
                        error: e.to_string(),
                    };
                }
                info!("table_create=ok table={}", qualified_name(prefix));
            }
            RepairAction::CreateIndex(index) => {
                let stmt = Statement::from_string(backend, create_index_sql(prefix, index));
                match conn.execute(stmt).await {
                    Ok(_) => {
                        info!("index_create=ok index={}", index.name);
                        index_results.push((index.name, Ok(())));
                    }
                    Err(e) => {
                        warn!("index_create=failed index={} error={e}", index.name);
                        index_results.push((index.name, Err(e.to_string())));
                    }
                }
            }
        }
    }

    RepairReport::Created { index_results }
}
