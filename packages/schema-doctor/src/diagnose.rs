//! Read-only diagnostic queries. Nothing in this module mutates the
//! database; sub-query failures are captured in the report instead of
//! propagated, so the tool degrades into "can't determine X".

use sea_orm::{ConnectionTrait, DbErr, Statement};

/// One row of `DESCRIBE` output, in the database's natural column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub field: String,
    pub col_type: String,
    pub nullable: String,
    pub key: String,
}

/// Structure and row count of an existing table. Each part carries its
/// own failure message when the underlying query did not succeed.
#[derive(Debug)]
pub struct Diagnosis {
    pub columns: Result<Vec<ColumnInfo>, String>,
    pub row_count: Result<i64, String>,
}

/// Table-existence check via `SHOW TABLES LIKE '<name>'`.
pub async fn table_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    table: &str,
) -> Result<bool, DbErr> {
    let stmt = Statement::from_string(
        conn.get_database_backend(),
        format!("SHOW TABLES LIKE '{table}'"),
    );
    let rows = conn.query_all(stmt).await?;
    Ok(!rows.is_empty())
}

/// Fetch column metadata and row count for a table known to exist.
pub async fn diagnose<C: ConnectionTrait + Send + Sync>(conn: &C, table: &str) -> Diagnosis {
    let backend = conn.get_database_backend();

    let describe = Statement::from_string(backend, format!("DESCRIBE `{table}`"));
    let columns = match conn.query_all(describe).await {
        Ok(rows) => rows
            .iter()
            .map(|row| -> Result<ColumnInfo, DbErr> {
                Ok(ColumnInfo {
                    field: row.try_get("", "Field")?,
                    col_type: row.try_get("", "Type")?,
                    nullable: row.try_get("", "Null")?,
                    key: row.try_get("", "Key")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    let count = Statement::from_string(backend, format!("SELECT COUNT(*) AS cnt FROM `{table}`"));
    let row_count = match conn.query_one(count).await {
        Ok(Some(row)) => row.try_get::<i64>("", "cnt").map_err(|e| e.to_string()),
        Ok(None) => Err("count query returned no rows".to_string()),
        Err(e) => Err(e.to_string()),
    };

    Diagnosis { columns, row_count }
}
