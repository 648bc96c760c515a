//! Hard-coded descriptor of the one table this tool repairs.
//!
//! The column set and types must match what the consuming application
//! expects, so they are fixed here rather than configurable.

use sea_orm::sea_query::{Alias, ColumnDef, Expr, Index, MysqlQueryBuilder, Table};
use sea_orm::DeriveIden;

pub const BASE_TABLE_NAME: &str = "testcase_relations";

#[derive(DeriveIden, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestcaseRelations {
    Id,
    SourceId,
    DestinationId,
    RelationType,
    AuthorId,
    CreationTs,
}

/// One secondary index, created independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub column: TestcaseRelations,
}

pub static SECONDARY_INDEXES: [IndexSpec; 3] = [
    IndexSpec {
        name: "idx_testcase_relations_source",
        column: TestcaseRelations::SourceId,
    },
    IndexSpec {
        name: "idx_testcase_relations_destination",
        column: TestcaseRelations::DestinationId,
    },
    IndexSpec {
        name: "idx_testcase_relations_type",
        column: TestcaseRelations::RelationType,
    },
];

/// The actual table name used in every statement: configured prefix plus
/// the canonical base name.
pub fn qualified_name(prefix: &str) -> String {
    format!("{prefix}{BASE_TABLE_NAME}")
}

/// Render the `CREATE TABLE` statement for MySQL.
pub fn create_table_sql(prefix: &str) -> String {
    Table::create()
        .table(Alias::new(qualified_name(prefix)))
        .col(
            ColumnDef::new(TestcaseRelations::Id)
                .unsigned()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(TestcaseRelations::SourceId)
                .unsigned()
                .not_null(),
        )
        .col(
            ColumnDef::new(TestcaseRelations::DestinationId)
                .unsigned()
                .not_null(),
        )
        .col(
            ColumnDef::new(TestcaseRelations::RelationType)
                .small_unsigned()
                .not_null()
                .default(1),
        )
        .col(ColumnDef::new(TestcaseRelations::AuthorId).unsigned().null())
        .col(
            ColumnDef::new(TestcaseRelations::CreationTs)
                .timestamp()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .comment("Test case relationships")
        .to_owned()
        .to_string(MysqlQueryBuilder)
}

/// Render one `CREATE INDEX` statement for MySQL.
pub fn create_index_sql(prefix: &str, index: &IndexSpec) -> String {
    Index::create()
        .name(index.name)
        .table(Alias::new(qualified_name(prefix)))
        .col(index.column)
        .to_owned()
        .to_string(MysqlQueryBuilder)
}
