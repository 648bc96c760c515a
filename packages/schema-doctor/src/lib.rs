//! Integrity checker for the `testcase_relations` table.
//!
//! Verifies that the table exists in the configured database; when it is
//! missing, an operator-confirmed repair creates the table and its
//! secondary indexes. The decision core is a pure function of the
//! existence check and the confirmation, so the whole repair path is
//! testable without a terminal or a live database.

pub mod confirm;
pub mod descriptor;
pub mod diagnose;
pub mod plan;
pub mod repair;

pub use confirm::{Confirmation, ConfirmationSource, StdinConfirmation};
pub use descriptor::qualified_name;
pub use diagnose::{diagnose, table_exists, ColumnInfo, Diagnosis};
pub use plan::{plan_repair, RepairAction, TableExistence};
pub use repair::{execute_repair, RepairReport};
