use clap::Parser;
use db_infra::{connect, DbSettings};
use schema_doctor::{
    diagnose, execute_repair, plan_repair, qualified_name, table_exists, Confirmation,
    ConfirmationSource, RepairReport, StdinConfirmation, TableExistence,
};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::error;

const BANNER: &str =
    "============================================================================";

#[derive(Parser)]
#[command(name = "schema-doctor")]
#[command(about = "Testdeck missing testcase_relations table diagnostic & fix tool")]
#[command(version)]
struct Args {}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("schema_doctor=info,doctor_cli=info,sqlx=warn")
        .init();

    let _args = Args::parse();

    println!("{BANNER}");
    println!(" Testdeck - Missing testcase_relations Table Diagnostic & Fix Tool");
    println!("{BANNER}\n");

    // Missing configuration and a failed connection are the only fatal
    // errors; both exit non-zero before any SQL is issued.
    let settings = match DbSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let conn: DatabaseConnection = match connect(&settings).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Could not connect to database: {e}");
            std::process::exit(1);
        }
    };
    println!("[OK] Successfully connected to database");

    run(&conn, &settings.table_prefix, &mut StdinConfirmation).await;

    println!("\n{BANNER}");
    println!(" Diagnostic Complete");
    println!("{BANNER}");
}

async fn run<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prefix: &str,
    confirm: &mut dyn ConfirmationSource,
) {
    let table = qualified_name(prefix);
    println!(
        "[INFO] Using table prefix: '{}'",
        if prefix.is_empty() { "(none)" } else { prefix }
    );
    println!("[INFO] Full table name: '{table}'\n");

    println!("Checking if table exists...");
    let exists = match table_exists(conn, &table).await {
        Ok(exists) => exists,
        Err(e) => {
            // Reported, not fatal: the operator re-runs after fixing access.
            println!("[ERROR] Could not determine whether '{table}' exists: {e}");
            return;
        }
    };

    if exists {
        report_existing(conn, &table).await;
    } else {
        repair_missing(conn, prefix, &table, confirm).await;
    }
}

async fn report_existing<C: ConnectionTrait + Send + Sync>(conn: &C, table: &str) {
    println!("[OK] Table '{table}' already exists!");
    println!("\nVerifying table structure...");

    let diagnosis = diagnose(conn, table).await;

    match diagnosis.columns {
        Ok(columns) => {
            let rule = "-".repeat(80);
            println!("\nTable structure:");
            println!("{rule}");
            println!("{:<20} {:<20} {:<10} {:<10}", "Field", "Type", "Null", "Key");
            println!("{rule}");
            for col in columns {
                println!(
                    "{:<20} {:<20} {:<10} {:<10}",
                    col.field, col.col_type, col.nullable, col.key
                );
            }
            println!("{rule}");
        }
        Err(e) => println!("[ERROR] Could not read table structure: {e}"),
    }

    match diagnosis.row_count {
        Ok(count) => println!("\n[INFO] Table contains {count} relationship(s)"),
        Err(e) => println!("[ERROR] Could not count rows: {e}"),
    }

    println!("\n[SUCCESS] Table exists and is accessible.");
    println!("If you're still getting errors, please check:");
    println!("  1. Database user permissions");
    println!("  2. Testdeck database configuration");
    println!("  3. Application logs for more details");
}

async fn repair_missing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prefix: &str,
    table: &str,
    confirm: &mut dyn ConfirmationSource,
) {
    println!("[ERROR] Table '{table}' does NOT exist!\n");

    let decision = match confirm.confirm("Would you like to create it now? (yes/no):") {
        Ok(decision) => decision,
        Err(e) => {
            println!("[ERROR] Could not read confirmation: {e}");
            Confirmation::Declined
        }
    };

    if decision == Confirmation::Declined {
        println!("\nTable creation cancelled.");
        print_manual_fallback(table);
        return;
    }

    println!("\nCreating table '{table}'...");
    let actions = plan_repair(TableExistence::Absent, decision);
    match execute_repair(conn, prefix, &actions).await {
        RepairReport::NothingToDo => {}
        RepairReport::TableCreateFailed { error } => {
            println!("[ERROR] Failed to create table!");
            println!("Error: {error}");
            print_manual_fallback(table);
        }
        RepairReport::Created { index_results } => {
            println!("[SUCCESS] Table created successfully!\n");
            println!("Creating indexes for better performance...");
            for (name, result) in index_results {
                match result {
                    Ok(()) => println!("[OK] Index '{name}' created"),
                    Err(e) => println!("[ERROR] Index '{name}' failed: {e}"),
                }
            }
            println!("\nThe testcase_relations table has been created.");
            println!("You should now be able to print documents without errors.");
        }
    }
}

fn print_manual_fallback(table: &str) {
    println!("\nTo create the table '{table}' manually, apply the bundled SQL script:");
    println!("  mysql -u <user> -p <database> < create_testcase_relations_table.sql");
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use super::*;

    /// Canned confirmation source: hands out prepared answers instead of
    /// reading a terminal.
    struct CannedConfirmation(Vec<io::Result<Confirmation>>);

    impl ConfirmationSource for CannedConfirmation {
        fn confirm(&mut self, _question: &str) -> io::Result<Confirmation> {
            self.0.remove(0)
        }
    }

    fn absent_table() -> MockDatabase {
        // SHOW TABLES LIKE comes back empty.
        MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
    }

    fn assert_no_mutations(conn: sea_orm::DatabaseConnection, expected_statements: usize) {
        let log = conn.into_transaction_log();
        assert_eq!(log.len(), expected_statements);
        for stmt in log {
            let sql = format!("{stmt:?}");
            assert!(!sql.contains("CREATE"), "mutating statement issued: {sql}");
        }
    }

    #[tokio::test]
    async fn declined_repair_issues_no_mutating_statements() {
        let conn = absent_table().into_connection();
        let mut confirm = CannedConfirmation(vec![Ok(Confirmation::Declined)]);

        run(&conn, "tl_", &mut confirm).await;

        assert_no_mutations(conn, 1);
    }

    #[tokio::test]
    async fn confirmation_read_error_defaults_to_declined() {
        let conn = absent_table().into_connection();
        let mut confirm = CannedConfirmation(vec![Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        ))]);

        run(&conn, "", &mut confirm).await;

        assert_no_mutations(conn, 1);
    }

    #[tokio::test]
    async fn accepted_repair_creates_table_and_indexes() {
        let ok = MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        };
        let conn = absent_table()
            .append_exec_results(vec![ok; 4])
            .into_connection();
        let mut confirm = CannedConfirmation(vec![Ok(Confirmation::Accepted)]);

        run(&conn, "", &mut confirm).await;

        // Existence check plus CREATE TABLE plus three CREATE INDEX.
        let log = conn.into_transaction_log();
        assert_eq!(log.len(), 5);
    }

    #[tokio::test]
    async fn present_table_never_prompts() {
        let conn = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![BTreeMap::from([(
                "Tables_in_testdeck",
                Value::from("testcase_relations"),
            )])]])
            .append_query_results([vec![BTreeMap::from([
                ("Field", Value::from("id")),
                ("Type", Value::from("int(10) unsigned")),
                ("Null", Value::from("NO")),
                ("Key", Value::from("PRI")),
            ])]])
            .append_query_results([vec![BTreeMap::from([("cnt", Value::from(42i64))])]])
            .into_connection();
        // Empty answer list: any prompt would panic the test.
        let mut confirm = CannedConfirmation(Vec::new());

        run(&conn, "", &mut confirm).await;

        assert_no_mutations(conn, 3);
    }
}
