use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, SqlContext};

/// Static description of one table: its name and the column list that goes
/// between the parentheses of `CREATE TABLE`.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static str,
}

/// What a `create_table` call did. Creating a table that already exists is
/// never an error and never touches its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    AlreadyPresent,
}

/// Does the catalog list a table with this name?
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |_| Ok(()),
        )
        .optional()
        .context("failed to query sqlite_master")?;
    Ok(found.is_some())
}

/// Create the table unless the catalog already has it.
pub fn ensure_table(conn: &Connection, spec: &TableSpec) -> Result<TableStatus> {
    if table_exists(conn, spec.name)? {
        debug!(table = spec.name, "table already present");
        return Ok(TableStatus::AlreadyPresent);
    }

    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        spec.name, spec.columns
    );
    conn.execute(&ddl, []).context("failed to create table")?;
    debug!(table = spec.name, "table created");
    Ok(TableStatus::Created)
}
