use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::schema::{ensure_table, TableSpec, TableStatus};
use crate::error::{Result, SqlContext};
use crate::models::Company;

pub const TABLE: TableSpec = TableSpec {
    name: "companies",
    columns: "id INTEGER PRIMARY KEY,
            company_name TEXT NOT NULL,
            company_phone_number TEXT NOT NULL DEFAULT '',
            company_email TEXT NOT NULL DEFAULT '',
            business_number TEXT NOT NULL DEFAULT '',
            web_address TEXT NOT NULL DEFAULT '',
            is_active INTEGER NOT NULL DEFAULT 1",
};

const SELECT_COLUMNS: &str = "SELECT id, company_name, company_phone_number, company_email,
        business_number, web_address, is_active
     FROM companies";

pub fn create_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &TABLE)
}

/// Insert a company with the id already chosen by the caller.
pub fn insert(conn: &Connection, company: &Company) -> Result<()> {
    conn.execute(
        "INSERT INTO companies (
            id, company_name, company_phone_number, company_email,
            business_number, web_address, is_active
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            company.id,
            company.company_name,
            company.company_phone_number,
            company.company_email,
            company.business_number,
            company.web_address,
            company.is_active,
        ],
    )
    .context("failed to insert company")?;
    Ok(())
}

pub fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<Company>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [id],
        company_from_row,
    )
    .optional()
    .context("failed to load company")
}

/// Every company that has not been soft-deleted, alphabetically.
pub fn fetch_active(conn: &Connection) -> Result<Vec<Company>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE is_active = 1 ORDER BY company_name COLLATE NOCASE"
        ))
        .context("failed to prepare company query")?;

    let companies = stmt
        .query_map([], company_from_row)
        .context("failed to load companies")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect companies")?;

    Ok(companies)
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        company_name: row.get(1)?,
        company_phone_number: row.get(2)?,
        company_email: row.get(3)?,
        business_number: row.get(4)?,
        web_address: row.get(5)?,
        is_active: row.get(6)?,
    })
}
