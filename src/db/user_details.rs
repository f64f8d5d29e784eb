use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use crate::credentials::verify_password;
use crate::db::schema::{ensure_table, TableSpec, TableStatus};
use crate::error::{Result, SqlContext, StoreError};
use crate::models::UserDetail;

pub const TABLE: TableSpec = TableSpec {
    name: "user_details",
    columns: "id INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            email TEXT NOT NULL DEFAULT '',
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            phone_number TEXT NOT NULL DEFAULT '',
            company_id INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_logged_in INTEGER NOT NULL DEFAULT 0,
            created_date TEXT NOT NULL,
            modified_date TEXT NOT NULL,
            FOREIGN KEY(company_id) REFERENCES companies(id)",
};

const SELECT_COLUMNS: &str = "SELECT id, username, password_hash, email, first_name, last_name,
        phone_number, company_id, is_active, is_logged_in, created_date, modified_date
     FROM user_details";

pub fn create_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &TABLE)
}

/// Insert a user detail row. `password_hash` must already be hashed.
pub fn insert(conn: &Connection, detail: &UserDetail) -> Result<()> {
    conn.execute(
        "INSERT INTO user_details (
            id, username, password_hash, email, first_name, last_name, phone_number,
            company_id, is_active, is_logged_in, created_date, modified_date
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            detail.id,
            detail.username,
            detail.password_hash,
            detail.email,
            detail.first_name,
            detail.last_name,
            detail.phone_number,
            detail.company_id,
            detail.is_active,
            detail.is_logged_in,
            detail.created_date,
            detail.modified_date,
        ],
    )
    .context("failed to insert user detail")?;
    Ok(())
}

pub fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<UserDetail>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [id],
        user_detail_from_row,
    )
    .optional()
    .context("failed to load user detail")
}

/// Usernames are not unique in the schema; the lowest id wins when several
/// rows share one.
pub fn fetch_by_username(conn: &Connection, username: &str) -> Result<Option<UserDetail>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE username = ?1 ORDER BY id LIMIT 1"),
        [username],
        user_detail_from_row,
    )
    .optional()
    .context("failed to load user detail by username")
}

/// Look up an active user and check the password. Returns `None` for unknown
/// users, inactive users and wrong passwords alike so the UI cannot leak which
/// one it was.
pub fn authenticate(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<Option<UserDetail>> {
    let Some(detail) = fetch_by_username(conn, username.trim())? else {
        return Ok(None);
    };

    if !detail.is_active || !verify_password(password, &detail.password_hash) {
        warn!(username = %detail.username, "rejected sign-in attempt");
        return Ok(None);
    }

    Ok(Some(detail))
}

/// Flip the signed-in flag and bump `modified_date`.
pub fn set_logged_in(conn: &Connection, id: i64, logged_in: bool) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE user_details SET is_logged_in = ?1, modified_date = ?2 WHERE id = ?3",
            params![logged_in, Utc::now().to_rfc3339(), id],
        )
        .context("failed to update sign-in state")?;

    if updated == 0 {
        return Err(StoreError::NotFound("user detail"));
    }
    info!(user_detail_id = id, logged_in, "sign-in state changed");
    Ok(())
}

/// The user currently marked as signed in, if any.
pub fn fetch_logged_in(conn: &Connection) -> Result<Option<UserDetail>> {
    conn.query_row(
        &format!(
            "{SELECT_COLUMNS} WHERE is_logged_in = 1 AND is_active = 1 ORDER BY id LIMIT 1"
        ),
        [],
        user_detail_from_row,
    )
    .optional()
    .context("failed to load signed-in user")
}

fn user_detail_from_row(row: &Row<'_>) -> rusqlite::Result<UserDetail> {
    Ok(UserDetail {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        email: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        phone_number: row.get(6)?,
        company_id: row.get(7)?,
        is_active: row.get(8)?,
        is_logged_in: row.get(9)?,
        created_date: row.get(10)?,
        modified_date: row.get(11)?,
    })
}
