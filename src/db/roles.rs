use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::schema::{ensure_table, TableSpec, TableStatus};
use crate::error::{Result, SqlContext};
use crate::models::Role;

pub const TABLE: TableSpec = TableSpec {
    name: "roles",
    columns: "id INTEGER PRIMARY KEY,
            role_name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1",
};

pub fn create_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &TABLE)
}

pub fn insert(conn: &Connection, role: &Role) -> Result<()> {
    conn.execute(
        "INSERT INTO roles (id, role_name, is_active) VALUES (?1, ?2, ?3)",
        params![role.id, role.role_name, role.is_active],
    )
    .context("failed to insert role")?;
    Ok(())
}

pub fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<Role>> {
    conn.query_row(
        "SELECT id, role_name, is_active FROM roles WHERE id = ?1",
        [id],
        role_from_row,
    )
    .optional()
    .context("failed to load role")
}

pub fn fetch_all(conn: &Connection) -> Result<Vec<Role>> {
    let mut stmt = conn
        .prepare("SELECT id, role_name, is_active FROM roles ORDER BY id")
        .context("failed to prepare role query")?;

    let roles = stmt
        .query_map([], role_from_row)
        .context("failed to load roles")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect roles")?;

    Ok(roles)
}

fn role_from_row(row: &Row<'_>) -> rusqlite::Result<Role> {
    Ok(Role {
        id: row.get(0)?,
        role_name: row.get(1)?,
        is_active: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_come_back_in_id_order() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        create_table(&conn).expect("create roles");
        for (id, name) in [(2, "User"), (1, "Admin")] {
            insert(
                &conn,
                &Role {
                    id,
                    role_name: name.to_string(),
                    is_active: true,
                },
            )
            .expect("insert role");
        }

        let names: Vec<String> = fetch_all(&conn)
            .expect("fetch roles")
            .into_iter()
            .map(|role| role.role_name)
            .collect();
        assert_eq!(names, vec!["Admin".to_string(), "User".to_string()]);
        assert_eq!(
            fetch_by_id(&conn, 2).expect("fetch role").map(|r| r.role_name),
            Some("User".to_string())
        );
    }
}
