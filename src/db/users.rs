use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::schema::{ensure_table, TableSpec, TableStatus};
use crate::error::{Result, SqlContext};
use crate::models::User;

pub const TABLE: TableSpec = TableSpec {
    name: "users",
    columns: "id INTEGER PRIMARY KEY,
            user_detail_id INTEGER NOT NULL,
            created_date TEXT NOT NULL,
            modified_date TEXT NOT NULL,
            FOREIGN KEY(user_detail_id) REFERENCES user_details(id)",
};

pub fn create_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &TABLE)
}

pub fn insert(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, user_detail_id, created_date, modified_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            user.id,
            user.user_detail_id,
            user.created_date,
            user.modified_date
        ],
    )
    .context("failed to insert user")?;
    Ok(())
}

pub fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, user_detail_id, created_date, modified_date FROM users WHERE id = ?1",
        [id],
        user_from_row,
    )
    .optional()
    .context("failed to load user")
}

pub fn fetch_by_user_detail_id(conn: &Connection, user_detail_id: i64) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, user_detail_id, created_date, modified_date
             FROM users
             WHERE user_detail_id = ?1
             ORDER BY id",
        )
        .context("failed to prepare user query")?;

    let users = stmt
        .query_map([user_detail_id], user_from_row)
        .context("failed to load users")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect users")?;

    Ok(users)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        user_detail_id: row.get(1)?,
        created_date: row.get(2)?,
        modified_date: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{companies, user_details};
    use crate::models::{Company, UserDetail};

    const STAMP: &str = "2024-01-01T00:00:00+00:00";

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch("PRAGMA foreign_keys = ON")
            .expect("enable foreign keys");
        companies::create_table(&conn).expect("create companies");
        user_details::create_table(&conn).expect("create user details");
        create_table(&conn).expect("create users");

        companies::insert(
            &conn,
            &Company {
                id: 1,
                company_name: "Demo Company".to_string(),
                company_phone_number: String::new(),
                company_email: String::new(),
                business_number: String::new(),
                web_address: String::new(),
                is_active: true,
            },
        )
        .expect("insert company");
        for (id, username) in [(1, "admin"), (2, "demo")] {
            user_details::insert(
                &conn,
                &UserDetail {
                    id,
                    username: username.to_string(),
                    password_hash: String::new(),
                    email: String::new(),
                    first_name: String::new(),
                    last_name: String::new(),
                    phone_number: String::new(),
                    company_id: 1,
                    is_active: true,
                    is_logged_in: false,
                    created_date: STAMP.to_string(),
                    modified_date: STAMP.to_string(),
                },
            )
            .expect("insert user detail");
        }
        conn
    }

    fn user(id: i64, user_detail_id: i64) -> User {
        User {
            id,
            user_detail_id,
            created_date: STAMP.to_string(),
            modified_date: STAMP.to_string(),
        }
    }

    #[test]
    fn users_load_by_id_and_by_detail() {
        let conn = setup();
        insert(&conn, &user(1, 1)).expect("insert");
        insert(&conn, &user(2, 2)).expect("insert");
        insert(&conn, &user(3, 1)).expect("insert");

        assert_eq!(fetch_by_id(&conn, 2).expect("fetch"), Some(user(2, 2)));
        assert!(fetch_by_id(&conn, 9).expect("fetch").is_none());

        let ids: Vec<i64> = fetch_by_user_detail_id(&conn, 1)
            .expect("fetch by detail")
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(fetch_by_user_detail_id(&conn, 9)
            .expect("fetch by detail")
            .is_empty());
    }

    #[test]
    fn unknown_user_detail_is_rejected_by_foreign_key() {
        let conn = setup();

        assert!(insert(&conn, &user(1, 42)).is_err());
        assert!(fetch_by_id(&conn, 1).expect("fetch").is_none());
    }
}
