//! Report layouts and the per-company layout choice made in the layout dialog.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::db::schema::{ensure_table, TableSpec, TableStatus};
use crate::error::{Result, SqlContext};
use crate::models::{Layout, LayoutPreference};

pub const TABLE: TableSpec = TableSpec {
    name: "layouts",
    columns: "id INTEGER PRIMARY KEY,
            layout_name TEXT NOT NULL,
            company_id INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_shared INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(company_id) REFERENCES companies(id)",
};

/// One row per company; saving again replaces the previous choice.
pub const PREFERENCE_TABLE: TableSpec = TableSpec {
    name: "company_layouts",
    columns: "company_id INTEGER PRIMARY KEY,
            layout_id INTEGER NOT NULL,
            layout_name TEXT NOT NULL,
            modified_date TEXT NOT NULL,
            FOREIGN KEY(company_id) REFERENCES companies(id),
            FOREIGN KEY(layout_id) REFERENCES layouts(id)",
};

pub fn create_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &TABLE)
}

pub fn create_preference_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &PREFERENCE_TABLE)
}

pub fn insert(conn: &Connection, layout: &Layout) -> Result<()> {
    conn.execute(
        "INSERT INTO layouts (id, layout_name, company_id, is_active, is_shared)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            layout.id,
            layout.layout_name,
            layout.company_id,
            layout.is_active,
            layout.is_shared,
        ],
    )
    .context("failed to insert layout")?;
    Ok(())
}

/// All layouts owned by a company, active or not. Filtering is left to the
/// caller so the dialog can decide what to show.
pub fn fetch_by_company_id(conn: &Connection, company_id: i64) -> Result<Vec<Layout>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, layout_name, company_id, is_active, is_shared
             FROM layouts
             WHERE company_id = ?1
             ORDER BY id",
        )
        .context("failed to prepare layout query")?;

    let layouts = stmt
        .query_map([company_id], layout_from_row)
        .context("failed to load layouts")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect layouts")?;

    Ok(layouts)
}

/// Remember the layout a company picked, replacing any earlier choice.
pub fn save_company_layout(
    conn: &Connection,
    company_id: i64,
    layout: &Layout,
) -> Result<LayoutPreference> {
    let modified_date = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO company_layouts (company_id, layout_id, layout_name, modified_date)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(company_id) DO UPDATE SET
             layout_id = excluded.layout_id,
             layout_name = excluded.layout_name,
             modified_date = excluded.modified_date",
        params![company_id, layout.id, layout.layout_name, modified_date],
    )
    .context("failed to save company layout")?;

    info!(company_id, layout_id = layout.id, "company layout saved");
    Ok(LayoutPreference {
        company_id,
        layout_id: layout.id,
        layout_name: layout.layout_name.clone(),
        modified_date,
    })
}

pub fn fetch_company_layout(
    conn: &Connection,
    company_id: i64,
) -> Result<Option<LayoutPreference>> {
    conn.query_row(
        "SELECT company_id, layout_id, layout_name, modified_date
         FROM company_layouts
         WHERE company_id = ?1",
        [company_id],
        |row| {
            Ok(LayoutPreference {
                company_id: row.get(0)?,
                layout_id: row.get(1)?,
                layout_name: row.get(2)?,
                modified_date: row.get(3)?,
            })
        },
    )
    .optional()
    .context("failed to load company layout")
}

fn layout_from_row(row: &Row<'_>) -> rusqlite::Result<Layout> {
    Ok(Layout {
        id: row.get(0)?,
        layout_name: row.get(1)?,
        company_id: row.get(2)?,
        is_active: row.get(3)?,
        is_shared: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::companies;
    use crate::models::Company;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch("PRAGMA foreign_keys = ON")
            .expect("enable foreign keys");
        companies::create_table(&conn).expect("create companies");
        create_table(&conn).expect("create layouts");
        create_preference_table(&conn).expect("create preferences");
        for id in [1, 2] {
            companies::insert(
                &conn,
                &Company {
                    id,
                    company_name: format!("Company {id}"),
                    company_phone_number: String::new(),
                    company_email: String::new(),
                    business_number: String::new(),
                    web_address: String::new(),
                    is_active: true,
                },
            )
            .expect("insert company");
        }
        conn
    }

    fn layout(id: i64, company_id: i64, name: &str) -> Layout {
        Layout {
            id,
            layout_name: name.to_string(),
            company_id,
            is_active: true,
            is_shared: false,
        }
    }

    #[test]
    fn layouts_are_scoped_to_their_company() {
        let conn = setup();
        insert(&conn, &layout(1, 1, "Standard")).expect("insert");
        insert(&conn, &layout(2, 2, "Other")).expect("insert");
        insert(&conn, &layout(3, 1, "Detailed")).expect("insert");

        let ids: Vec<i64> = fetch_by_company_id(&conn, 1)
            .expect("fetch layouts")
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn saving_a_layout_replaces_the_previous_choice() {
        let conn = setup();
        let standard = layout(1, 1, "Standard");
        let detailed = layout(2, 1, "Detailed");
        insert(&conn, &standard).expect("insert");
        insert(&conn, &detailed).expect("insert");
        assert!(fetch_company_layout(&conn, 1).expect("fetch").is_none());

        save_company_layout(&conn, 1, &standard).expect("save");
        save_company_layout(&conn, 1, &detailed).expect("save again");

        let saved = fetch_company_layout(&conn, 1).expect("fetch").expect("saved");
        assert_eq!(saved.layout_id, 2);
        assert_eq!(saved.layout_name, "Detailed");
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM company_layouts", [], |row| row.get(0))
            .expect("count");
        assert_eq!(rows, 1);
    }

    #[test]
    fn preference_must_point_at_an_existing_layout() {
        let conn = setup();

        assert!(save_company_layout(&conn, 1, &layout(9, 1, "Missing")).is_err());
    }
}
