//! Customer estimates shown on the home dashboard, plus the edit, duplicate
//! and delete actions of the estimate detail view.

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::db::schema::{ensure_table, TableSpec, TableStatus};
use crate::error::{Result, SqlContext, StoreError};
use crate::models::{Estimate, EstimateStatus};

pub const TABLE: TableSpec = TableSpec {
    name: "estimates",
    columns: "id INTEGER PRIMARY KEY,
            company_id INTEGER NOT NULL,
            quote_number TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            project_address TEXT NOT NULL DEFAULT '',
            quote_date TEXT NOT NULL,
            total_cents INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'provided',
            introduction TEXT NOT NULL DEFAULT '',
            created_date TEXT NOT NULL,
            modified_date TEXT NOT NULL,
            FOREIGN KEY(company_id) REFERENCES companies(id)",
};

const SELECT_COLUMNS: &str = "SELECT id, company_id, quote_number, customer_name, project_address,
        quote_date, total_cents, status, introduction, created_date, modified_date
     FROM estimates";

pub fn create_table(conn: &Connection) -> Result<TableStatus> {
    ensure_table(conn, &TABLE)
}

pub fn insert(conn: &Connection, estimate: &Estimate) -> Result<()> {
    conn.execute(
        "INSERT INTO estimates (
            id, company_id, quote_number, customer_name, project_address, quote_date,
            total_cents, status, introduction, created_date, modified_date
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            estimate.id,
            estimate.company_id,
            estimate.quote_number,
            estimate.customer_name,
            estimate.project_address,
            estimate.quote_date,
            estimate.total_cents,
            estimate.status.as_str(),
            estimate.introduction,
            estimate.created_date,
            estimate.modified_date,
        ],
    )
    .context("failed to insert estimate")?;
    Ok(())
}

pub fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<Estimate>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [id],
        estimate_from_row,
    )
    .optional()
    .context("failed to load estimate")
}

/// Newest quotes first, the order the dashboard lists them in.
pub fn fetch_by_company_id(conn: &Connection, company_id: i64) -> Result<Vec<Estimate>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ?1 ORDER BY quote_date DESC, id DESC"
        ))
        .context("failed to prepare estimate query")?;

    let estimates = stmt
        .query_map([company_id], estimate_from_row)
        .context("failed to load estimates")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect estimates")?;

    Ok(estimates)
}

pub fn update_status(conn: &Connection, id: i64, status: EstimateStatus) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE estimates SET status = ?1, modified_date = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), id],
        )
        .context("failed to update estimate status")?;

    if updated == 0 {
        return Err(StoreError::NotFound("estimate"));
    }
    info!(estimate_id = id, status = status.as_str(), "estimate status changed");
    Ok(())
}

/// Replace the introduction letter template of an estimate.
pub fn update_introduction(conn: &Connection, id: i64, introduction: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE estimates SET introduction = ?1, modified_date = ?2 WHERE id = ?3",
            params![introduction, Utc::now().to_rfc3339(), id],
        )
        .context("failed to update estimate introduction")?;

    if updated == 0 {
        return Err(StoreError::NotFound("estimate"));
    }
    Ok(())
}

/// Copy an estimate under a fresh id and quote number. The copy starts over
/// as `provided`; everything else is carried across.
pub fn duplicate(conn: &Connection, id: i64) -> Result<Estimate> {
    let source = fetch_by_id(conn, id)?.ok_or(StoreError::NotFound("estimate"))?;

    let next_id: i64 = conn
        .query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM estimates", [], |row| {
            row.get(0)
        })
        .context("failed to allocate estimate id")?;
    let now = Utc::now().to_rfc3339();

    let copy = Estimate {
        id: next_id,
        quote_number: quote_number_for(next_id),
        status: EstimateStatus::Provided,
        created_date: now.clone(),
        modified_date: now,
        ..source
    };
    insert(conn, &copy)?;

    info!(source_id = id, estimate_id = copy.id, "estimate duplicated");
    Ok(copy)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM estimates WHERE id = ?1", params![id])
        .context("failed to delete estimate")?;

    if deleted == 0 {
        return Err(StoreError::NotFound("estimate"));
    }
    info!(estimate_id = id, "estimate deleted");
    Ok(())
}

/// `Q-0001` style quote numbers derived from the row id.
pub fn quote_number_for(id: i64) -> String {
    format!("Q-{id:04}")
}

fn estimate_from_row(row: &Row<'_>) -> rusqlite::Result<Estimate> {
    let status: String = row.get(7)?;
    let status = status.parse::<EstimateStatus>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(err))
    })?;

    Ok(Estimate {
        id: row.get(0)?,
        company_id: row.get(1)?,
        quote_number: row.get(2)?,
        customer_name: row.get(3)?,
        project_address: row.get(4)?,
        quote_date: row.get(5)?,
        total_cents: row.get(6)?,
        status,
        introduction: row.get(8)?,
        created_date: row.get(9)?,
        modified_date: row.get(10)?,
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
        create_table(&conn).expect("create estimates");
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

    fn estimate(id: i64, company_id: i64, quote_date: &str) -> Estimate {
        Estimate {
            id,
            company_id,
            quote_number: quote_number_for(id),
            customer_name: format!("Customer {id}"),
            project_address: "1 Test Street".to_string(),
            quote_date: quote_date.to_string(),
            total_cents: 10_000,
            status: EstimateStatus::Requested,
            introduction: "Dear {{CUSTOMER_NAME}},".to_string(),
            created_date: "2024-01-01T00:00:00+00:00".to_string(),
            modified_date: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn company_estimates_are_listed_newest_first() {
        let conn = setup();
        insert(&conn, &estimate(1, 1, "2024-03-01")).expect("insert");
        insert(&conn, &estimate(2, 2, "2024-03-02")).expect("insert");
        insert(&conn, &estimate(3, 1, "2024-03-05")).expect("insert");

        let ids: Vec<i64> = fetch_by_company_id(&conn, 1)
            .expect("fetch estimates")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn status_changes_are_persisted() {
        let conn = setup();
        insert(&conn, &estimate(1, 1, "2024-03-01")).expect("insert");

        update_status(&conn, 1, EstimateStatus::Accepted).expect("update status");

        let stored = fetch_by_id(&conn, 1).expect("fetch").expect("estimate");
        assert_eq!(stored.status, EstimateStatus::Accepted);
        assert_ne!(stored.modified_date, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn updates_on_missing_estimates_report_not_found() {
        let conn = setup();

        let err = update_status(&conn, 7, EstimateStatus::Accepted).expect_err("missing");
        assert!(matches!(err, StoreError::NotFound("estimate")));
        assert!(matches!(
            update_introduction(&conn, 7, "text"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(delete(&conn, 7), Err(StoreError::NotFound(_))));
        assert!(matches!(duplicate(&conn, 7), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn duplicate_gets_a_new_number_and_starts_as_provided() {
        let conn = setup();
        insert(&conn, &estimate(1, 1, "2024-03-01")).expect("insert");
        insert(&conn, &estimate(4, 1, "2024-03-02")).expect("insert");

        let copy = duplicate(&conn, 1).expect("duplicate");

        assert_eq!(copy.id, 5);
        assert_eq!(copy.quote_number, "Q-0005");
        assert_eq!(copy.status, EstimateStatus::Provided);
        assert_eq!(copy.customer_name, "Customer 1");
        assert_eq!(copy.introduction, "Dear {{CUSTOMER_NAME}},");
        assert_eq!(fetch_by_id(&conn, 5).expect("fetch"), Some(copy));
    }

    #[test]
    fn introduction_edits_and_deletes_hit_one_row() {
        let conn = setup();
        insert(&conn, &estimate(1, 1, "2024-03-01")).expect("insert");
        insert(&conn, &estimate(2, 1, "2024-03-02")).expect("insert");

        update_introduction(&conn, 1, "Hello {{CUSTOMER_NAME}}").expect("edit");
        delete(&conn, 2).expect("delete");

        let remaining = fetch_by_company_id(&conn, 1).expect("fetch");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].introduction, "Hello {{CUSTOMER_NAME}}");
    }

    #[test]
    fn unknown_status_text_fails_to_load() {
        let conn = setup();
        insert(&conn, &estimate(1, 1, "2024-03-01")).expect("insert");
        conn.execute("UPDATE estimates SET status = 'lost' WHERE id = 1", [])
            .expect("corrupt status");

        assert!(fetch_by_id(&conn, 1).is_err());
    }

    #[test]
    fn estimates_need_an_existing_company() {
        let conn = setup();

        assert!(insert(&conn, &estimate(1, 99, "2024-03-01")).is_err());
    }
}
