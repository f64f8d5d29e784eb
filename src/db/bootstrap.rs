//! Startup bootstrap: open the database, apply pragmas, create every table and
//! seed demo data the first time, all inside one transaction.

use rusqlite::{Connection, Transaction};
use tracing::{error, info, warn};

use crate::config::StoreConfig;
use crate::db::connection::{apply_pragmas, open_database};
use crate::db::schema::TableStatus;
use crate::db::seed::{insert_seed, SeedData};
use crate::db::{companies, estimates, layouts, roles, user_details, users};
use crate::error::{BootstrapStage, Result, SqlContext};

/// Summary of what a bootstrap run changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Tables that did not exist before this run.
    pub created_tables: Vec<&'static str>,
    /// Number of seed rows inserted, `None` when seeding was skipped.
    pub seeded_rows: Option<usize>,
}

impl BootstrapReport {
    pub fn seeded(&self) -> bool {
        self.seeded_rows.is_some()
    }
}

/// True when the schema has never been created, judged by the absence of the
/// `user_details` table. A failing catalog lookup also counts as empty.
pub fn is_database_empty(conn: &Connection) -> bool {
    let lookup = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [user_details::TABLE.name],
        |row| row.get::<_, i64>(0),
    );

    match lookup {
        Ok(count) => count == 0,
        Err(err) => {
            warn!(error = %err, "catalog lookup failed, assuming a fresh database");
            true
        }
    }
}

/// Create every table in dependency order and report which ones were new.
pub fn create_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let steps: [(&'static str, fn(&Connection) -> Result<TableStatus>); 7] = [
        (companies::TABLE.name, companies::create_table),
        (roles::TABLE.name, roles::create_table),
        (user_details::TABLE.name, user_details::create_table),
        (users::TABLE.name, users::create_table),
        (layouts::TABLE.name, layouts::create_table),
        (layouts::PREFERENCE_TABLE.name, layouts::create_preference_table),
        (estimates::TABLE.name, estimates::create_table),
    ];

    let mut created = Vec::new();
    for (name, create) in steps {
        if create(conn)? == TableStatus::Created {
            created.push(name);
        }
    }
    Ok(created)
}

/// Open the configured database file and bootstrap it with the demo seed.
/// The returned connection is the one handle the rest of the application
/// should use.
pub fn initialize_database(config: &StoreConfig) -> Result<Connection> {
    let mut conn = open_database(&config.db_path)?;
    initialize_connection(&mut conn, &SeedData::demo())?;
    Ok(conn)
}

/// Run the bootstrap on an already open connection. Either every table exists
/// afterwards (and, for a fresh database, every seed row), or nothing from
/// this run is committed and the error is returned.
pub fn initialize_connection(
    conn: &mut Connection,
    seed: &SeedData,
) -> Result<BootstrapReport> {
    apply_pragmas(conn).inspect_err(|err| {
        error!(error = %err, "failed to apply startup pragmas");
    })?;

    let should_seed = is_database_empty(conn);

    let tx = conn
        .transaction()
        .context("failed to begin bootstrap transaction")
        .map_err(|err| err.at_stage(BootstrapStage::BeginTransaction))?;

    match populate(&tx, seed, should_seed) {
        Ok(report) => {
            tx.commit()
                .context("failed to commit bootstrap transaction")
                .map_err(|err| err.at_stage(BootstrapStage::Commit))
                .inspect_err(|err| error!(error = %err, "database bootstrap failed"))?;
            info!(
                created_tables = report.created_tables.len(),
                seeded = report.seeded(),
                "database initialized"
            );
            Ok(report)
        }
        Err(err) => {
            error!(error = %err, stage = ?err.stage(), "database bootstrap failed, rolling back");
            if let Err(rollback_err) = tx.rollback() {
                error!(error = %rollback_err, "rollback of bootstrap transaction failed");
            }
            Err(err)
        }
    }
}

fn populate(tx: &Transaction<'_>, seed: &SeedData, should_seed: bool) -> Result<BootstrapReport> {
    let created_tables =
        create_tables(tx).map_err(|err| err.at_stage(BootstrapStage::CreateTables))?;

    let seeded_rows = if should_seed {
        info!("initializing database with sample data");
        let rows =
            insert_seed(tx, seed).map_err(|err| err.at_stage(BootstrapStage::InsertSeed))?;
        Some(rows)
    } else {
        info!("database already contains data, skipping sample data");
        None
    };

    Ok(BootstrapReport {
        created_tables,
        seeded_rows,
    })
}
