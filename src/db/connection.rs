use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::error::{Result, SqlContext, StoreError};

/// Open the database file, creating its parent directory first. This is the
/// only place a connection gets opened; startup calls it once and hands the
/// connection to everything else by reference.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| {
            error!(path = %parent.display(), error = %source, "failed to create data directory");
            StoreError::Io {
                path: parent.to_path_buf(),
                source,
            }
        })?;
    }

    let conn = Connection::open(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "failed to open database");
        StoreError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(path = %path.display(), "database opened");
    Ok(conn)
}

/// Switch to write-ahead logging and turn on foreign key enforcement. Both are
/// safe to repeat on every startup. Must run outside of a transaction since
/// SQLite ignores journal mode changes inside one.
///
/// SQLite keeps its previous journal mode when WAL is unavailable (in-memory
/// databases, some VFS layers); that is logged and startup carries on.
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    let mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(|source| StoreError::Pragma {
            pragma: "journal_mode",
            source,
        })?;
    if !mode.eq_ignore_ascii_case("wal") {
        warn!(
            journal_mode = %mode,
            "write-ahead logging unavailable, keeping current journal mode"
        );
    }

    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(|source| StoreError::Pragma {
            pragma: "foreign_keys",
            source,
        })?;
    Ok(())
}

/// Current journal mode as reported by SQLite, lower-cased.
pub fn journal_mode(conn: &Connection) -> Result<String> {
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .context("failed to read journal mode")?;
    Ok(mode.to_ascii_lowercase())
}

pub fn foreign_keys_enabled(conn: &Connection) -> Result<bool> {
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .context("failed to read foreign key setting")?;
    Ok(enabled == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_database_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("data").join("test.db");

        let conn = open_database(&path).expect("open database");
        drop(conn);

        assert!(path.exists());
    }

    #[test]
    fn pragmas_enable_wal_and_foreign_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let conn = open_database(&dir.path().join("test.db")).expect("open database");

        apply_pragmas(&conn).expect("apply pragmas");
        apply_pragmas(&conn).expect("apply pragmas twice");

        assert_eq!(journal_mode(&conn).expect("journal mode"), "wal");
        assert!(foreign_keys_enabled(&conn).expect("foreign keys"));
    }

    #[test]
    fn in_memory_databases_keep_their_journal_mode() {
        let conn = Connection::open_in_memory().expect("open in-memory db");

        apply_pragmas(&conn).expect("pragmas still apply");

        assert_eq!(journal_mode(&conn).expect("journal mode"), "memory");
        assert!(foreign_keys_enabled(&conn).expect("foreign keys"));
    }

    #[test]
    fn unusable_data_directory_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").expect("write blocker file");

        let err = open_database(&blocker.join("test.db")).expect_err("parent is a file");
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
