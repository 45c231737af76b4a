//! Opening and preparing the local color database

use crate::error::Result;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;

use super::migrations;

/// WAL is refused by `:memory:` databases.
const PRAGMAS: [&str; 2] = ["PRAGMA journal_mode = WAL", "PRAGMA synchronous = NORMAL"];

/// Local libSQL database holding the color table
pub struct Database {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Database {
    /// Open (or create) the color database at `path` and migrate it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Builder::new_local(path).build().await?;
        tracing::debug!("Opened color database at {}", path.display());
        Self::init(db).await
    }

    /// Fresh in-memory database, mostly for tests
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::init(db).await
    }

    async fn init(db: LibSqlDatabase) -> Result<Self> {
        let conn = db.connect()?;
        let database = Self { _db: db, conn };
        database.configure().await;
        migrations::run(&database.conn).await?;
        Ok(database)
    }

    /// Best-effort pragmas; an engine that rejects one keeps its default.
    async fn configure(&self) {
        for pragma in PRAGMAS {
            // Pragmas like journal_mode answer with a row, so go through `query`.
            if let Err(error) = self.conn.query(pragma, ()).await {
                tracing::debug!("Skipped `{pragma}`: {error}");
            }
        }
    }

    /// Connection used by the repositories
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        let mut rows = db.connection().query("SELECT 1", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reopen_keeps_rows() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("colors.db");

        let db = Database::open(&db_path).await.unwrap();
        db.connection()
            .execute(
                "INSERT INTO color_table (colorCode, timestamp) VALUES ('#010203', 5)",
                (),
            )
            .await
            .unwrap();
        drop(db);

        let db = Database::open(&db_path).await.unwrap();
        let mut rows = db
            .connection()
            .query("SELECT colorCode FROM color_table", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "#010203");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_open_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("colors.db");

        let db = Database::open(&db_path).await.unwrap();
        drop(db);

        assert!(db_path.exists());
    }
}
