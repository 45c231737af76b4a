//! Schema migrations, applied in version order inside one transaction each.

use crate::error::Result;
use libsql::Connection;

/// Statements per schema version. Append new versions, never edit old ones.
const MIGRATIONS: &[(i32, &[&str])] = &[(
    1,
    &[
        "CREATE TABLE IF NOT EXISTS color_table (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            colorCode TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            isSynced INTEGER NOT NULL DEFAULT 0
        )",
        "CREATE INDEX IF NOT EXISTS idx_color_table_synced ON color_table(isSynced)",
    ],
)];

/// Highest version in [`MIGRATIONS`].
pub const CURRENT_VERSION: i32 = 1;

/// Bring the schema up to [`CURRENT_VERSION`].
pub async fn run(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        (),
    )
    .await?;

    let applied = schema_version(conn).await?;
    for &(version, statements) in MIGRATIONS.iter().filter(|(v, _)| *v > applied) {
        apply(conn, version, statements).await?;
        tracing::info!("Migrated color database to version {version}");
    }
    Ok(())
}

async fn schema_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i32>(0)?),
        None => Ok(0),
    }
}

async fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    conn.execute("BEGIN", ()).await?;
    let outcome = async {
        for statement in statements {
            conn.execute(statement, ()).await?;
        }
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            libsql::params![version],
        )
        .await?;
        conn.execute("COMMIT", ()).await?;
        Ok(())
    }
    .await;

    if outcome.is_err() {
        conn.execute("ROLLBACK", ()).await.ok();
    }
    outcome
}
