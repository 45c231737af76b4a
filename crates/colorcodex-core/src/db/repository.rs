//! Color repository implementation

use crate::error::{Error, Result};
use crate::models::{is_valid_color_code, ColorId, ColorRecord, NewColor};
use libsql::{params, Connection};

const SELECT_COLUMNS: &str = "SELECT id, colorCode, timestamp, isSynced FROM color_table";

/// Trait for color storage operations (async)
#[allow(async_fn_in_trait)]
pub trait ColorRepository {
    /// Insert a color, returning its id, or `None` when the key already exists
    async fn insert(&self, color: &NewColor) -> Result<Option<ColorId>>;

    /// Get a color by id
    async fn get(&self, id: ColorId) -> Result<Option<ColorRecord>>;

    /// List every stored color
    async fn list_all(&self) -> Result<Vec<ColorRecord>>;

    /// List colors not yet confirmed by the remote store
    async fn list_unsynced(&self) -> Result<Vec<ColorRecord>>;

    /// Flag a color as synced, returning the number of rows changed (0 or 1)
    async fn mark_synced(&self, id: ColorId) -> Result<u64>;

    /// Count stored colors
    async fn count(&self) -> Result<u64>;
}

/// libSQL implementation of `ColorRepository`
pub struct LibSqlColorRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlColorRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a color from a database row
    fn parse_color(row: &libsql::Row) -> Result<ColorRecord> {
        Ok(ColorRecord {
            id: ColorId::new(row.get(0)?),
            color_code: row.get(1)?,
            created_at: row.get(2)?,
            synced: row.get::<i64>(3)? != 0,
        })
    }

    async fn query_colors(&self, sql: &str) -> Result<Vec<ColorRecord>> {
        let mut rows = self.conn.query(sql, ()).await?;
        let mut colors = Vec::new();
        while let Some(row) = rows.next().await? {
            colors.push(Self::parse_color(&row)?);
        }
        Ok(colors)
    }
}

impl ColorRepository for LibSqlColorRepository<'_> {
    async fn insert(&self, color: &NewColor) -> Result<Option<ColorId>> {
        if !is_valid_color_code(&color.color_code) {
            return Err(Error::InvalidInput(format!(
                "color code must look like #RRGGBB, got {:?}",
                color.color_code
            )));
        }

        let rows = match color.id {
            Some(id) => {
                self.conn
                    .execute(
                        "INSERT OR IGNORE INTO color_table (id, colorCode, timestamp, isSynced)
                         VALUES (?, ?, ?, 0)",
                        params![id.get(), color.color_code.as_str(), color.created_at],
                    )
                    .await?
            }
            None => {
                self.conn
                    .execute(
                        "INSERT OR IGNORE INTO color_table (colorCode, timestamp, isSynced)
                         VALUES (?, ?, 0)",
                        params![color.color_code.as_str(), color.created_at],
                    )
                    .await?
            }
        };

        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(ColorId::new(self.conn.last_insert_rowid())))
    }

    async fn get(&self, id: ColorId) -> Result<Option<ColorRecord>> {
        let mut rows = self
            .conn
            .query(&format!("{SELECT_COLUMNS} WHERE id = ?"), params![id.get()])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_color(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<ColorRecord>> {
        self.query_colors(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
            .await
    }

    async fn list_unsynced(&self) -> Result<Vec<ColorRecord>> {
        self.query_colors(&format!(
            "{SELECT_COLUMNS} WHERE isSynced = 0 ORDER BY id ASC"
        ))
        .await
    }

    async fn mark_synced(&self, id: ColorId) -> Result<u64> {
        let rows = self
            .conn
            .execute(
                "UPDATE color_table SET isSynced = 1 WHERE id = ? AND isSynced = 0",
                params![id.get()],
            )
            .await?;
        Ok(rows)
    }

    async fn count(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM color_table", ())
            .await?;
        let count = match rows.next().await? {
            Some(row) => row.get::<i64>(0)?,
            None => 0,
        };
        u64::try_from(count)
            .map_err(|_| Error::Database(format!("negative row count {count}")))
    }
}
