//! Shared color store with live snapshot subscriptions.
//!
//! Every mutation that changes at least one row bumps a change counter on a
//! `watch` channel. Subscribers re-run their query when the counter moves, so
//! several quick mutations may collapse into a single snapshot.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::{ColorRepository, Database, LibSqlColorRepository};
use crate::models::{ColorId, ColorRecord, NewColor};
use crate::Result;

/// Which colors a query or subscription covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFilter {
    All,
    Unsynced,
}

/// Thread-safe handle to the local color store.
///
/// Open once at startup and clone the handle into every consumer.
#[derive(Clone)]
pub struct ColorStore {
    db: Arc<Mutex<Database>>,
    changes: Arc<watch::Sender<u64>>,
}

impl ColorStore {
    /// Open a store backed by a database file.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_database(Database::open(db_path).await?))
    }

    /// Open an in-memory store (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory().await?))
    }

    pub fn from_database(db: Database) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(changes),
        }
    }

    fn notify_changed(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Insert a color. Returns `None` without error when the id already exists.
    pub async fn insert(&self, color: &NewColor) -> Result<Option<ColorId>> {
        let inserted = {
            let db = self.db.lock().await;
            LibSqlColorRepository::new(db.connection())
                .insert(color)
                .await?
        };

        match inserted {
            Some(id) => {
                tracing::debug!("Inserted color {} as {id}", color.color_code);
                self.notify_changed();
            }
            None => tracing::debug!("Ignored duplicate color insert {:?}", color.id),
        }
        Ok(inserted)
    }

    /// Fetch a color by id.
    pub async fn get(&self, id: ColorId) -> Result<Option<ColorRecord>> {
        let db = self.db.lock().await;
        LibSqlColorRepository::new(db.connection()).get(id).await
    }

    /// One-shot read of every color.
    pub async fn list_all(&self) -> Result<Vec<ColorRecord>> {
        self.list(ColorFilter::All).await
    }

    /// One-shot read of colors not yet confirmed by the remote store.
    pub async fn list_unsynced(&self) -> Result<Vec<ColorRecord>> {
        self.list(ColorFilter::Unsynced).await
    }

    /// One-shot read for the given filter.
    pub async fn list(&self, filter: ColorFilter) -> Result<Vec<ColorRecord>> {
        query(&self.db, filter).await
    }

    /// Flag a color as synced. Returns 0 when the id is missing or already synced.
    pub async fn mark_synced(&self, id: ColorId) -> Result<u64> {
        let rows = {
            let db = self.db.lock().await;
            LibSqlColorRepository::new(db.connection())
                .mark_synced(id)
                .await?
        };

        if rows > 0 {
            self.notify_changed();
        }
        Ok(rows)
    }

    /// Count stored colors.
    pub async fn count(&self) -> Result<u64> {
        let db = self.db.lock().await;
        LibSqlColorRepository::new(db.connection()).count().await
    }

    /// Run a raw statement, for tests that need to break the table.
    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<u64> {
        let db = self.db.lock().await;
        Ok(db.connection().execute(sql, ()).await?)
    }

    /// Subscribe to live snapshots of every color.
    pub fn watch_all(&self) -> ColorSubscription {
        self.subscribe(ColorFilter::All)
    }

    /// Subscribe to live snapshots of unsynced colors.
    pub fn watch_unsynced(&self) -> ColorSubscription {
        self.subscribe(ColorFilter::Unsynced)
    }

    /// Subscribe to live snapshots for the given filter.
    pub fn subscribe(&self, filter: ColorFilter) -> ColorSubscription {
        ColorSubscription {
            db: Arc::clone(&self.db),
            changes: self.changes.subscribe(),
            filter,
            pending: true,
        }
    }
}

async fn query(db: &Mutex<Database>, filter: ColorFilter) -> Result<Vec<ColorRecord>> {
    let db = db.lock().await;
    let repo = LibSqlColorRepository::new(db.connection());
    match filter {
        ColorFilter::All => repo.list_all().await,
        ColorFilter::Unsynced => repo.list_unsynced().await,
    }
}

/// Live query over the color table.
///
/// The first call to [`ColorSubscription::next`] yields the current snapshot
/// right away; later calls wait for the next change. Ends once every
/// [`ColorStore`] handle is dropped.
///
/// `next` is cancel safe: a snapshot interrupted mid-query is re-read on the
/// following call.
pub struct ColorSubscription {
    db: Arc<Mutex<Database>>,
    changes: watch::Receiver<u64>,
    filter: ColorFilter,
    pending: bool,
}

impl ColorSubscription {
    pub const fn filter(&self) -> ColorFilter {
        self.filter
    }

    /// Wait for the next snapshot.
    pub async fn next(&mut self) -> Option<Result<Vec<ColorRecord>>> {
        if !self.pending {
            self.changes.changed().await.ok()?;
            self.pending = true;
        }
        // Mark seen before querying so a change landing mid-query wakes us again.
        drop(self.changes.borrow_and_update());
        let snapshot = query(&self.db, self.filter).await;
        self.pending = false;
        Some(snapshot)
    }
}
