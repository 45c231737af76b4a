//! Push unsynced colors to the remote store.
//!
//! A pass reads one snapshot of the unsynced set, pushes every record on its
//! own task, and flags each record synced once the remote accepts it. Delivery
//! is at-least-once: a record the remote accepted but that could not be flagged
//! locally is pushed again by the next pass.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::config::{normalize_collection, DEFAULT_COLLECTION};
use crate::models::{ColorId, ColorRecord};
use crate::remote::{RemoteKey, RemoteStore};
use crate::state::SyncState;
use crate::store::ColorStore;
use crate::Result;

/// A record a pass could not settle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub id: ColorId,
    pub color_code: String,
    pub message: String,
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Records in the snapshot, i.e. pushes dispatched
    pub attempted: usize,
    /// Accepted remotely and flagged synced locally
    pub synced: Vec<ColorId>,
    /// Accepted remotely, but another writer had already flagged the record
    pub already_synced: Vec<ColorId>,
    /// Push failed or was rejected; record stays unsynced
    pub remote_failures: Vec<SyncFailure>,
    /// Accepted remotely but the local flag update failed; the next pass pushes a duplicate
    pub local_failures: Vec<SyncFailure>,
    /// Push tasks that died before reporting
    pub aborted: usize,
}

impl SyncReport {
    /// Records that are still unsynced after this pass.
    pub fn failed(&self) -> usize {
        self.remote_failures.len() + self.local_failures.len() + self.aborted
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn record(&mut self, outcome: PushOutcome) {
        match outcome {
            PushOutcome::Synced(id) => self.synced.push(id),
            PushOutcome::AlreadySynced(id) => self.already_synced.push(id),
            PushOutcome::RemoteFailed(failure) => self.remote_failures.push(failure),
            PushOutcome::LocalFailed(failure) => self.local_failures.push(failure),
        }
    }

    fn sort(&mut self) {
        self.synced.sort_unstable();
        self.already_synced.sort_unstable();
        self.remote_failures.sort_by_key(|failure| failure.id);
        self.local_failures.sort_by_key(|failure| failure.id);
    }
}

enum PushOutcome {
    Synced(ColorId),
    AlreadySynced(ColorId),
    RemoteFailed(SyncFailure),
    LocalFailed(SyncFailure),
}

/// On-demand reconciliation of local colors with a remote store.
pub struct SyncCoordinator<R> {
    store: ColorStore,
    remote: Arc<R>,
    collection: String,
    state: Arc<watch::Sender<SyncState>>,
}

impl<R> Clone for SyncCoordinator<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            remote: Arc::clone(&self.remote),
            collection: self.collection.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: RemoteStore> SyncCoordinator<R> {
    pub fn new(store: ColorStore, remote: Arc<R>) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            store,
            remote,
            collection: DEFAULT_COLLECTION.to_string(),
            state: Arc::new(state),
        }
    }

    /// Push into a different collection.
    pub fn with_collection(mut self, collection: &str) -> Result<Self> {
        self.collection = normalize_collection(collection)?;
        Ok(self)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Watch the phase of the current or most recent pass.
    pub fn state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Run one pass on the runtime and hand back its handle.
    pub fn spawn_sync(&self) -> JoinHandle<Result<SyncReport>> {
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.sync_pending().await })
    }

    /// Push every currently unsynced color once.
    ///
    /// Only a failure to read the unsynced snapshot fails the whole pass;
    /// per-record failures are collected in the report.
    pub async fn sync_pending(&self) -> Result<SyncReport> {
        self.state.send_replace(SyncState::Syncing);

        let snapshot = match self.store.list_unsynced().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!("Failed to read unsynced colors: {error}");
                self.state.send_replace(SyncState::Error);
                return Err(error);
            }
        };

        if snapshot.is_empty() {
            tracing::debug!("No unsynced colors found");
            self.state.send_replace(SyncState::Synced);
            return Ok(SyncReport::default());
        }

        tracing::debug!(
            "Pushing {} unsynced colors to {}",
            snapshot.len(),
            self.collection
        );

        let mut report = SyncReport {
            attempted: snapshot.len(),
            ..SyncReport::default()
        };

        let mut tasks = JoinSet::new();
        for color in snapshot {
            let store = self.store.clone();
            let remote = Arc::clone(&self.remote);
            let collection = self.collection.clone();
            tasks.spawn(async move { push_one(&store, remote.as_ref(), &collection, color).await });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(error) => {
                    tracing::warn!("Sync task ended abnormally: {error}");
                    report.aborted += 1;
                }
            }
        }
        report.sort();

        tracing::info!(
            "Sync pass finished: {} of {} synced, {} failed",
            report.synced.len() + report.already_synced.len(),
            report.attempted,
            report.failed()
        );
        self.state.send_replace(if report.is_clean() {
            SyncState::Synced
        } else {
            SyncState::Error
        });

        Ok(report)
    }
}

async fn push_one<R: RemoteStore>(
    store: &ColorStore,
    remote: &R,
    collection: &str,
    color: ColorRecord,
) -> PushOutcome {
    let key: RemoteKey = match remote.append(collection, &color).await {
        Ok(key) => key,
        Err(error) => {
            tracing::warn!("Failed to push color {} ({}): {error}", color.id, color.color_code);
            return PushOutcome::RemoteFailed(SyncFailure {
                id: color.id,
                color_code: color.color_code,
                message: error.to_string(),
            });
        }
    };

    match store.mark_synced(color.id).await {
        Ok(0) => {
            tracing::debug!("Color {} was already flagged synced", color.id);
            PushOutcome::AlreadySynced(color.id)
        }
        Ok(_) => {
            tracing::debug!("Pushed color {} as {key}", color.id);
            PushOutcome::Synced(color.id)
        }
        Err(error) => {
            tracing::warn!(
                "Color {} pushed as {key} but could not be flagged synced: {error}",
                color.id
            );
            PushOutcome::LocalFailed(SyncFailure {
                id: color.id,
                color_code: color.color_code,
                message: error.to_string(),
            })
        }
    }
}
