//! In-process remote store.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{RemoteColor, RemoteError, RemoteKey, RemoteStore};
use crate::models::{ColorId, ColorRecord};

/// Entry appended to a [`MemoryRemoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub collection: String,
    pub key: RemoteKey,
    pub color: RemoteColor,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<MemoryEntry>,
    attempts: Vec<ColorId>,
    failing: HashSet<ColorId>,
    offline: bool,
}

/// Append log kept in memory, with failure injection per color id.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    state: Mutex<MemoryState>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject every push of `id` until [`Self::recover`] is called.
    pub fn fail_for(&self, id: ColorId) {
        self.lock().failing.insert(id);
    }

    /// Stop rejecting pushes of `id`.
    pub fn recover(&self, id: ColorId) {
        self.lock().failing.remove(&id);
    }

    /// Reject every push while offline.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Accepted entries in append order.
    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.lock().entries.clone()
    }

    /// Ids of every push attempt, accepted or not.
    pub fn attempts(&self) -> Vec<ColorId> {
        self.lock().attempts.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RemoteStore for MemoryRemoteStore {
    async fn append(
        &self,
        collection: &str,
        color: &ColorRecord,
    ) -> Result<RemoteKey, RemoteError> {
        let mut state = self.lock();
        state.attempts.push(color.id);

        if state.offline {
            return Err(RemoteError::Unavailable("remote is offline".to_string()));
        }
        if state.failing.contains(&color.id) {
            return Err(RemoteError::Rejected {
                status: 503,
                message: format!("push of color {} rejected", color.id),
            });
        }

        let key = RemoteKey::new(format!("mem-{:06}", state.entries.len() + 1));
        state.entries.push(MemoryEntry {
            collection: collection.to_string(),
            key: key.clone(),
            color: RemoteColor::from(color),
        });
        drop(state);

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(id: i64) -> ColorRecord {
        ColorRecord {
            id: ColorId::new(id),
            color_code: "#A1B2C3".to_string(),
            created_at: 1000,
            synced: false,
        }
    }

    #[tokio::test]
    async fn append_is_not_idempotent() {
        let remote = MemoryRemoteStore::new();
        let first = remote.append("colors", &color(1)).await.unwrap();
        let second = remote.append("colors", &color(1)).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(remote.len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_as_attempts() {
        let remote = MemoryRemoteStore::new();
        remote.fail_for(ColorId::new(2));

        assert!(remote.append("colors", &color(2)).await.is_err());
        assert!(remote.is_empty());
        assert_eq!(remote.attempts(), vec![ColorId::new(2)]);

        remote.recover(ColorId::new(2));
        assert!(remote.append("colors", &color(2)).await.is_ok());
        assert_eq!(remote.entries()[0].collection, "colors");
    }

    #[tokio::test]
    async fn offline_rejects_everything() {
        let remote = MemoryRemoteStore::new();
        remote.set_offline(true);

        let error = remote.append("colors", &color(1)).await.unwrap_err();
        assert!(matches!(error, RemoteError::Unavailable(_)));
    }
}
