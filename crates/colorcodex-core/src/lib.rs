//! colorcodex-core - Core library for ColorCodex
//!
//! This crate contains the color record model, the local libSQL store with
//! live snapshot subscriptions, the remote store abstraction, and the sync
//! coordinator that pushes unsynced records to the cloud.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{ColorId, ColorRecord, NewColor};
pub use state::SyncState;
pub use store::{ColorFilter, ColorStore, ColorSubscription};
pub use sync::{SyncCoordinator, SyncReport};
