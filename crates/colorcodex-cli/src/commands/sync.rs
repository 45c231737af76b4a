use std::path::Path;
use std::sync::Arc;

use colorcodex_core::config::RemoteConfig;
use colorcodex_core::remote::HttpRemoteStore;
use colorcodex_core::{ColorStore, SyncCoordinator};

use crate::commands::common::{format_sync_report_lines, open_store};
use crate::error::CliError;

pub fn remote_coordinator(
    store: &ColorStore,
) -> Result<SyncCoordinator<HttpRemoteStore>, CliError> {
    let config = RemoteConfig::from_env()?.ok_or(CliError::SyncNotConfigured)?;
    tracing::debug!("Remote configured: {config:?}");

    let collection = config.collection.clone();
    let remote = HttpRemoteStore::new(config)?;
    Ok(SyncCoordinator::new(store.clone(), Arc::new(remote)).with_collection(&collection)?)
}

pub async fn run_sync(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let coordinator = remote_coordinator(&store)?;

    let report = coordinator.sync_pending().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_sync_report_lines(&report) {
            println!("{line}");
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::SyncIncomplete(report.failed(), report.attempted))
    }
}
