use std::path::Path;

use colorcodex_core::util::unix_millis_now;
use colorcodex_core::{ColorId, NewColor};

use crate::commands::common::{normalize_color_code, open_store};
use crate::error::CliError;

pub async fn run_add(
    code: Option<&str>,
    timestamp: Option<i64>,
    id: Option<i64>,
    db_path: &Path,
) -> Result<(), CliError> {
    let mut color = match code {
        Some(code) => NewColor::new(normalize_color_code(code)?, unix_millis_now()),
        None => NewColor::random(),
    };
    if let Some(timestamp) = timestamp {
        color.created_at = timestamp;
    }
    if let Some(id) = id {
        color = color.with_id(ColorId::new(id));
    }

    let store = open_store(db_path).await?;
    match store.insert(&color).await? {
        Some(id) => println!("{id} {}", color.color_code),
        None => eprintln!("Color id already stored; nothing inserted"),
    }
    Ok(())
}
