use std::path::Path;

use colorcodex_core::ColorFilter;

use crate::commands::common::{
    color_to_list_item, format_color_lines, open_store, ColorListItem,
};
use crate::error::CliError;

pub const fn filter_for(unsynced: bool) -> ColorFilter {
    if unsynced {
        ColorFilter::Unsynced
    } else {
        ColorFilter::All
    }
}

pub async fn run_list(unsynced: bool, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let colors = store.list(filter_for(unsynced)).await?;

    if as_json {
        let json_items = colors
            .iter()
            .map(color_to_list_item)
            .collect::<Vec<ColorListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if colors.is_empty() {
        println!("No colors stored.");
    } else {
        for line in format_color_lines(&colors) {
            println!("{line}");
        }
    }

    Ok(())
}
