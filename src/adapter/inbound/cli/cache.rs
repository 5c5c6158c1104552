//! Handler for the `cache` command group.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::cache::{EntryInfo, TimedCache};
use crate::error::Result;

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Stored")]
    stored: String,
    #[tabled(rename = "State")]
    state: String,
}

fn row(entry: &EntryInfo) -> EntryRow {
    EntryRow {
        key: entry.key.clone(),
        stored: entry.stored_at.map_or_else(
            || "-".to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        state: match (entry.stored_at, entry.fresh) {
            (None, _) => output::muted("unreadable"),
            (Some(_), true) => output::positive("fresh"),
            (Some(_), false) => output::negative("stale"),
        },
    }
}

/// Execute `cache list`.
pub fn execute_list(cache: &TimedCache) -> Result<()> {
    let entries = cache.entries()?;

    if output::is_json() {
        let rows: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "key": e.key,
                    "stored_at": e.stored_at.map(|t| t.to_rfc3339()),
                    "fresh": e.fresh,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "cache.list",
            "medium": cache.medium_name(),
            "entries": rows,
        }));
        return Ok(());
    }

    output::section("Cache");
    output::field("Medium", cache.medium_name());
    output::field(
        "Freshness",
        format!("{}s", cache.freshness().num_seconds()),
    );
    if entries.is_empty() {
        output::note("(empty)");
        return Ok(());
    }
    output::lines(&Table::new(entries.iter().map(row)).to_string());
    Ok(())
}

/// Execute `cache clear`.
pub fn execute_clear(cache: &TimedCache) -> Result<()> {
    let removed = cache.clear()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "cache.clear",
            "removed": removed,
        }));
        return Ok(());
    }

    output::success(&format!("Removed {removed} cached entries"));
    Ok(())
}
