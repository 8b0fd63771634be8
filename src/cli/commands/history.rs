//! Saved conversation listing and removal.

use anyhow::{Context, Result};
use chrono::Local;

use crate::config::ConfigManager;
use crate::history::{DEFAULT_HISTORY_KEY, SqliteStore, TranscriptStore};
use crate::ui::Style;

/// Prints the saved conversation, or deletes it when `clear` is set.
///
/// Needs no provider: only the history key is read from the config file.
pub fn run_history(clear: bool) -> Result<()> {
    let config = ConfigManager::new().load_or_default()?;
    let key = config
        .assistant
        .history_key
        .as_deref()
        .unwrap_or(DEFAULT_HISTORY_KEY);

    let store = SqliteStore::new().context("Failed to open the history database")?;

    if clear {
        store.clear(key)?;
        println!("{} Conversation '{key}' cleared", Style::success("✓"));
        return Ok(());
    }

    let messages = store.load(key)?;
    if messages.is_empty() {
        println!("No saved conversation.");
        return Ok(());
    }

    for message in &messages {
        println!(
            "{} {}  {}",
            Style::secondary(
                message
                    .created_at()
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
            ),
            Style::role(message.role()),
            message.text()
        );
    }
    println!();
    println!(
        "{}",
        Style::hint(format!(
            "{} messages in {}",
            messages.len(),
            store.db_path().display()
        ))
    );
    Ok(())
}
