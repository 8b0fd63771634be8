//! File system utilities.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Replaces `path` with `content` through a temp file in the same directory,
/// so an interrupted write never leaves a truncated file behind.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }

    Ok(())
}
