//! Config persistence: write a store's text back to its file.
//!
//! The text buffer, not the index, is what gets written, so untouched
//! comments and formatting survive. Parent directories are created as needed.
//! On unix the file is owner read/write only and new directories are owner only.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::GitcfgError;

/// Write `content` to `path`, creating parent directories first.
pub fn write_config(path: &Path, content: &str) -> Result<(), GitcfgError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dirs(parent).map_err(|e| GitcfgError::io(parent, e))?;
    }

    let mut file = open_for_write(path).map_err(|e| GitcfgError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| GitcfgError::io(path, e))?;

    tracing::debug!("wrote config to {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn create_dirs(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_dirs(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_for_write(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
