use std::{fs, path::Path};

use dinematch_common::error::Result;
use tracing::info;

use crate::config::Config;

/// Writes a default config to `path` unless one already exists.
/// Returns `true` when a new file was written.
pub fn ensure_config<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }

    info!("⚠️ Config not found. Writing defaults to {}...", path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Config::default().save_to_file(path)?;
    info!("✅ Config written. Set places_api_key or {} before creating sessions.", crate::config::API_KEY_ENV);
    Ok(true)
}
