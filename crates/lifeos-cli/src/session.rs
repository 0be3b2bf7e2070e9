//! Cookie persistence between invocations.
//!
//! The session file is a JSON object of cookie name to value. A missing file
//! is an empty session; an empty session removes the file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use lifeos_core::api::SessionStore;
use tracing::debug;

pub fn load(path: &Path) -> Result<Arc<SessionStore>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Arc::new(SessionStore::new())),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read session file {}", path.display()))
        }
    };
    let cookies: BTreeMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("Session file {} is corrupt; run `lifeos logout`", path.display()))?;
    debug!(path = %path.display(), cookies = cookies.len(), "session loaded");
    Ok(Arc::new(SessionStore::from_snapshot(cookies)))
}

pub fn save(path: &Path, session: &SessionStore) -> Result<()> {
    if session.is_empty() {
        return match fs::remove_file(path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err)
                .with_context(|| format!("Failed to remove session file {}", path.display())),
            _ => Ok(()),
        };
    }
    let raw = serde_json::to_string_pretty(&session.snapshot())?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write session file {}", path.display()))?;
    Ok(())
}
