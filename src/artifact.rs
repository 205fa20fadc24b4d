//! Artifact file helpers.

use crate::error::{GenerationError, Result};
use std::fs;
use std::path::Path;

/// Replace `path` with `contents`, going through a sibling temp file so a
/// failed write never leaves a truncated artifact behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GenerationError::io(parent, e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    fs::write(tmp, contents).map_err(|e| GenerationError::io(tmp, e))?;
    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(GenerationError::io(path, e));
    }

    tracing::debug!("[TDNC] Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))
}
