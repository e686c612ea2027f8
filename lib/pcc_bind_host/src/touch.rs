use pcc_artifact::{touch, Error};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Set the modification time of every file under `dirs` whose text
/// mentions one of `symbols`. Returns the touched files.
pub fn touch_dependents<P: AsRef<Path>>(dirs: &[P], symbols: &[&str]) -> Result<Vec<PathBuf>, Error> {
    let mut touched = vec![];
    if symbols.is_empty() {
        return Ok(touched);
    }
    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            log::warn!("extension source directory {} does not exist", dir.display());
            continue;
        }
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Read {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            // Non-text files cannot refer to the glue
            let Ok(text) = fs::read_to_string(path) else {
                continue;
            };
            if symbols.iter().any(|s| text.contains(s)) {
                touch(path)?;
                touched.push(path.to_path_buf());
            }
        }
    }
    if !touched.is_empty() {
        log::info!("touched {} extension sources", touched.len());
    }
    Ok(touched)
}
