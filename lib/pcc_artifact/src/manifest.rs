use crate::artifact::{Fingerprint, GeneratedArtifact, Generator};
use crate::error::{write_error, Error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the manifest file in the destination directory
pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_VERSION: u32 = 1;

/// List of the files generated by a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Relative to the destination directory
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
    pub generator: Generator,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            version: MANIFEST_VERSION,
            entries: vec![],
        }
    }
}

impl Manifest {
    pub fn path(dest: &Path) -> PathBuf {
        dest.join(MANIFEST_FILE)
    }

    /// Load the manifest in `dest`. Returns None if there is none.
    pub fn load(dest: &Path) -> Result<Option<Manifest>, Error> {
        let path = Manifest::path(dest);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Read { path, source }),
        };
        let manifest = serde_json::from_str(&data).map_err(|source| Error::Manifest {
            path: path.clone(),
            source,
        })?;
        Ok(Some(manifest))
    }

    pub fn save(&self, dest: &Path) -> Result<(), Error> {
        let path = Manifest::path(dest);
        fs::create_dir_all(dest).map_err(|e| write_error(dest, e))?;
        let data = serde_json::to_string_pretty(self).map_err(|source| Error::Manifest {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, data + "\n").map_err(|e| write_error(&path, e))
    }

    pub fn push(&mut self, artifact: &GeneratedArtifact) {
        self.entries.retain(|e| e.path != artifact.path);
        self.entries.push(ManifestEntry {
            path: artifact.path.clone(),
            fingerprint: artifact.fingerprint.clone(),
            generator: artifact.generator,
        });
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn get(&self, path: &Path) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.path == path)
    }
}

/// Remove every file listed in the manifest of `dest`, then the manifest
/// itself. Directories left empty are removed too. Returns the removed
/// paths.
pub fn clean(dest: &Path) -> Result<Vec<PathBuf>, Error> {
    let Some(manifest) = Manifest::load(dest)? else {
        log::info!("no manifest in {}; nothing to clean", dest.display());
        return Ok(vec![]);
    };
    let mut removed = vec![];
    for entry in &manifest.entries {
        let path = dest.join(&entry.path);
        if remove_file(&path)? {
            prune_empty_dirs(dest, &path);
            removed.push(path);
        }
    }
    let manifest_path = Manifest::path(dest);
    remove_file(&manifest_path)?;
    log::debug!("removed {} files from {}", removed.len(), dest.display());
    Ok(removed)
}

/// Returns false if the file did not exist
pub(crate) fn remove_file(path: &Path) -> Result<bool, Error> {
    match fs::remove_file(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Remove the empty directories between `path` and `dest`
pub(crate) fn prune_empty_dirs(dest: &Path, path: &Path) {
    let mut dir = path.parent();
    while let Some(d) = dir {
        if d == dest || !d.starts_with(dest) {
            break;
        }
        // Fails if not empty
        if fs::remove_dir(d).is_err() {
            break;
        }
        dir = d.parent();
    }
}
