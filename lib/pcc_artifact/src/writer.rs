use crate::artifact::{Fingerprint, GeneratedArtifact};
use crate::error::{write_error, Error};
use crate::manifest::{prune_empty_dirs, remove_file, Manifest};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Summary of a run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// Files of the previous run which are not generated anymore
    pub removed: Vec<PathBuf>,
}

/// Writes artifacts into a destination directory, skipping the ones whose
/// content did not change, and keeps the manifest.
#[derive(Debug)]
pub struct ArtifactWriter {
    dest: PathBuf,
    previous: Manifest,
    current: Manifest,
    report: WriteReport,
}

impl ArtifactWriter {
    pub fn new(dest: impl Into<PathBuf>) -> Result<ArtifactWriter, Error> {
        let dest = dest.into();
        let previous = match Manifest::load(&dest) {
            Ok(Some(m)) => m,
            Ok(None) => Manifest::default(),
            Err(e @ Error::Manifest { .. }) => {
                log::warn!("{}; regenerating everything", e);
                Manifest::default()
            }
            Err(e) => return Err(e),
        };
        Ok(ArtifactWriter {
            dest,
            previous,
            current: Manifest::default(),
            report: WriteReport::default(),
        })
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Write an artifact unless the file already has the same content
    pub fn write(&mut self, artifact: &GeneratedArtifact) -> Result<WriteStatus, Error> {
        let path = self.dest.join(&artifact.path);
        let status = if write_if_changed(&path, &artifact.content, &artifact.fingerprint)? {
            log::debug!("wrote {}", path.display());
            self.report.written.push(artifact.path.clone());
            WriteStatus::Written
        } else {
            log::trace!("unchanged {}", path.display());
            self.report.unchanged.push(artifact.path.clone());
            WriteStatus::Unchanged
        };
        self.current.push(artifact);
        Ok(status)
    }

    /// Write artifacts in order. Stops at the first failure; the files
    /// written so far are kept and recorded in the manifest.
    pub fn write_all(&mut self, artifacts: &[GeneratedArtifact]) -> Result<(), Error> {
        for artifact in artifacts {
            if let Err(e) = self.write(artifact) {
                self.save_partial();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Save a manifest which lists both the previous and the current files
    /// so that `clean` can still find all of them
    fn save_partial(&self) {
        let mut manifest = self.previous.clone();
        for entry in &self.current.entries {
            manifest.entries.retain(|e| e.path != entry.path);
            manifest.entries.push(entry.clone());
        }
        if let Err(e) = manifest.save(&self.dest) {
            log::error!("failed to save manifest: {}", e);
        }
    }

    /// Remove stale files and save the manifest
    pub fn finish(mut self) -> Result<WriteReport, Error> {
        for entry in &self.previous.entries {
            if self.current.contains(&entry.path) {
                continue;
            }
            let path = self.dest.join(&entry.path);
            if remove_file(&path)? {
                log::info!("removed stale file {}", path.display());
                prune_empty_dirs(&self.dest, &path);
                self.report.removed.push(entry.path.clone());
            }
        }
        self.current.save(&self.dest)?;
        Ok(self.report)
    }
}

/// Write `content` to `path` unless the file has the same fingerprint.
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, content: &str, fingerprint: &Fingerprint) -> Result<bool, Error> {
    match fs::read(path) {
        Ok(bytes) if Fingerprint::of(&bytes) == *fingerprint => return Ok(false),
        _ => (),
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }
    fs::write(path, content).map_err(|e| write_error(path, e))?;
    Ok(true)
}
