use pcc_error::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("GenerationIOError: failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("GenerationIOError: failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("GenerationIOError: failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("GenerationIOError: failed to touch {}: {source}", path.display())]
    Touch {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("GenerationIOError: manifest {} is broken: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::GenerationIOError
    }

    /// The path which could not be handled
    pub fn path(&self) -> &Path {
        match self {
            Error::Write { path, .. }
            | Error::Read { path, .. }
            | Error::Remove { path, .. }
            | Error::Touch { path, .. }
            | Error::Manifest { path, .. } => path,
        }
    }
}

pub(crate) fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source,
    }
}
