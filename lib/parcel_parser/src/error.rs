use parcel_ast::LocationSpan;
use pcc_error::{Diagnostic, ErrorKind};
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed declaration
    #[error("{locs}: ParseError: {msg}")]
    ParseError { msg: String, locs: LocationSpan },
    /// Failed to read a declaration unit
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Diagnostic for Error {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ParseError
    }

    fn message(&self) -> String {
        match self {
            Error::ParseError { msg, .. } => msg.clone(),
            Error::Io { .. } => self.to_string(),
        }
    }

    fn location(&self) -> Option<&LocationSpan> {
        match self {
            Error::ParseError { locs, .. } => Some(locs),
            Error::Io { .. } => None,
        }
    }
}
