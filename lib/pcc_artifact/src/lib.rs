//! Generated files: fingerprints, writing only what changed, and the
//! manifest used to clean them up.
mod artifact;
mod error;
mod manifest;
mod touch;
mod writer;
pub use crate::artifact::{Fingerprint, GeneratedArtifact, Generator};
pub use crate::error::Error;
pub use crate::manifest::{clean, Manifest, ManifestEntry, MANIFEST_FILE};
pub use crate::touch::touch;
pub use crate::writer::{write_if_changed, ArtifactWriter, WriteReport, WriteStatus};
