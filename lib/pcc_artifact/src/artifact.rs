use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Content-derived identifier of an artifact (blake3, hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn of(content: &[u8]) -> Fingerprint {
        Fingerprint(blake3::hash(content).to_hex().to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which generator produced an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Core,
    Host,
}

/// A file to be written, relative to the destination directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub content: String,
    pub fingerprint: Fingerprint,
    pub generator: Generator,
}

impl GeneratedArtifact {
    pub fn new(generator: Generator, path: impl Into<PathBuf>, content: String) -> GeneratedArtifact {
        let fingerprint = Fingerprint::of(content.as_bytes());
        GeneratedArtifact {
            path: path.into(),
            content,
            fingerprint,
            generator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_depends_only_on_content() {
        let a = GeneratedArtifact::new(Generator::Core, "a.h", "int x;\n".to_string());
        let b = GeneratedArtifact::new(Generator::Host, "b.h", "int x;\n".to_string());
        let c = GeneratedArtifact::new(Generator::Core, "a.h", "int y;\n".to_string());
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_ne!(a.fingerprint, c.fingerprint);
        assert_eq!(a.fingerprint.0.len(), 64);
    }
}
