use std::path::PathBuf;
use std::sync::Arc;

pub struct SourceFile {
    pub path: Arc<PathBuf>,
    pub content: String,
    /// Found in an include directory
    pub included: bool,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: String) -> SourceFile {
        SourceFile {
            path: Arc::new(path),
            content,
            included: false,
        }
    }

    pub fn included(path: PathBuf, content: String) -> SourceFile {
        SourceFile {
            included: true,
            ..SourceFile::new(path, content)
        }
    }
}
