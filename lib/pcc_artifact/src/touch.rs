use crate::error::Error;
use filetime::FileTime;
use std::path::Path;

/// Set the modification time of `path` to now
pub fn touch(path: &Path) -> Result<(), Error> {
    log::debug!("touching {}", path.display());
    filetime::set_file_mtime(path, FileTime::now()).map_err(|source| Error::Touch {
        path: path.to_path_buf(),
        source,
    })
}
