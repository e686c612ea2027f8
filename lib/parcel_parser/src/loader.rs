use crate::error::Error;
use crate::source_file::SourceFile;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extension of declaration units
pub const DECL_EXTENSION: &str = "cfd";

/// Recursively read the declaration units under `dirs`.
/// Hidden files and directories are skipped; each file is read once.
pub fn load_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<Vec<SourceFile>, Error> {
    Loader::new().load_dirs(dirs)
}

/// Reads declaration units, remembering the files already read so that
/// overlapping directories yield each unit once
#[derive(Debug, Default)]
pub struct Loader {
    seen: HashSet<PathBuf>,
}

impl Loader {
    pub fn new() -> Loader {
        Loader::default()
    }

    pub fn load_dirs<P: AsRef<Path>>(&mut self, dirs: &[P]) -> Result<Vec<SourceFile>, Error> {
        self.load(dirs, false)
    }

    /// Like `load_dirs` but the units are marked as included
    pub fn load_include_dirs<P: AsRef<Path>>(
        &mut self,
        dirs: &[P],
    ) -> Result<Vec<SourceFile>, Error> {
        self.load(dirs, true)
    }

    fn load<P: AsRef<Path>>(
        &mut self,
        dirs: &[P],
        included: bool,
    ) -> Result<Vec<SourceFile>, Error> {
        let mut files = vec![];
        for dir in dirs {
            for path in find_units(dir.as_ref())? {
                let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                if !self.seen.insert(key) {
                    log::debug!("skipping {} (already loaded)", path.display());
                    continue;
                }
                let content = fs::read_to_string(&path).map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
                files.push(if included {
                    SourceFile::included(path, content)
                } else {
                    SourceFile::new(path, content)
                });
            }
        }
        log::debug!("found {} declaration units", files.len());
        Ok(files)
    }
}

/// List declaration units under `dir`, sorted by path
fn find_units(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths = vec![];
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry.map_err(|e| Error::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|x| x.to_str()) == Some(DECL_EXTENSION)
        {
            paths.push(path.to_path_buf());
        }
    }
    Ok(paths)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dirs_skips_hidden_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Hello/.git")).unwrap();
        fs::write(root.join("Hello/Dog.cfd"), "parcel Hello;").unwrap();
        fs::write(root.join("Hello/.Hidden.cfd"), "").unwrap();
        fs::write(root.join("Hello/.git/Junk.cfd"), "").unwrap();
        fs::write(root.join("Hello/README.md"), "").unwrap();
        fs::write(root.join("Animal.cfd"), "parcel Hello;").unwrap();

        let files = load_dirs(&[root, root]).unwrap();
        let names = files
            .iter()
            .map(|f| f.path.strip_prefix(root).unwrap().to_path_buf())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![PathBuf::from("Animal.cfd"), PathBuf::from("Hello/Dog.cfd")]
        );
    }

    #[test]
    fn test_overlapping_dirs_read_each_unit_once() {
        let dir = tempfile::tempdir().unwrap();
        let core = dir.path().join("core");
        fs::create_dir_all(core.join("sub")).unwrap();
        fs::write(core.join("Animal.cfd"), "parcel Hello;").unwrap();
        fs::write(core.join("sub/Dog.cfd"), "parcel Hello;").unwrap();

        let files = load_dirs(&[core.clone(), core.join("sub"), core.join("sub/../sub")]).unwrap();
        assert_eq!(files.len(), 2);
        let files = load_dirs(&[core.join("sub"), core.clone()]).unwrap();
        let names = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Dog.cfd", "Animal.cfd"]);
    }

    #[test]
    fn test_loader_remembers_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Animal.cfd"), "parcel Hello;").unwrap();
        let mut loader = Loader::new();
        assert_eq!(loader.load_dirs(&[dir.path()]).unwrap().len(), 1);
        assert!(loader.load_dirs(&[dir.path()]).unwrap().is_empty());
        assert!(loader.load_include_dirs(&[dir.path()]).unwrap().is_empty());

        let other = tempfile::tempdir().unwrap();
        fs::write(other.path().join("Dog.cfd"), "parcel Hello;").unwrap();
        let files = loader.load_include_dirs(&[other.path()]).unwrap();
        assert!(files[0].included);
    }

    #[test]
    fn test_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dirs(&[dir.path().join("nope")]).is_err());
    }
}
