use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Position in a source file. `line` and `col` are 0-origin.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Location {
    pub line: usize,
    pub col: usize,
    pub pos: usize,
}

impl Location {
    pub fn new(line: usize, col: usize, pos: usize) -> Location {
        Location { line, col, pos }
    }
}

/// Range in a source file (end-exclusive)
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LocationSpan {
    pub filepath: Arc<PathBuf>,
    pub begin: Location,
    pub end: Location,
}

impl LocationSpan {
    pub fn new(filepath: &Arc<PathBuf>, begin: Location, end: Location) -> LocationSpan {
        LocationSpan {
            filepath: filepath.clone(),
            begin,
            end,
        }
    }

    /// Returns a span covering both `self` and `other`
    pub fn merge(&self, other: &LocationSpan) -> LocationSpan {
        LocationSpan {
            filepath: self.filepath.clone(),
            begin: self.begin.clone(),
            end: other.end.clone(),
        }
    }

    /// 1-origin line number, for messages
    pub fn line(&self) -> usize {
        self.begin.line + 1
    }
}

impl fmt::Display for LocationSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.filepath.display(), self.line())
    }
}
