use ariadne::{Label, Report, ReportBuilder, ReportKind, Source};
use parcel_ast::LocationSpan;
use std::fs;

type AriadneSpan<'a> = (&'a String, std::ops::Range<usize>);

/// Builds a report with several annotated locations in one file
/// (eg. a duplicate class and its first definition)
#[derive(Default)]
pub struct Builder {
    annotations: Vec<(LocationSpan, String)>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            annotations: vec![],
        }
    }

    pub fn annotate(mut self, locs: LocationSpan, msg: String) -> Self {
        self.annotations.push((locs, msg));
        self
    }

    pub fn build(self, main_msg: String, main_locs: &LocationSpan) -> String {
        let id = format!("{}", main_locs.filepath.display());
        let src = Source::from(fs::read_to_string(&*main_locs.filepath).unwrap_or_default());
        let mut r: ReportBuilder<'_, AriadneSpan<'_>> =
            Report::build(ReportKind::Error, &id, main_locs.begin.pos);
        for (locs, msg) in self.annotations {
            // Annotations in other files are skipped; ariadne needs one
            // source per id here
            if locs.filepath != main_locs.filepath {
                continue;
            }
            let locs_span = (&id, locs.begin.pos..locs.end.pos);
            r.add_label(Label::new(locs_span).with_message(msg));
        }
        let report = r.with_message(main_msg.clone()).finish();

        crate::render(report, &id, src).unwrap_or_else(|| format!("{}: {}", main_locs, main_msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_ast::Location;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_missing_file_still_renders_message() {
        let path = Arc::new(PathBuf::from("no/such/file.cfd"));
        let locs = LocationSpan::new(&path, Location::new(0, 0, 0), Location::new(0, 0, 0));
        let out = Builder::new().build("something went wrong".to_string(), &locs);
        assert!(out.contains("something went wrong"));
    }
}
