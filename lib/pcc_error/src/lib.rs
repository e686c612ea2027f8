mod report_builder;
pub use ariadne::Label;
use ariadne::{Report, ReportBuilder, ReportKind, Source};
use parcel_ast::LocationSpan;
pub use report_builder::Builder;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::ops::Range;

/// Machine-distinguishable kind of a compiler error
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum ErrorKind {
    ParseError,
    DuplicateClassError,
    UnresolvedParentError,
    AttributeShadowError,
    CycleError,
    UnknownTypeError,
    FinalClassError,
    OverrideError,
    GenerationIOError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Errors which can point at a declaration
pub trait Diagnostic {
    fn kind(&self) -> ErrorKind;
    fn message(&self) -> String;
    fn location(&self) -> Option<&LocationSpan>;

    /// Render this error as an ariadne report (plain message if no
    /// location is available)
    fn report(&self) -> String {
        let main_msg = format!("{}: {}", self.kind(), self.message());
        match self.location() {
            Some(locs) => build_report(main_msg, locs, |r, locs_span| {
                r.with_label(Label::new(locs_span))
            }),
            None => main_msg,
        }
    }
}

type AriadneSpan<'a> = (&'a String, Range<usize>);

/// Helper for building report with ariadne crate.
pub fn build_report<F>(main_msg: String, locs: &LocationSpan, f: F) -> String
where
    F: for<'b> FnOnce(
        ReportBuilder<'b, AriadneSpan<'b>>,
        AriadneSpan<'b>,
    ) -> ReportBuilder<'b, AriadneSpan<'b>>,
{
    // ariadne needs Id: Display
    let id = format!("{}", locs.filepath.display());
    let locs_span = (&id, locs.begin.pos..locs.end.pos);
    let src = Source::from(fs::read_to_string(&*locs.filepath).unwrap_or_default());
    let report = f(Report::build(ReportKind::Error, &id, locs.begin.pos), locs_span)
        .with_message(main_msg.clone())
        .finish();

    render(report, &id, src).unwrap_or_else(|| format!("{}: {}", locs, main_msg))
}

/// Helper for building report with ariadne crate.
pub fn report_builder() -> Builder {
    Builder::new()
}

/// Write `report` into a String. Returns None if ariadne failed (it may
/// panic on spans which do not fit the source)
fn render<'a>(report: Report<'a, AriadneSpan<'a>>, id: &'a String, src: Source) -> Option<String> {
    std::panic::catch_unwind(|| {
        let mut rendered = vec![];
        report.write((id, src), &mut rendered).ok()?;
        Some(String::from_utf8_lossy(&rendered).to_string())
    })
    .ok()
    .flatten()
}
