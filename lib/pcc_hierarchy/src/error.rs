use parcel_ast::LocationSpan;
use pcc_error::{Diagnostic, ErrorKind};

/// Errors detected while linking class records
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{locs}: DuplicateClassError: {msg}")]
    DuplicateClass {
        msg: String,
        locs: LocationSpan,
        first_locs: LocationSpan,
    },
    #[error("{locs}: UnresolvedParentError: {msg}")]
    UnresolvedParent { msg: String, locs: LocationSpan },
    #[error("{locs}: AttributeShadowError: {msg}")]
    AttributeShadow {
        msg: String,
        locs: LocationSpan,
        inherited_locs: LocationSpan,
    },
    #[error("{locs}: CycleError: {msg}")]
    Cycle { msg: String, locs: LocationSpan },
    #[error("{locs}: UnknownTypeError: {msg}")]
    UnknownType { msg: String, locs: LocationSpan },
    #[error("{locs}: FinalClassError: {msg}")]
    FinalClass { msg: String, locs: LocationSpan },
    #[error("{locs}: OverrideError: {msg}")]
    Override { msg: String, locs: LocationSpan },
}

pub fn duplicate_class(msg: impl Into<String>, locs: &LocationSpan, first: &LocationSpan) -> Error {
    Error::DuplicateClass {
        msg: msg.into(),
        locs: locs.clone(),
        first_locs: first.clone(),
    }
}

pub fn unresolved_parent(msg: impl Into<String>, locs: &LocationSpan) -> Error {
    Error::UnresolvedParent {
        msg: msg.into(),
        locs: locs.clone(),
    }
}

pub fn attribute_shadow(
    msg: impl Into<String>,
    locs: &LocationSpan,
    inherited: &LocationSpan,
) -> Error {
    Error::AttributeShadow {
        msg: msg.into(),
        locs: locs.clone(),
        inherited_locs: inherited.clone(),
    }
}

pub fn cycle(msg: impl Into<String>, locs: &LocationSpan) -> Error {
    Error::Cycle {
        msg: msg.into(),
        locs: locs.clone(),
    }
}

pub fn unknown_type(msg: impl Into<String>, locs: &LocationSpan) -> Error {
    Error::UnknownType {
        msg: msg.into(),
        locs: locs.clone(),
    }
}

pub fn final_class(msg: impl Into<String>, locs: &LocationSpan) -> Error {
    Error::FinalClass {
        msg: msg.into(),
        locs: locs.clone(),
    }
}

pub fn override_error(msg: impl Into<String>, locs: &LocationSpan) -> Error {
    Error::Override {
        msg: msg.into(),
        locs: locs.clone(),
    }
}

impl Diagnostic for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateClass { .. } => ErrorKind::DuplicateClassError,
            Error::UnresolvedParent { .. } => ErrorKind::UnresolvedParentError,
            Error::AttributeShadow { .. } => ErrorKind::AttributeShadowError,
            Error::Cycle { .. } => ErrorKind::CycleError,
            Error::UnknownType { .. } => ErrorKind::UnknownTypeError,
            Error::FinalClass { .. } => ErrorKind::FinalClassError,
            Error::Override { .. } => ErrorKind::OverrideError,
        }
    }

    fn message(&self) -> String {
        match self {
            Error::DuplicateClass { msg, .. }
            | Error::UnresolvedParent { msg, .. }
            | Error::AttributeShadow { msg, .. }
            | Error::Cycle { msg, .. }
            | Error::UnknownType { msg, .. }
            | Error::FinalClass { msg, .. }
            | Error::Override { msg, .. } => msg.clone(),
        }
    }

    fn location(&self) -> Option<&LocationSpan> {
        match self {
            Error::DuplicateClass { locs, .. }
            | Error::UnresolvedParent { locs, .. }
            | Error::AttributeShadow { locs, .. }
            | Error::Cycle { locs, .. }
            | Error::UnknownType { locs, .. }
            | Error::FinalClass { locs, .. }
            | Error::Override { locs, .. } => Some(locs),
        }
    }

    fn report(&self) -> String {
        let main_msg = format!("{}: {}", self.kind(), self.message());
        match self {
            Error::DuplicateClass {
                locs, first_locs, ..
            } => pcc_error::report_builder()
                .annotate(first_locs.clone(), "first declared here".to_string())
                .annotate(locs.clone(), "declared again here".to_string())
                .build(main_msg, locs),
            Error::AttributeShadow {
                locs,
                inherited_locs,
                ..
            } => pcc_error::report_builder()
                .annotate(inherited_locs.clone(), "inherited attribute".to_string())
                .annotate(locs.clone(), "shadowing attribute".to_string())
                .build(main_msg, locs),
            _ => {
                let locs = self.location().cloned();
                match locs {
                    Some(locs) => pcc_error::build_report(main_msg, &locs, |r, locs_span| {
                        r.with_label(pcc_error::Label::new(locs_span))
                    }),
                    None => main_msg,
                }
            }
        }
    }
}
