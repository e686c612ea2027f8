use insta::assert_snapshot;
use parcelc::runner;
use pcc_error::{Diagnostic, ErrorKind};
use std::path::PathBuf;

/// Link the units of tests/erroneous/<case> and return the error with its
/// kind. Paths are relative to the project root so that the messages are
/// the same on every machine.
fn link_err(case: &str) -> (ErrorKind, String) {
    let dir = PathBuf::from("tests/erroneous").join(case);
    let err = match runner::link(&[dir], &[]) {
        Ok(_) => panic!("{} should fail", case),
        Err(e) => e,
    };
    let kind = if let Some(e) = err.downcast_ref::<parcel_parser::Error>() {
        e.kind()
    } else if let Some(e) = err.downcast_ref::<pcc_hierarchy::Error>() {
        e.kind()
    } else {
        panic!("unexpected error: {:?}", err)
    };
    (kind, err.to_string())
}

#[test]
fn test_duplicate_class() {
    let (kind, msg) = link_err("duplicate_class");
    assert_eq!(kind, ErrorKind::DuplicateClassError);
    assert_snapshot!(msg, @"tests/erroneous/duplicate_class/Animal2.cfd:2: DuplicateClassError: class `Zoo::Animal` is already declared");
}

#[test]
fn test_unresolved_parent() {
    let (kind, msg) = link_err("unresolved_parent");
    assert_eq!(kind, ErrorKind::UnresolvedParentError);
    assert_snapshot!(msg, @"tests/erroneous/unresolved_parent/Dog.cfd:2: UnresolvedParentError: parent class `Zoo::Animal` of `Zoo::Dog` is not declared");
}

#[test]
fn test_cycle() {
    let (kind, msg) = link_err("cycle");
    assert_eq!(kind, ErrorKind::CycleError);
    assert_snapshot!(msg, @"tests/erroneous/cycle/A.cfd:2: CycleError: inheritance cycle: Zoo::A -> Zoo::B -> Zoo::A");
}

#[test]
fn test_final_class() {
    let (kind, msg) = link_err("final_class");
    assert_eq!(kind, ErrorKind::FinalClassError);
    assert_snapshot!(msg, @"tests/erroneous/final_class/Sub.cfd:2: FinalClassError: `Zoo::Sub` cannot inherit from final class `Zoo::Base`");
}

#[test]
fn test_attribute_shadow() {
    let (kind, msg) = link_err("attribute_shadow");
    assert_eq!(kind, ErrorKind::AttributeShadowError);
    assert_snapshot!(msg, @"tests/erroneous/attribute_shadow/Bad.cfd:3: AttributeShadowError: attribute `age` of `Zoo::Bad` shadows the one inherited from `Zoo::Animal`");
}

#[test]
fn test_parse_error() {
    let (kind, msg) = link_err("missing_semicolon");
    assert_eq!(kind, ErrorKind::ParseError);
    assert_snapshot!(msg, @"tests/erroneous/missing_semicolon/Dog.cfd:4: ParseError: expected `;` but got `}`");
}

#[test]
fn test_report_points_at_declaration() {
    let dir = PathBuf::from("tests/erroneous/final_class");
    let err = runner::link(&[dir], &[]).unwrap_err();
    let report = err.downcast_ref::<pcc_hierarchy::Error>().unwrap().report();
    assert!(report.contains("FinalClassError"));
    assert!(report.contains("Sub.cfd"));
}
