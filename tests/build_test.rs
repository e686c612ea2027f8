use filetime::{set_file_mtime, FileTime};
use parcelc::cli::Overrides;
use parcelc::config::{parse_config, Settings};
use parcelc::runner;
use pcc_artifact::MANIFEST_FILE;
use pcc_error::{Diagnostic, ErrorKind};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const ANIMAL: (&str, &str) = (
    "Animal.cfd",
    "parcel Zoo;
public class Animal {
    int32_t age;
    public void Speak();
    public final int32_t Get_Age();
}",
);

const DOG: (&str, &str) = (
    "Dog.cfd",
    "parcel Zoo;
public class Dog inherits Animal {
    String* name;
    public override void Speak();
}",
);

const PUPPY: (&str, &str) = (
    "Puppy.cfd",
    "parcel Zoo;
public class Puppy inherits Dog {
    bool house_trained;
}",
);

fn write_units(dir: &Path, units: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (name, src) in units {
        fs::write(dir.join(name), src).unwrap();
    }
}

fn settings(root: &Path, config: &str) -> Settings {
    Settings::new(parse_config(config).unwrap(), root, &Overrides::default()).unwrap()
}

fn core_only(root: &Path) -> Settings {
    settings(root, r#"{ sources: ["core"], dest: "autogen" }"#)
}

fn with_host(root: &Path) -> Settings {
    settings(
        root,
        r#"{ sources: ["core"], dest: "autogen", host: { parcels: ["Zoo"], ext_sources: ["ext"] } }"#,
    )
}

#[test]
fn test_second_build_writes_nothing() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL, DOG, PUPPY]);
    let settings = with_host(dir.path());

    let first = runner::build(&settings).unwrap();
    let written = &first.report.written;
    for path in [
        "include/parcel_runtime.h",
        "include/zoo_parcel.h",
        "source/zoo_parcel.c",
        "include/Zoo/Dog.h",
        "source/Zoo/Puppy.c",
        "hierarchy.json",
        "host/zoo/zoo_host.h",
        "host/zoo/_zoo.c",
        "host/zoo/Zoo/Dog_host.c",
    ] {
        assert!(written.contains(&PathBuf::from(path)), "{} is not written", path);
        assert!(dir.path().join("autogen").join(path).is_file());
    }
    assert!(dir.path().join("autogen").join(MANIFEST_FILE).is_file());

    let second = runner::build(&settings).unwrap();
    assert!(second.report.written.is_empty());
    assert!(second.report.removed.is_empty());
    assert_eq!(second.report.unchanged.len(), written.len());
}

#[test]
fn test_hierarchy_json() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL, DOG]);
    runner::build(&core_only(dir.path())).unwrap();
    let text = fs::read_to_string(dir.path().join("autogen/hierarchy.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["classes"][0]["fullname"], "Zoo::Animal");
    assert_eq!(json["classes"][1]["parent_name"], "Zoo::Animal");
}

#[test]
fn test_stale_files_are_removed() {
    let dir = tempdir().unwrap();
    let core = dir.path().join("core");
    write_units(&core, &[ANIMAL, DOG, PUPPY]);
    let settings = with_host(dir.path());
    runner::build(&settings).unwrap();
    let puppy_c = dir.path().join("autogen/source/Zoo/Puppy.c");
    assert!(puppy_c.is_file());

    fs::remove_file(core.join(PUPPY.0)).unwrap();
    let summary = runner::build(&settings).unwrap();
    assert!(!puppy_c.exists());
    let removed = &summary.report.removed;
    assert!(removed.contains(&PathBuf::from("source/Zoo/Puppy.c")));
    assert!(removed.contains(&PathBuf::from("include/Zoo/Puppy.h")));
    assert!(removed.contains(&PathBuf::from("host/zoo/Zoo/Puppy_host.c")));
    // The parcel table lists one class less
    assert!(summary
        .report
        .written
        .contains(&PathBuf::from("source/zoo_parcel.c")));
}

#[test]
fn test_clean() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL, DOG]);
    let settings = core_only(dir.path());
    let summary = runner::build(&settings).unwrap();
    let dest = dir.path().join("autogen");
    fs::write(dest.join("handwritten.txt"), "keep me").unwrap();

    let removed = runner::clean(&dest).unwrap();
    assert_eq!(removed.len(), summary.report.written.len());
    assert!(!dest.join("source/Zoo/Dog.c").exists());
    assert!(!dest.join(MANIFEST_FILE).exists());
    assert!(dest.join("handwritten.txt").is_file());

    assert!(runner::clean(&dest).unwrap().is_empty());
}

#[test]
fn test_dependents_are_touched() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL, DOG]);
    let ext = dir.path().join("ext");
    fs::create_dir_all(&ext).unwrap();
    let user = ext.join("zoo_ext.c");
    let other = ext.join("unrelated.c");
    fs::write(&user, "#include \"zoo_host.h\"\n").unwrap();
    fs::write(&other, "int main(void) { return 0; }\n").unwrap();
    let old = FileTime::from_unix_time(1_000_000, 0);
    set_file_mtime(&user, old).unwrap();
    set_file_mtime(&other, old).unwrap();

    let settings = with_host(dir.path());
    let summary = runner::build(&settings).unwrap();
    assert_eq!(summary.touched, vec![user.clone()]);
    let mtime = |p: &Path| FileTime::from_last_modification_time(&fs::metadata(p).unwrap());
    assert!(mtime(&user) > old);
    assert_eq!(mtime(&other), old);

    // Nothing changed, so nothing is touched
    set_file_mtime(&user, old).unwrap();
    let summary = runner::build(&settings).unwrap();
    assert!(summary.touched.is_empty());
    assert_eq!(mtime(&user), old);
}

#[test]
fn test_link_error_writes_nothing() {
    let dir = tempdir().unwrap();
    let again = ("Animal2.cfd", "parcel Zoo;\nclass Animal {}");
    write_units(&dir.path().join("core"), &[ANIMAL, DOG, again]);
    let err = runner::build(&core_only(dir.path())).unwrap_err();
    let err = err.downcast_ref::<pcc_hierarchy::Error>().unwrap();
    assert_eq!(err.kind(), ErrorKind::DuplicateClassError);
    assert!(!dir.path().join("autogen").exists());
}

#[test]
fn test_undeclared_host_parcel() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL]);
    let settings = settings(
        dir.path(),
        r#"{ sources: ["core"], dest: "autogen", host: { parcels: ["Farm"] } }"#,
    );
    let err = runner::build(&settings).unwrap_err();
    assert_eq!(err.to_string(), "host parcel `Farm` is not declared");
    assert!(!dir.path().join("autogen").exists());
}

#[test]
fn test_included_parcels_are_not_generated() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("vendor"), &[ANIMAL, DOG]);
    let cow = ("Cow.cfd", "parcel Farm;\npublic class Cow inherits Zoo::Dog {}");
    write_units(&dir.path().join("core"), &[cow]);
    let settings = settings(
        dir.path(),
        r#"{ sources: ["core"], includes: ["vendor"], prereqs: ["Zoo"], dest: "autogen" }"#,
    );
    runner::build(&settings).unwrap();
    let out = dir.path().join("autogen");
    assert!(out.join("include/Farm/Cow.h").exists());
    assert!(out.join("source/farm_parcel.c").exists());
    assert!(!out.join("include/Zoo/Dog.h").exists());
    assert!(!out.join("source/zoo_parcel.c").exists());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(runner::HIERARCHY_JSON)).unwrap()).unwrap();
    assert_eq!(json["classes"][0]["fullname"], "Zoo::Animal");
    assert_eq!(json["classes"][0]["is_included"], true);
    assert_eq!(json["classes"][2]["fullname"], "Farm::Cow");
    assert_eq!(json["classes"][2]["is_included"], false);
    assert_eq!(json["parcels"][0]["included"], false);
    assert_eq!(json["parcels"][1]["included"], true);
}

#[test]
fn test_first_directory_declaring_a_parcel_wins() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL]);
    let stale_animal = ("Animal.cfd", "parcel Zoo;\nclass Animal {}");
    let barn = ("Barn.cfd", "parcel Farm;\nclass Barn {\n    int32_t size;\n}");
    write_units(&dir.path().join("vendor1"), &[stale_animal, barn]);
    let other_barn = ("Barn.cfd", "parcel Farm;\nclass Barn {}");
    write_units(&dir.path().join("vendor2"), &[other_barn]);

    let h = runner::link(
        &[dir.path().join("core")],
        &[dir.path().join("vendor1"), dir.path().join("vendor2")],
    )
    .unwrap();
    let animal = h.find(&parcel_ast::names::class_fullname("Zoo::Animal")).unwrap();
    assert!(!animal.is_included);
    assert_eq!(animal.methods.len(), 2);
    let barn = h.find(&parcel_ast::names::class_fullname("Farm::Barn")).unwrap();
    assert!(barn.is_included);
    assert_eq!(barn.attributes.len(), 1);
}

#[test]
fn test_missing_prereq() {
    let dir = tempdir().unwrap();
    write_units(&dir.path().join("core"), &[ANIMAL]);
    let settings = settings(
        dir.path(),
        r#"{ sources: ["core"], prereqs: ["Zoo", "Farm"], dest: "autogen" }"#,
    );
    let err = runner::check(&settings).unwrap_err();
    assert_eq!(err.to_string(), "prerequisite parcel `Farm` is not found");
    let err = runner::build(&settings).unwrap_err();
    assert_eq!(err.to_string(), "prerequisite parcel `Farm` is not found");
    assert!(!dir.path().join("autogen").exists());
}

#[test]
fn test_check_prints_ladder() {
    let dir = tempdir().unwrap();
    let cat = ("Cat.cfd", "parcel Zoo;\nclass Cat inherits Animal {}");
    write_units(&dir.path().join("core"), &[PUPPY, cat, DOG, ANIMAL]);
    let lines = runner::check(&core_only(dir.path())).unwrap();
    assert_eq!(
        lines,
        vec!["Zoo::Animal", "  Zoo::Cat", "  Zoo::Dog", "    Zoo::Puppy"]
    );
    assert!(!dir.path().join("autogen").exists());
}
