//! Runs a C compiler in syntax-only mode over the generated tree. Skipped
//! when no compiler is installed.
use parcel_parser::{Parser, SourceFile};
use pcc_artifact::GeneratedArtifact;
use pcc_bind_core::CoreBinding;
use pcc_hierarchy::Hierarchy;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const CHARMONY_H: &str = "#define CHY_INLINE inline\n";

/// Names which are close to the ones the generators use
const UNITS: [(&str, &str); 5] = [
    (
        "Animal.cfd",
        "parcel Zoo;
public class Animal {
    int32_t age;
    String* name;
    nullable Hash* opts;
    public abstract int32_t Weight();
    public void Eat(int32_t times, bool loud);
    public final String* Get_Name();
}",
    ),
    (
        "Dog.cfd",
        "parcel Zoo;
public class Dog inherits Animal {
    Vector* tricks;
    Animal* friend;
    int64_t vtable_size;
    public override void Eat(int32_t times, bool loud);
    public incremented String* Bark(double volume, decremented Hash* opts);
    public void Release();
    public int32_t Base(int32_t self_count);
}",
    ),
    (
        "Wrapper.cfd",
        "parcel Zoo;
final class Wrapper inherits Dog {
    override int32_t Weight();
}",
    ),
    (
        "Runtime.cfd",
        "parcel Zoo;
class Zoo::Birds::Runtime {
    double wingspan;
    nullable Dog* Find(String* name);
}",
    ),
    (
        "Cow.cfd",
        "parcel Farm;
class Cow inherits Zoo::Animal {
    Zoo::Dog* guard;
    override int32_t Weight();
}",
    ),
];

fn hierarchy(units: &[(&str, &str)]) -> Hierarchy {
    let files = units
        .iter()
        .map(|(path, src)| SourceFile::new(PathBuf::from(path), src.to_string()))
        .collect::<Vec<_>>();
    Hierarchy::build(Parser::parse_files(&files).unwrap()).unwrap()
}

fn write_tree(dest: &Path, artifacts: &[GeneratedArtifact]) {
    for a in artifacts {
        let path = dest.join(&a.path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &a.content).unwrap();
    }
    fs::write(dest.join("include/charmony.h"), CHARMONY_H).unwrap();
}

fn compiler() -> String {
    std::env::var("CC").unwrap_or_else(|_| "cc".to_string())
}

#[test]
fn test_generated_tree_compiles() {
    let h = hierarchy(&UNITS);
    let artifacts = CoreBinding::new(&h, "", "").generate();
    let dir = tempdir().unwrap();
    write_tree(dir.path(), &artifacts);

    let sources = artifacts
        .iter()
        .filter(|a| a.path.extension().map_or(false, |e| e == "c"))
        .map(|a| dir.path().join(&a.path))
        .collect::<Vec<_>>();
    assert_eq!(sources.len(), 7);
    let output = Command::new(compiler())
        .arg("-std=c99")
        .arg("-fsyntax-only")
        .arg("-Werror=implicit-function-declaration")
        .arg("-I")
        .arg(dir.path().join("include"))
        .args(&sources)
        .output();
    let output = match output {
        Ok(o) => o,
        Err(e) => {
            eprintln!("skipped: cannot run {} ({})", compiler(), e);
            return;
        }
    };
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
