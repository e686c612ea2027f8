use insta::assert_snapshot;
use parcel_parser::{Parser, SourceFile};
use pcc_artifact::{GeneratedArtifact, Generator};
use pcc_bind_core::CoreBinding;
use pcc_hierarchy::Hierarchy;
use std::path::PathBuf;

const ANIMAL: (&str, &str) = (
    "Animal.cfd",
    "parcel Zoo;
public class Animal {
    int32_t age;
    String* name;
    public abstract int32_t Weight();
    public void Eat();
}",
);

const DOG: (&str, &str) = (
    "Dog.cfd",
    "parcel Zoo;
public class Dog inherits Animal {
    Hash* tricks;
    Animal* friend;
    public override void Eat();
    public incremented String* Bark(double volume);
}",
);

const PUPPY: (&str, &str) = (
    "Puppy.cfd",
    "parcel Zoo;
final class Puppy inherits Dog {
    bool house_trained;
    override int32_t Weight();
}",
);

fn hierarchy(units: &[(&str, &str)]) -> Hierarchy {
    let files = units
        .iter()
        .map(|(path, src)| SourceFile::new(PathBuf::from(path), src.to_string()))
        .collect::<Vec<_>>();
    Hierarchy::build(Parser::parse_files(&files).unwrap()).unwrap()
}

fn generate(h: &Hierarchy) -> Vec<GeneratedArtifact> {
    CoreBinding::new(h, "", "").generate()
}

fn content<'a>(artifacts: &'a [GeneratedArtifact], path: &str) -> &'a str {
    &artifacts
        .iter()
        .find(|a| a.path == PathBuf::from(path))
        .unwrap_or_else(|| panic!("{} is not generated", path))
        .content
}

/// Index of the first line containing `pat`
fn line_of(text: &str, pat: &str) -> usize {
    text.lines()
        .position(|l| l.contains(pat))
        .unwrap_or_else(|| panic!("`{}` not found in:\n{}", pat, text))
}

#[test]
fn test_generated_paths() {
    let h = hierarchy(&[ANIMAL, DOG, PUPPY]);
    let artifacts = generate(&h);
    let paths = artifacts
        .iter()
        .map(|a| a.path.to_string_lossy().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        paths,
        vec![
            "include/parcel_runtime.h",
            "include/zoo_parcel.h",
            "source/zoo_parcel.c",
            "include/Zoo/Animal.h",
            "source/Zoo/Animal.c",
            "include/Zoo/Dog.h",
            "source/Zoo/Dog.c",
            "include/Zoo/Puppy.h",
            "source/Zoo/Puppy.c",
        ]
    );
    assert!(artifacts.iter().all(|a| a.generator == Generator::Core));
}

#[test]
fn test_class_source() {
    let h = hierarchy(&[ANIMAL, DOG]);
    let artifacts = generate(&h);
    assert_snapshot!(content(&artifacts, "source/Zoo/Dog.c"), @r###"
#include "Zoo/Dog.h"

const zoo_Dog_VTable ZOO_DOG_VTABLE = {
    {
        "Zoo::Dog",
        &ZOO_ANIMAL_VTABLE.base,
        sizeof(zoo_Dog),
        (pcl_destroy_t)zoo_Dog_destroy,
        3
    },
    (zoo_Dog_Weight_t)zoo_Animal_Weight_ABSTRACT,
    zoo_Dog_Eat_IMP,
    zoo_Dog_Bark_IMP,
};

zoo_Dog*
zoo_Dog_new(void) {
    zoo_Dog *self = (zoo_Dog*)pcl_allocate(sizeof(zoo_Dog));
    self->refcount = 1;
    self->vtable = &ZOO_DOG_VTABLE.base;
    return zoo_Dog_init(self);
}

zoo_Dog*
zoo_Dog_init(zoo_Dog *self) {
    zoo_Animal_init((zoo_Animal*)self);
    self->tricks = NULL;
    self->friend = NULL;
    return self;
}

void
zoo_Dog_destroy(zoo_Dog *self) {
    pcl_handle_decref((pcl_Handle*)self->tricks);
    self->tricks = NULL;
    pcl_decref(self->friend);
    self->friend = NULL;
    zoo_Animal_destroy((zoo_Animal*)self);
}
"###);
}

#[test]
fn test_struct_layout_is_parent_first() {
    let h = hierarchy(&[ANIMAL, DOG, PUPPY]);
    let artifacts = generate(&h);
    let header = content(&artifacts, "include/Zoo/Puppy.h");
    let age = line_of(header, "int32_t age;");
    let name = line_of(header, "pcl_String *name;");
    let tricks = line_of(header, "pcl_Hash *tricks;");
    let friend = line_of(header, "zoo_Animal *friend;");
    let trained = line_of(header, "bool house_trained;");
    assert!(age < name && name < tricks && tricks < friend && friend < trained);
    assert!(line_of(header, "PCL_OBJ_HEAD") < age);
    assert!(header.contains("#include \"Zoo/Dog.h\""));
}

#[test]
fn test_slot_order_is_stable_across_subclasses() {
    let h = hierarchy(&[ANIMAL, DOG, PUPPY]);
    let artifacts = generate(&h);
    let header = content(&artifacts, "include/Zoo/Puppy.h");
    let weight = line_of(header, "zoo_Puppy_Weight_t Weight;");
    let eat = line_of(header, "zoo_Puppy_Eat_t Eat;");
    let bark = line_of(header, "zoo_Puppy_Bark_t Bark;");
    assert!(line_of(header, "pcl_VTable base;") < weight);
    assert!(weight < eat && eat < bark);

    let source = content(&artifacts, "source/Zoo/Puppy.c");
    let weight = line_of(source, "zoo_Puppy_Weight_IMP,");
    let eat = line_of(source, "(zoo_Puppy_Eat_t)zoo_Dog_Eat_IMP,");
    let bark = line_of(source, "(zoo_Puppy_Bark_t)zoo_Dog_Bark_IMP,");
    assert!(weight < eat && eat < bark);
}

#[test]
fn test_lifecycle_order() {
    let h = hierarchy(&[ANIMAL, DOG, PUPPY]);
    let artifacts = generate(&h);
    let source = content(&artifacts, "source/Zoo/Puppy.c");
    // Parent initializer runs before the own fields are set
    assert!(line_of(source, "zoo_Dog_init((zoo_Dog*)self);") < line_of(source, "self->house_trained = false;"));
    // Primitive fields are not released
    assert!(!source.contains("decref(self->house_trained)"));
    assert!(source.contains("    zoo_Dog_destroy((zoo_Dog*)self);\n}"));

    let root = content(&artifacts, "source/Zoo/Animal.c");
    assert!(line_of(root, "pcl_handle_decref((pcl_Handle*)self->name);") < line_of(root, "pcl_free(self);"));
    assert!(root.contains("        NULL,\n"));
}

#[test]
fn test_abstract_stub() {
    let h = hierarchy(&[ANIMAL]);
    let artifacts = generate(&h);
    let header = content(&artifacts, "include/Zoo/Animal.h");
    assert!(header.contains("int32_t zoo_Animal_Weight_ABSTRACT(zoo_Animal *self);"));
    assert!(header.contains("void zoo_Animal_Eat_IMP(zoo_Animal *self);"));
    assert!(!header.contains("zoo_Animal_Weight_IMP"));
    let source = content(&artifacts, "source/Zoo/Animal.c");
    assert!(source.contains("    pcl_die(\"Zoo::Animal#Weight is abstract\");\n    return 0;\n"));
}

#[test]
fn test_dispatch_wrapper() {
    let h = hierarchy(&[ANIMAL, DOG]);
    let artifacts = generate(&h);
    let header = content(&artifacts, "include/Zoo/Dog.h");
    assert!(header.contains(
        "static CHY_INLINE pcl_String*
zoo_Dog_Bark(zoo_Dog *self, double volume) {
    const zoo_Dog_VTable *vt = (const zoo_Dog_VTable*)self->vtable;
    return vt->Bark(self, volume);
}"
    ));
    assert!(header.contains("    vt->Eat(self);\n"));
}

#[test]
fn test_parcel_files() {
    let h = hierarchy(&[PUPPY, ANIMAL, DOG]);
    let artifacts = generate(&h);
    let header = content(&artifacts, "include/zoo_parcel.h");
    assert!(line_of(header, "typedef struct zoo_Animal zoo_Animal;") < line_of(header, "typedef struct zoo_Dog zoo_Dog;"));
    let source = content(&artifacts, "source/zoo_parcel.c");
    assert!(source.contains(
        "const pcl_VTable *const ZOO_VTABLES[] = {
    &ZOO_ANIMAL_VTABLE.base,
    &ZOO_DOG_VTABLE.base,
    &ZOO_PUPPY_VTABLE.base,
};"
    ));
    assert!(source.contains("const size_t ZOO_NUM_VTABLES = 3;"));
}

#[test]
fn test_cross_parcel_reference() {
    let owner = (
        "Owner.cfd",
        "parcel Farm.Home;
class Owner {
    Zoo::Dog* pet;
    void Adopt(decremented Zoo::Dog* dog);
}",
    );
    let h = hierarchy(&[ANIMAL, DOG, owner]);
    let artifacts = generate(&h);
    let header = content(&artifacts, "include/Farm/Home/Owner.h");
    assert!(header.contains("#include \"farm_home_parcel.h\"\n#include \"zoo_parcel.h\"\n"));
    assert!(header.contains("    zoo_Dog *pet;\n"));
    assert!(header.contains("#ifndef H_FARM_HOME_OWNER\n"));
    assert!(content(&artifacts, "source/Farm/Home/Owner.c").contains("pcl_decref(self->pet);"));
}

#[test]
fn test_included_classes_are_not_generated() {
    let cow = SourceFile::new(
        PathBuf::from("Cow.cfd"),
        "parcel Farm;\nclass Cow inherits Zoo::Dog {}".to_string(),
    );
    let mut files = [ANIMAL, DOG]
        .iter()
        .map(|(path, src)| SourceFile::included(PathBuf::from(path), src.to_string()))
        .collect::<Vec<_>>();
    files.push(cow);
    let h = Hierarchy::build(Parser::parse_files(&files).unwrap()).unwrap();
    let artifacts = generate(&h);
    let paths = artifacts
        .iter()
        .map(|a| a.path.to_string_lossy().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        paths,
        vec![
            "include/parcel_runtime.h",
            "include/farm_parcel.h",
            "source/farm_parcel.c",
            "include/Farm/Cow.h",
            "source/Farm/Cow.c",
        ]
    );
    let header = content(&artifacts, "include/Farm/Cow.h");
    assert!(header.contains("#include \"Zoo/Dog.h\"\n"));
    assert!(header.contains("#include \"zoo_parcel.h\"\n"));
}

#[test]
fn test_output_is_deterministic() {
    let a = generate(&hierarchy(&[ANIMAL, DOG, PUPPY]));
    let b = generate(&hierarchy(&[PUPPY, DOG, ANIMAL]));
    assert_eq!(a, b);
}

#[test]
fn test_header_and_footer() {
    let h = hierarchy(&[ANIMAL]);
    let artifacts = CoreBinding::new(&h, "Generated.\nDo not edit.", "end").generate();
    for artifact in &artifacts {
        assert!(artifact.content.starts_with("/* Generated. */\n/* Do not edit. */\n\n"));
        assert!(artifact.content.ends_with("\n/* end */\n"));
    }
}
