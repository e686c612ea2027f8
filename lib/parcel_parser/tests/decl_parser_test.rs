use insta::assert_snapshot;
use parcel_ast::names::*;
use parcel_ast::*;
use parcel_parser::{Error, Parser, SourceFile};
use std::path::PathBuf;

fn parse(src: &str) -> Result<ClassRecord, Error> {
    let file = SourceFile::new(PathBuf::from("test.cfd"), src.to_string());
    let mut records = Parser::parse_files(&[file])?;
    Ok(records.remove(0))
}

fn parse_err(src: &str) -> String {
    parse(src).unwrap_err().to_string()
}

#[test]
fn test_empty_class() {
    let record = parse("parcel Hello;\nclass Animal {}").unwrap();
    assert_eq!(record.parcel, parcel_name("Hello"));
    assert_eq!(record.fullname, class_fullname("Hello::Animal"));
    assert_eq!(record.parent, None);
    assert!(record.attributes.is_empty());
    assert!(record.methods.is_empty());
    assert_eq!(record.locs.line(), 2);
}

#[test]
fn test_class_with_members() {
    let src = "
        parcel Hello;

        /* A dog. */
        public final class Dog inherits Animal {
            int32_t age;        // in years
            nullable String* name;

            public incremented String* Speak(int32_t times, decremented Hash* opts);
            override void Eat();
            abstract double Weight();
        };
    ";
    let record = parse(src).unwrap();
    assert_eq!(record.fullname, class_fullname("Hello::Dog"));
    assert_eq!(record.parent.as_deref(), Some("Animal"));
    assert!(record.modifiers.public);
    assert!(record.modifiers.is_final);

    let attrs = record
        .attributes
        .iter()
        .map(|a| (a.name.as_str(), a.ty.to_string()))
        .collect::<Vec<_>>();
    assert_eq!(
        attrs,
        vec![("age", "int32_t".to_string()), ("name", "nullable String*".to_string())]
    );

    let speak = &record.methods[0];
    assert_eq!(speak.name, method_name("Speak"));
    assert!(speak.modifiers.public);
    assert_eq!(speak.ret_ty.to_string(), "incremented String*");
    assert_eq!(speak.params.len(), 2);
    assert_eq!(speak.params[1].name, "opts");
    assert_eq!(speak.params[1].ty.to_string(), "decremented Hash*");
    assert_eq!(speak.locs.line(), 9);

    let eat = &record.methods[1];
    assert!(eat.modifiers.is_override);
    assert_eq!(eat.ret_ty, TypeExpr::Void);
    assert!(eat.params.is_empty());

    assert!(record.methods[2].modifiers.is_abstract);
}

#[test]
fn test_qualified_names() {
    let record =
        parse("parcel Lucy.Analysis;\nclass Lucy::Analysis::Token inherits Lucy::Object::Obj {}")
            .unwrap();
    assert_eq!(record.parcel, parcel_name("Lucy.Analysis"));
    assert_eq!(record.fullname, class_fullname("Lucy::Analysis::Token"));
    assert_eq!(record.parent.as_deref(), Some("Lucy::Object::Obj"));
}

#[test]
fn test_missing_parcel() {
    assert_snapshot!(parse_err("class Dog {}"), @"test.cfd:1: ParseError: expected `parcel` declaration");
}

#[test]
fn test_no_class() {
    assert_snapshot!(parse_err("parcel Hello;\n"), @"test.cfd:2: ParseError: no class is declared");
}

#[test]
fn test_two_classes() {
    assert_snapshot!(
        parse_err("parcel Hello;\nclass A {}\nclass B {}"),
        @"test.cfd:3: ParseError: only one class can be declared in a file"
    );
}

#[test]
fn test_duplicate_method() {
    let src = "parcel Hello;
class Dog {
    void Bark();
    int32_t Bark(int32_t times);
}";
    assert_snapshot!(parse_err(src), @"test.cfd:4: ParseError: duplicate method `Bark` in Hello::Dog");
}

#[test]
fn test_duplicate_attribute() {
    let src = "parcel Hello;
class Dog {
    int32_t age;
    double age;
}";
    assert_snapshot!(parse_err(src), @"test.cfd:4: ParseError: duplicate attribute `age` in Hello::Dog");
}

#[test]
fn test_duplicate_param() {
    let src = "parcel Hello;
class Dog {
    void Bark(int32_t a, int32_t a);
}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: duplicate parameter `a`");
}

#[test]
fn test_missing_star() {
    let src = "parcel Hello;\nclass Dog {\n    Hash table;\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: expected `*` after object type `Hash`");
}

#[test]
fn test_modifier_on_primitive() {
    let src = "parcel Hello;\nclass Dog {\n    nullable int32_t age;\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: type modifiers cannot be applied to primitive `int32_t`");
}

#[test]
fn test_unknown_primitive() {
    let src = "parcel Hello;\nclass Dog {\n    long age;\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: unknown type `long`");
}

#[test]
fn test_modifier_on_attribute() {
    let src = "parcel Hello;\nclass Dog {\n    public int32_t age;\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: modifiers cannot be applied to attribute `age`");
}

#[test]
fn test_missing_semicolon() {
    let src = "parcel Hello;\nclass Dog {\n    int32_t age\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:4: ParseError: expected `;` but got `}`");
}

#[test]
fn test_reserved_method_name() {
    let src = "parcel Hello;\nclass Dog {\n    void destroy();\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: method name `destroy` is reserved");
}

#[test]
fn test_reserved_attribute_name() {
    let src = "parcel Hello;\nclass Dog {\n    int32_t refcount;\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: attribute name `refcount` is reserved");
}

#[test]
fn test_keyword_as_attribute_name() {
    let src = "parcel Hello;\nclass Dog {\n    int32_t int;\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: attribute name `int` is a C keyword");
}

#[test]
fn test_vtable_member_as_method_name() {
    let src = "parcel Hello;\nclass Dog {\n    void base();\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: method name `base` is reserved");
}

#[test]
fn test_host_method_as_method_name() {
    let src = "parcel Hello;\nclass Dog {\n    void release();\n}";
    assert_snapshot!(parse_err(src), @"test.cfd:3: ParseError: method name `release` is reserved");
}

#[test]
fn test_generated_local_as_param_name() {
    for name in ["vt", "result", "retval", "truth", "args"] {
        let src = format!("parcel Hello;\nclass Dog {{\n    void Bark(int32_t {});\n}}", name);
        assert_eq!(
            parse(&src).unwrap_err().to_string(),
            format!("test.cfd:3: ParseError: parameter name `{}` is reserved", name)
        );
    }
}

#[test]
fn test_reserved_class_name() {
    let src = "parcel Hello;\nclass Parcel {}";
    assert_snapshot!(parse_err(src), @"test.cfd:2: ParseError: class name `Parcel` is reserved in parcel Hello");
}
