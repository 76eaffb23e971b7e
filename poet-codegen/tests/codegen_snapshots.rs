//! Snapshot tests for whole-file rendering.
//!
//! These tests verify that rendered Kotlin files match expected output.
//! Run `cargo insta review` to update snapshots when making intentional changes.

use ktpoet_codegen::{
    RenderConfig, args, render,
    names::{ClassName, MemberName, kotlin},
    spec::{FileSpec, FunSpec, KModifier, ParameterSpec, PropertySpec, TypeSpec},
};
use ktpoet_core::{Error, GeneratedFile, Overwrite, WriteResult};

fn class(name: &str) -> ClassName {
    ClassName::best_guess(name).expect("valid class name")
}

/// Render with the default config.
fn render_default(file: &FileSpec) -> String {
    render(file, &RenderConfig::default()).expect("render failed")
}

/// A file with one function whose body constructs each `(local, class)` pair.
fn constructing(package: &str, function: &str, locals: &[(&str, &str)]) -> FileSpec {
    let mut body = FunSpec::builder(function);
    for (local, name) in locals {
        body = body
            .add_statement("val %N = %T()", args![*local, class(name)])
            .expect("valid statement");
    }
    FileSpec::builder(package, "Tacos")
        .add_function(body.build().expect("valid function"))
        .build()
        .expect("valid file")
}

fn property(name: &str, initializer: &str) -> PropertySpec {
    PropertySpec::builder(name, kotlin::string())
        .initializer(initializer, args![])
        .expect("valid initializer")
        .build()
        .expect("valid property")
}

#[test]
fn test_colliding_simple_names() {
    let file = constructing(
        "com.example",
        "eat",
        &[
            ("twitter", "com.twitter.tacos.Taco"),
            ("square", "com.squareup.tacos.Taco"),
        ],
    );
    insta::assert_snapshot!("colliding_simple_names", render_default(&file));
}

#[test]
fn test_config_alias_with_collision() {
    let file = constructing(
        "com.example",
        "dates",
        &[("created", "java.util.Date"), ("stored", "java.sql.Date")],
    );
    let config = RenderConfig::default().alias("java.sql.Date", "SqlDate");
    let text = render(&file, &config).expect("render failed");
    insta::assert_snapshot!("config_alias_with_collision", text);
}

#[test]
fn test_keyword_package() {
    let taco = TypeSpec::class_builder("Taco")
        .add_property(
            PropertySpec::builder("name", kotlin::string())
                .initializer("%S", args!["taco"])
                .expect("valid initializer")
                .build()
                .expect("valid property"),
        )
        .build()
        .expect("valid type");
    let file = FileSpec::get("com.squareup.is.fun", taco).expect("valid file");
    insta::assert_snapshot!("keyword_package", render_default(&file));
}

#[test]
fn test_data_class() {
    let constructor = FunSpec::constructor_builder()
        .add_parameter(
            ParameterSpec::builder("name", kotlin::string())
                .add_kdoc("the taco's name", args![])
                .expect("valid kdoc")
                .build()
                .expect("valid parameter"),
        )
        .add_parameter(
            ParameterSpec::builder("size", kotlin::int())
                .default_value("%L", args![1])
                .expect("valid default")
                .build()
                .expect("valid parameter"),
        )
        .build()
        .expect("valid constructor");
    let size = PropertySpec::builder("size", kotlin::int())
        .mutable(true)
        .initializer("size", args![])
        .expect("valid initializer")
        .build()
        .expect("valid property");
    let taco = TypeSpec::class_builder("Taco")
        .add_kdoc("A taco.", args![])
        .expect("valid kdoc")
        .add_modifiers([KModifier::Data])
        .primary_constructor(constructor)
        .add_property(property("name", "name"))
        .add_property(size)
        .build()
        .expect("valid type");
    let file = FileSpec::get("com.squareup.tacos", taco).expect("valid file");
    insta::assert_snapshot!("data_class", render_default(&file));
}

#[test]
fn test_enum_class() {
    let roshambo = TypeSpec::enum_builder("Roshambo")
        .add_enum_constant("ROCK")
        .expect("valid constant")
        .add_enum_constant("SCISSORS")
        .expect("valid constant")
        .add_function(
            FunSpec::builder("describe")
                .returns(kotlin::string())
                .add_statement("return %S", args!["hand"])
                .expect("valid statement")
                .build()
                .expect("valid function"),
        )
        .build()
        .expect("valid type");
    let file = FileSpec::get("com.example", roshambo).expect("valid file");
    insta::assert_snapshot!("enum_class", render_default(&file));
}

#[test]
fn test_long_parameter_list() {
    let order = FunSpec::builder("order")
        .add_parameter(ParameterSpec::new("size", kotlin::int()).expect("valid parameter"))
        .add_parameter(ParameterSpec::new("filling", kotlin::string()).expect("valid parameter"))
        .add_parameter(ParameterSpec::new("spicy", kotlin::boolean()).expect("valid parameter"))
        .returns(kotlin::string())
        .add_statement("return %P", args!["$size $filling"])
        .expect("valid statement")
        .build()
        .expect("valid function");
    let file = FileSpec::builder("com.example", "Orders")
        .add_function(order)
        .add_default_imports(kotlin::DEFAULT_IMPORTS.iter().copied())
        .build()
        .expect("valid file");
    insta::assert_snapshot!("long_parameter_list", render_default(&file));
}

#[test]
fn test_wrapped_statement() {
    let lunch = FunSpec::builder("lunch")
        .add_statement(
            "val order = %T(%S,♢%S,♢%T.DEFAULT,♢emptyMap<%T,·%T>())",
            args![
                class("com.squareup.tacos.Taco"),
                "carnitas",
                "salsa verde",
                class("com.squareup.tacos.Shell"),
                kotlin::string(),
                kotlin::int()
            ],
        )
        .expect("valid statement")
        .add_statement("eat(order)", args![])
        .expect("valid statement")
        .build()
        .expect("valid function");
    let file = FileSpec::builder("com.example", "Lunch")
        .add_function(lunch)
        .add_default_imports(kotlin::DEFAULT_IMPORTS.iter().copied())
        .build()
        .expect("valid file");
    let text = render(&file, &RenderConfig::default().column_limit(40)).expect("render failed");
    assert!(text.lines().all(|line| line.chars().count() <= 40));
    insta::assert_snapshot!("wrapped_statement", text);
}

#[test]
fn test_member_import() {
    let launch = MemberName::new("kotlinx.coroutines", "launch").expect("valid member");
    let start = FunSpec::builder("start")
        .add_statement("%M()", args![launch])
        .expect("valid statement")
        .build()
        .expect("valid function");
    let file = FileSpec::builder("com.example", "Start")
        .add_function(start)
        .build()
        .expect("valid file");
    insta::assert_snapshot!("member_import", render_default(&file));
}

#[test]
fn test_numeric_literals() {
    let sizes = FunSpec::builder("sizes")
        .add_statement("val big = %L", args![10_000])
        .expect("valid statement")
        .add_statement("val small = %L", args![0.0001])
        .expect("valid statement")
        .build()
        .expect("valid function");
    let file = FileSpec::builder("", "Sizes")
        .add_function(sizes)
        .build()
        .expect("valid file");
    assert_eq!(
        render_default(&file),
        "public fun sizes() {\n  val big = 10_000\n  val small = 0.0001\n}\n"
    );
}

#[test]
fn test_wildcard_import_is_rejected() {
    let file = FileSpec::builder("com.example", "Tacos")
        .add_import("com.squareup.tacos", ["*"])
        .build()
        .expect("valid file");
    let err = render(&file, &RenderConfig::default()).unwrap_err();
    assert!(matches!(*err, Error::UnsupportedImport { ref path } if path == "com.squareup.tacos.*"));
}

#[test]
fn test_unclosed_statement_fails_render() {
    let eat = FunSpec::builder("eat")
        .add_code("«val x = 1\n", args![])
        .expect("valid code")
        .build()
        .expect("valid function");
    let file = FileSpec::builder("com.example", "Tacos")
        .add_function(eat)
        .build()
        .expect("valid file");
    let err = render(&file, &RenderConfig::default()).unwrap_err();
    assert!(matches!(*err, Error::UnclosedStatement { depth: 1 }));
}

#[test]
fn test_render_is_deterministic() {
    let locals = [
        ("a", "com.squareup.tacos.Taco"),
        ("b", "com.twitter.tacos.Taco"),
        ("c", "java.util.Date"),
        ("d", "java.sql.Date"),
    ];
    let forward = constructing("com.example", "eat", &locals);
    let text = render_default(&forward);
    assert_eq!(text, render_default(&forward));

    let mut reversed = locals;
    reversed.reverse();
    let backward = constructing("com.example", "eat", &reversed);
    let imports = |text: &str| -> Vec<String> {
        text.lines()
            .filter(|l| l.starts_with("import "))
            .map(str::to_string)
            .collect()
    };
    assert_eq!(imports(&text), imports(&render_default(&backward)));
}

#[test]
fn test_write_to_directory() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let taco = TypeSpec::class_builder("Taco").build().expect("valid type");
    let file = FileSpec::get("com.squareup.tacos", taco).expect("valid file");

    let (path, result) = file.write_to(dir.path(), Overwrite::Always).expect("write");
    assert_eq!(result, WriteResult::Written);
    assert_eq!(
        path,
        dir.path().join("com").join("squareup").join("tacos").join("Taco.kt")
    );
    assert_eq!(
        std::fs::read_to_string(&path).expect("read back"),
        "package com.squareup.tacos\n\npublic class Taco\n"
    );

    let (_, result) = file.write_to(dir.path(), Overwrite::IfMissing).expect("write");
    assert_eq!(result, WriteResult::Skipped);
}
