use std::fs;

use hamcrest2::assert_that;
use hamcrest2::prelude::*;
use logmsg_build::error::ErrorKind;
use logmsg_build::logmsg_core::{
    BindError, CancellationToken, CollectError, DiagnosticKind, EventId,
};
use logmsg_build::{Config, Generator};
use tempfile::TempDir;

const MODEL: &str = r"
pub struct User {
    pub name: String,
}
";

const APP: &str = r#"
use crate::model::User;

#[logger_message(
    "LoginFailed",
    LogLevel::Warning,
    "Login failed. User = {User:User}, Host = {Host:String}, Attempt = {Attempt:u32}."
)]
#[logger_message(
    format = "Session {Id:u64} closed",
    name = "SessionClosed",
    log_level = LogLevel::Information,
    event_id = 1001,
    extension_scope = Scope::Interface,
)]
pub struct Accounts;

pub struct Unannotated;

#[logger_message("Tick", LogLevel::Trace, "Tick {Count:usize}")]
pub(crate) enum Clock {}
"#;

fn generator() -> Generator {
    Generator::new()
        .source_text("model.rs", MODEL, "crate::model")
        .source_text("app.rs", APP, "crate::app")
}

#[test]
fn writes_one_file_per_annotated_type() {
    let out = TempDir::new().expect("temp dir");
    let written = generator().out_dir(out.path()).write().expect("writes");

    assert_that!(
        written.clone(),
        eq(vec![
            out.path().join("app__accounts_logger_messages.rs"),
            out.path().join("app__clock_logger_messages.rs"),
        ])
    );

    let accounts = fs::read_to_string(&written[0]).expect("generated file");
    syn::parse_file(&accounts).expect("generated code parses");
    assert!(accounts.starts_with("// @generated"));
    assert!(accounts.contains(
        "pub fn login_failed (user : & crate :: model :: User , host : & String , attempt : & u32 , error :"
    ));
    assert!(accounts.contains(r#""Login failed. User = {}, Host = {}, Attempt = {}.""#));
    assert!(accounts.contains("pub const SESSION_CLOSED_EVENT_ID : i32 = 1001 ;"));
    assert!(accounts.contains("pub trait AccountsLoggerMessages"));
    assert!(accounts.contains("fn session_closed (& self , id : & u64 , error :"));

    let clock = fs::read_to_string(&written[1]).expect("generated file");
    assert!(clock.contains("pub (crate) fn tick (count : & usize , error :"));
}

#[test]
fn event_ids_use_collection_ordinals() {
    let collection = generator().collect().expect("collects");
    let ids: Vec<(String, EventId)> = collection
        .messages()
        .map(|(_, binding, id)| (binding.name().to_owned(), id))
        .collect();

    assert_that!(
        ids,
        eq(vec![
            ("LoginFailed".to_owned(), EventId::Derived(3 << 28)),
            ("SessionClosed".to_owned(), EventId::Explicit("1001".into())),
            ("Tick".to_owned(), EventId::Derived(1 << 12)),
        ])
    );
    assert!(collection.diagnostics.is_empty());
}

#[test]
fn imports_do_not_leak_between_modules() {
    let source = r#"
        #[logger_message("Seen", LogLevel::Debug, "Seen {User:User}")]
        pub struct Elsewhere;
    "#;
    let generated = generator()
        .source_text("other.rs", source, "crate::other")
        .generate()
        .expect("generates");

    assert_that!(generated.files().len(), eq(2));
    assert_that!(generated.diagnostics().len(), eq(1));
    let diagnostic = &generated.diagnostics()[0];
    assert_that!(diagnostic.declaration.as_str(), eq("Elsewhere"));
    assert_that!(
        diagnostic.kind.clone(),
        eq(DiagnosticKind::Binding {
            attribute: 0,
            error: BindError::AmbiguousOrUnresolvedType {
                token: "User".into(),
                candidates: 0,
            },
        })
    );
}

#[test]
fn types_inside_functions_are_skipped() {
    let source = r#"
        pub fn run() {
            #[logger_message("Local", LogLevel::Debug, "Local {N:u8}")]
            struct Local;
        }
    "#;
    let collection = Generator::new()
        .source_text("run.rs", source, "crate")
        .collect()
        .expect("collects");

    assert!(collection.declarations.is_empty());
    assert_that!(
        collection.diagnostics[0].kind.clone(),
        eq(DiagnosticKind::Declaration(CollectError::DisallowedScope {
            declaration: "Local".into(),
            scope: "fn".into(),
        }))
    );
}

#[test]
fn custom_attribute_name() {
    let config = Config {
        attribute: "log_message".into(),
        macro_crate: "my_macros".into(),
        ..Config::default()
    };
    let source = r#"
        #[my_macros::log_message("Custom", LogLevel::Error, "Failed {Code:i32}")]
        pub struct Custom;

        #[logger_message("Ignored", LogLevel::Error, "Failed {Code:i32}")]
        pub struct Ignored;
    "#;
    let generated = Generator::new()
        .with_config(config)
        .source_text("custom.rs", source, "crate")
        .generate()
        .expect("generates");

    let names: Vec<&str> = generated.files().iter().map(|file| file.type_path()).collect();
    assert_that!(names, eq(vec!["crate::Custom"]));
}

#[test]
fn stale_is_empty_after_write() {
    let out = TempDir::new().expect("temp dir");
    let generator = generator().out_dir(out.path());

    assert_that!(generator.stale().expect("compares").len(), eq(2));
    generator.write().expect("writes");
    assert_that!(generator.stale().expect("compares"), eq(Vec::<std::path::PathBuf>::new()));

    fs::write(out.path().join("app__clock_logger_messages.rs"), "// edited").expect("edit");
    assert_that!(
        generator.stale().expect("compares"),
        eq(vec![out.path().join("app__clock_logger_messages.rs")])
    );
}

#[test]
fn cancelled_runs_write_nothing() {
    let out = TempDir::new().expect("temp dir");
    let token = CancellationToken::new();
    token.cancel();

    let error = generator()
        .out_dir(out.path().join("gen"))
        .cancellation(token)
        .write()
        .unwrap_err();

    assert!(matches!(error.kind(), ErrorKind::Cancelled));
    assert!(!out.path().join("gen").exists());
}

#[test]
fn reads_sources_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("app.rs");
    fs::write(&path, APP).expect("source written");

    let generated = Generator::new()
        .source_text("model.rs", MODEL, "crate::model")
        .source(&path, "crate::app")
        .generate()
        .expect("generates");
    assert_that!(generated.files().len(), eq(2));

    let error = Generator::new()
        .source(dir.path().join("missing.rs"), "crate")
        .generate()
        .unwrap_err();
    assert!(matches!(
        error.kind(),
        ErrorKind::ReadSourceError { file } if *file == dir.path().join("missing.rs")
    ));
}
