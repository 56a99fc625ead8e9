//! Property tests for syncing struct fields and call arguments.

use proptest::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use scaffold::syntax::is_keyword;
use scaffold::{format_source, Bootstrap, DeclKind, Element, SyncConfig, SyncRequest, Synchronizer};
use tempfile::TempDir;

/// A temp directory holding the files of one case
struct Workspace {
    dir: TempDir,
    sync: Synchronizer,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            sync: Synchronizer::new(SyncConfig::default()),
        }
    }

    fn with_file(self, name: &str, content: &str) -> Self {
        fs::write(self.path(name), content).unwrap();
        self
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }
}

const PATH: &str = "widget.go";

fn field_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[A-Z][a-z]{1,6}", 0..=6)
        .prop_map(|names| names.into_iter().collect())
}

fn argument() -> impl Strategy<Value = String> {
    "[a-z]{1,4}".prop_filter("not a keyword", |s| !is_keyword(s))
}

fn go_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["string", "int", "int64", "bool", "*time.Time", "[]byte"])
}

fn struct_source(fields: &[(String, &str)]) -> String {
    if fields.is_empty() {
        return "package models\n\ntype Widget struct{}\n".to_string();
    }
    let body: String = fields
        .iter()
        .map(|(name, ty)| format!("\t{} {}\n", name, ty))
        .collect();
    format!("package models\n\ntype Widget struct {{\n{}}}\n", body)
}

fn request(dir: &Path, fields: &[(String, &str)]) -> SyncRequest {
    let lines: Vec<String> = fields.iter().map(|(n, t)| format!("{} {}", n, t)).collect();
    let body: String = lines.iter().map(|l| format!("\t{}\n", l)).collect();
    SyncRequest::from_source(
        dir.join(PATH),
        DeclKind::Type,
        "Widget",
        Bootstrap::new("models"),
        &format!("type Widget struct {{\n{}}}", body),
    )
    .unwrap()
    .with_elements(lines.iter().map(|l| Element::field(l).unwrap()))
}

fn field_order(content: &str) -> Vec<String> {
    content
        .lines()
        .skip_while(|l| !l.starts_with("type Widget struct"))
        .skip(1)
        .take_while(|l| *l != "}")
        .filter_map(|l| l.split_whitespace().next().map(str::to_string))
        .collect()
}

fn typed(names: Vec<String>, ty: &'static str) -> Vec<(String, &'static str)> {
    names.into_iter().map(|n| (n, ty)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a second sync with the same inputs changes nothing.
    #[test]
    fn property_sync_is_idempotent(
        existing in field_names(),
        desired in field_names(),
        ty in go_type(),
    ) {
        let ws = Workspace::new().with_file(PATH, &struct_source(&typed(existing, ty)));
        let request = request(ws.dir.path(), &typed(desired, ty));

        ws.sync.sync(&request).unwrap();
        let first = ws.read(PATH);
        let second = ws.sync.sync(&request).unwrap();

        prop_assert!(!second.changed);
        prop_assert!(!second.written);
        prop_assert_eq!(ws.read(PATH), first);
    }

    /// PROPERTY: existing fields survive, in order, ahead of appended ones.
    #[test]
    fn property_existing_fields_keep_order_and_come_first(
        existing in field_names(),
        desired in field_names(),
    ) {
        let ws = Workspace::new().with_file(PATH, &struct_source(&typed(existing.clone(), "string")));

        let outcome = ws.sync.sync(&request(ws.dir.path(), &typed(desired.clone(), "int"))).unwrap();

        let order = field_order(&ws.read(PATH));
        prop_assert_eq!(&order[..existing.len()], &existing[..]);
        let appended: Vec<String> = desired
            .iter()
            .filter(|d| !existing.contains(d))
            .cloned()
            .collect();
        prop_assert_eq!(&order[existing.len()..], &appended[..]);
        prop_assert_eq!(outcome.appended, appended);
    }

    /// PROPERTY: on a key collision the existing field's type wins.
    #[test]
    fn property_existing_content_wins(names in field_names()) {
        let formatted = format_source(&struct_source(&typed(names.clone(), "string"))).unwrap();
        let ws = Workspace::new().with_file(PATH, &formatted);

        let outcome = ws.sync.sync(&request(ws.dir.path(), &typed(names.clone(), "int"))).unwrap();

        prop_assert_eq!(outcome.conflicts.len(), names.len());
        prop_assert!(!outcome.changed);
        prop_assert_eq!(ws.read(PATH), formatted);
    }

    /// PROPERTY: syncing into a missing file yields exactly the desired fields.
    #[test]
    fn property_creation_is_minimal(desired in field_names()) {
        let ws = Workspace::new();

        ws.sync.sync(&request(ws.dir.path(), &typed(desired.clone(), "bool"))).unwrap();

        prop_assert_eq!(field_order(&ws.read(PATH)), desired);
    }

    /// PROPERTY: call arguments are never duplicated or dropped.
    #[test]
    fn property_call_arguments_accumulate(
        existing in proptest::collection::btree_set(argument(), 0..=5),
        desired in proptest::collection::btree_set(argument(), 1..=5),
    ) {
        let existing: Vec<String> = existing.into_iter().collect();
        let desired: Vec<String> = desired.into_iter().collect();
        let ws = Workspace::new().with_file(
            "module.go",
            &format!("package app\n\nvar Module = Register({})\n", existing.join(", ")),
        );
        let request = SyncRequest::from_source(
            ws.path("module.go"),
            DeclKind::Variable,
            "Module",
            Bootstrap::new("app"),
            &format!("var Module = Register({})", desired.join(", ")),
        )
        .unwrap()
        .with_elements(desired.iter().map(|d| Element::argument("Register", d).unwrap()));

        ws.sync.sync(&request).unwrap();
        ws.sync.sync(&request).unwrap();

        let mut expected = existing.clone();
        expected.extend(desired.iter().filter(|d| !existing.contains(d)).cloned());
        prop_assert_eq!(
            ws.read("module.go"),
            format!("package app\n\nvar Module = Register({})\n", expected.join(", "))
        );
    }
}
