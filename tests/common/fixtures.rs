//! Test fixtures - reusable Go sources and requests.

use std::path::Path;

use scaffold::{Bootstrap, DeclKind, Element, SyncRequest};

pub const WIDGET_FILE: &str = "internal/domain/models/widget.go";

pub const MODULE_FILE: &str = "internal/app/module.go";

/// Struct `Widget` with the given field lines, all of them ensured
pub fn widget_request(root: &Path, fields: &[&str]) -> SyncRequest {
    let body: String = fields.iter().map(|f| format!("\t{}\n", f)).collect();
    SyncRequest::from_source(
        root.join(WIDGET_FILE),
        DeclKind::Type,
        "Widget",
        Bootstrap::new("models"),
        &format!("type Widget struct {{\n{}}}", body),
    )
    .unwrap()
    .with_elements(fields.iter().map(|f| Element::field(f).unwrap()))
}

/// `var Module = Register(...)` with the given arguments ensured
pub fn register_request(root: &Path, args: &[&str]) -> SyncRequest {
    SyncRequest::from_source(
        root.join(MODULE_FILE),
        DeclKind::Variable,
        "Module",
        Bootstrap::new("app"),
        &format!("var Module = Register({})", args.join(", ")),
    )
    .unwrap()
    .with_elements(args.iter().map(|a| Element::argument("Register", a).unwrap()))
}
