//! Scenario: Regenerating into hand-edited files
//!
//! Journey: a generator runs against a project whose files may be missing,
//! partially generated, hand-edited or broken.
//!
//! Success Criteria:
//! - Missing declarations are created exactly as the template says
//! - Existing elements are kept as they are; missing ones are appended
//! - Re-running changes nothing

use crate::common::*;
use scaffold::{FileOrigin, SyncAction};

/// SCENARIO: empty project, desired struct `Widget{Name string, Price int}`
#[test]
fn scenario_creates_struct_in_missing_file() {
    let project = TestProject::new();
    let request = widget_request(project.root.path(), &["Name string", "Price int"]);

    let outcome = project.run(&request);

    assert_eq!(outcome.action, SyncAction::Created);
    assert!(outcome.bootstrapped());
    insta::assert_snapshot!(project.read(WIDGET_FILE), @r#"
package models

type Widget struct {
	Name  string
	Price int
}
"#);
}

/// SCENARIO: `Widget{Name string}` exists; desired adds `Price int`
#[test]
fn scenario_appends_missing_field() {
    let project = TestProject::new();
    project.write(WIDGET_FILE, "package models\n\ntype Widget struct {\n\tName string\n}\n");

    let outcome = project.run(&widget_request(project.root.path(), &["Name string", "Price int"]));

    assert_eq!(outcome.action, SyncAction::Merged);
    assert_eq!(outcome.appended, vec!["Price"]);
    assert_eq!(
        project.read(WIDGET_FILE),
        "package models\n\ntype Widget struct {\n\tName  string\n\tPrice int\n}\n"
    );
}

/// SCENARIO: repeating the previous sync produces the same file
#[test]
fn scenario_second_run_is_identical() {
    let project = TestProject::new();
    project.write(WIDGET_FILE, "package models\n\ntype Widget struct {\n\tName string\n}\n");
    let request = widget_request(project.root.path(), &["Name string", "Price int"]);

    project.run(&request);
    let first = project.read(WIDGET_FILE);
    let second_outcome = project.run(&request);

    assert_eq!(project.read(WIDGET_FILE), first);
    assert!(!second_outcome.changed);
    assert!(!second_outcome.written);
}

/// SCENARIO: a hand-added field survives regeneration
#[test]
fn scenario_keeps_hand_added_field() {
    let project = TestProject::new();
    project.write(
        WIDGET_FILE,
        "package models\n\n// Widget is sold by the shop.\ntype Widget struct {\n\tName  string\n\tNotes string\n}\n",
    );

    project.run(&widget_request(project.root.path(), &["Name string", "Price int"]));

    insta::assert_snapshot!(project.read(WIDGET_FILE), @r#"
package models

// Widget is sold by the shop.
type Widget struct {
	Name  string
	Notes string
	Price int
}
"#);
}

/// SCENARIO: `Register(a, b)` gains `c` exactly once
#[test]
fn scenario_accumulates_aggregator_arguments() {
    let project = TestProject::new();
    project.write(MODULE_FILE, "package app\n\nvar Module = Register(a, b)\n");
    let request = register_request(project.root.path(), &["c"]);

    project.run(&request);
    project.run(&request);

    assert_eq!(project.read(MODULE_FILE), "package app\n\nvar Module = Register(a, b, c)\n");
}

/// SCENARIO: a malformed file is replaced by the bootstrap plus the declaration
#[test]
fn scenario_replaces_malformed_file() {
    let project = TestProject::new();
    project.write(WIDGET_FILE, "package models\n\ntype Widget struct {\n\tName string\n\nfunc broken( {\n");

    let outcome = project.run(&widget_request(project.root.path(), &["Name string", "Price int"]));

    assert!(matches!(outcome.origin, FileOrigin::Unparseable(_)));
    assert_eq!(
        project.read(WIDGET_FILE),
        "package models\n\ntype Widget struct {\n\tName  string\n\tPrice int\n}\n"
    );
}

/// SCENARIO: a field whose type changed by hand is kept and reported
#[test]
fn scenario_reports_conflicting_field() {
    let project = TestProject::new();
    project.write(WIDGET_FILE, "package models\n\ntype Widget struct {\n\tPrice decimal.Decimal\n}\n");

    let outcome = project.run(&widget_request(project.root.path(), &["Price int"]));

    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(
        outcome.conflicts[0].to_string(),
        "type Widget: kept existing Price `decimal.Decimal` (template wants `int`)"
    );
    assert!(project.read(WIDGET_FILE).contains("Price decimal.Decimal"));
}

/// SCENARIO: syncs on different declarations of one file build on each other
#[test]
fn scenario_sequential_syncs_share_a_file() {
    let project = TestProject::new();
    let root = project.root.path();

    project.run(&widget_request(root, &["Name string"]));
    let constructor = scaffold::SyncRequest::from_source(
        root.join(WIDGET_FILE),
        scaffold::DeclKind::Function,
        "NewWidget",
        scaffold::Bootstrap::new("models"),
        "func NewWidget(name string) *Widget {\n\treturn &Widget{\n\t\tName: name,\n\t}\n}",
    )
    .unwrap();
    project.run(&constructor);

    insta::assert_snapshot!(project.read(WIDGET_FILE), @r#"
package models

type Widget struct {
	Name string
}

func NewWidget(name string) *Widget {
	return &Widget{
		Name: name,
	}
}
"#);
}

/// SCENARIO: a file with a license block, a cgo preamble and block comments
/// keeps all of them when a field is appended
#[test]
fn scenario_keeps_block_comments() {
    let project = TestProject::new();
    project.write(
        WIDGET_FILE,
        "/*\n * Copyright 2026 Shop Authors.\n */\n\npackage models\n\n/*\n#include <stdlib.h>\n*/\nimport \"C\"\n\n/* Widget is sold by the shop. */\ntype Widget struct {\n\tName string // the name\n}\n",
    );
    let request = widget_request(project.root.path(), &["Name string", "Price int"]);

    let outcome = project.run(&request);
    let second = project.run(&request);

    assert_eq!(outcome.origin, FileOrigin::Existing);
    assert_eq!(outcome.appended, vec!["Price"]);
    assert!(!second.changed);
    insta::assert_snapshot!(project.read(WIDGET_FILE), @r#"
/*
 * Copyright 2026 Shop Authors.
 */

package models

/*
#include <stdlib.h>
*/
import "C"

/* Widget is sold by the shop. */
type Widget struct {
	Name  string // the name
	Price int
}
"#);
}

/// SCENARIO: hand-written constants and expressions keep their exact text
#[test]
fn scenario_keeps_numeric_literals_and_operator_spacing() {
    let project = TestProject::new();
    let unrelated = "package models\n\nconst Big = 1e+5\n\nvar scale = 1.5e-3 * float64(Big)\n\nfunc discount(price, rate int64) int64 {\n\treturn price - price*rate/100\n}\n";
    project.write(
        WIDGET_FILE,
        &format!("{}\ntype Widget struct {{\n\tName string\n}}\n", unrelated),
    );

    project.run(&widget_request(project.root.path(), &["Name string", "Price int"]));

    assert_eq!(
        project.read(WIDGET_FILE),
        format!("{}\ntype Widget struct {{\n\tName  string\n\tPrice int\n}}\n", unrelated)
    );
}
