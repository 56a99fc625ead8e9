//! Scenario: Project configuration drives the synchronizer
//!
//! Journey: a team checks in `scaffold.toml` asking to never overwrite
//! unparseable files and to write private files.
//!
//! Success Criteria:
//! - Typos in the config are reported with a suggestion, not fatal
//! - A broken file stops the sync and stays as it was
//! - New files get the configured permissions

use crate::common::*;
use scaffold::{Config, ParseErrorPolicy, ScaffoldError, Synchronizer};

const CONFIG: &str = r#"[sync]
on_parse_error = "abort"
file_mode = 0o600

[log]
filtr = "debug"
"#;

fn configured_project() -> (TestProject, Config) {
    let project = TestProject::new();
    project.write("scaffold.toml", CONFIG);
    let (config, warnings) = Config::load_with_warnings(&project.path("scaffold.toml")).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "filtr");
    assert_eq!(warnings[0].line, Some(6));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("filter"));
    (project, config)
}

/// SCENARIO: abort policy leaves a broken file untouched
#[test]
fn scenario_abort_policy_protects_broken_file() {
    let (project, config) = configured_project();
    assert_eq!(config.sync.on_parse_error, ParseErrorPolicy::Abort);
    let sync = Synchronizer::from_config(&config.sync);

    let broken = "package models\n\ntype Widget struct {\n";
    project.write(WIDGET_FILE, broken);
    let err = sync
        .sync(&widget_request(project.root.path(), &["Name string"]))
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::Unparseable { .. }));
    assert!(err.to_string().contains("refusing to regenerate"));
    assert_eq!(project.read(WIDGET_FILE), broken);
}

/// SCENARIO: files are written with the configured mode
#[cfg(unix)]
#[test]
fn scenario_configured_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (project, config) = configured_project();
    let sync = Synchronizer::from_config(&config.sync);
    sync.sync(&widget_request(project.root.path(), &["Name string"]))
        .unwrap();

    let mode = std::fs::metadata(project.path(WIDGET_FILE))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

/// SCENARIO: no config file means defaults
#[test]
fn scenario_missing_config_uses_defaults() {
    let project = TestProject::new();
    let (config, warnings) = Config::load_or_default(project.root.path()).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(config.sync.on_parse_error, ParseErrorPolicy::Regenerate);
    assert!(config.sync.skip_unchanged);
}
