//! End-to-end drift scenarios through the library API
//!
//! Baseline `{"A": {"B": "1", "C": "2"}}` against the Staging overlay
//! `{"A": {"B": "1", "D": "3"}}`, with the ignore and show variations.

mod fixtures;

use config_validate::{pipeline, FailureStates, Options, ReportRow, Verdict};
use fixtures::{webapp_path, SettingsDir};

use config_validate::FailureState::{Missing, Unknown};

fn staging_options() -> Options {
    Options {
        environments: vec!["Staging".to_string()],
        failure_states: FailureStates::from([Missing, Unknown]),
        ..Default::default()
    }
}

fn row<'a>(rows: &'a [ReportRow], key: &str) -> Option<&'a ReportRow> {
    rows.iter().find(|r| r.key == key)
}

#[test]
fn test_missing_and_unknown_fail_the_run() {
    let dir = SettingsDir::drift();
    let summary = pipeline::run(dir.path(), &staging_options()).unwrap();

    let rows = &summary.overlays[0].rows;
    let c = row(rows, "A:C").and_then(|r| r.classification).unwrap();
    assert!(c.is_missing);
    assert!(!c.is_unknown);

    let d = row(rows, "A:D").and_then(|r| r.classification).unwrap();
    assert!(d.is_unknown);
    assert!(!d.is_missing);

    assert_eq!(summary.observed, FailureStates::from([Missing, Unknown]));
    assert_eq!(summary.verdict, Verdict::Failure);
    assert_eq!(summary.exit_code, 1);
}

#[test]
fn test_ignored_unknown_key_still_fails_on_missing() {
    let dir = SettingsDir::drift();
    let options = Options {
        ignore_paths: vec!["A:D".to_string()],
        ..staging_options()
    };
    let summary = pipeline::run(dir.path(), &options).unwrap();

    let d = row(&summary.overlays[0].rows, "A:D")
        .and_then(|r| r.classification)
        .unwrap();
    assert!(d.is_ignored);
    assert!(d.is_unknown);

    assert_eq!(summary.observed, FailureStates::from([Missing]));
    assert_eq!(summary.verdict, Verdict::Failure);
}

#[test]
fn test_show_unknown_hides_missing_rows_but_keeps_parent() {
    let dir = SettingsDir::drift();
    let options = Options {
        show: FailureStates::from([Unknown]),
        ..staging_options()
    };
    let summary = pipeline::run(dir.path(), &options).unwrap();

    let keys: Vec<_> = summary.overlays[0].rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "A:D"]);
    assert!(summary.overlays[0].rows[0].is_header());
    assert_eq!(summary.verdict, Verdict::Failure);
}

#[test]
fn test_only_unknown_with_default_failure_states_passes() {
    let dir = SettingsDir::new()
        .file("appsettings.json", r#"{"A": {"B": "1"}}"#)
        .file("appsettings.Staging.json", r#"{"A": {"B": "1", "Extra": "x"}}"#);
    let options = Options {
        environments: vec!["staging".to_string()],
        ..Default::default()
    };

    let summary = pipeline::run(dir.path(), &options).unwrap();
    assert_eq!(summary.observed, FailureStates::from([Unknown]));
    assert_eq!(summary.verdict, Verdict::Success);
}

#[test]
fn test_missing_environment_is_fatal() {
    let dir = SettingsDir::drift();
    let options = Options {
        environments: vec!["Staging".to_string(), "Production".to_string()],
        ..Default::default()
    };

    let err = pipeline::run(dir.path(), &options).unwrap_err();
    assert_eq!(err.exit_code(), config_validate::EXIT_FATAL);
    assert!(err.to_string().contains("Production"));
}

#[test]
fn test_missing_baseline_is_fatal() {
    let dir = SettingsDir::new().file("appsettings.Staging.json", "{}");
    let err = pipeline::run(dir.path(), &staging_options()).unwrap_err();
    assert!(err.to_string().contains("appsettings.json"));
}

#[test]
fn test_malformed_overlay_is_fatal() {
    let dir = SettingsDir::new()
        .file("appsettings.json", "{}")
        .file("appsettings.Staging.json", "{ \"A\": ");
    let err = pipeline::run(dir.path(), &staging_options()).unwrap_err();
    assert!(matches!(err, config_validate::PipelineError::Document(_)));
}

#[test]
fn test_webapp_fixture() {
    let options = Options {
        environments: vec!["Production".to_string(), "Staging".to_string()],
        failure_states: FailureStates::from([Missing]),
        ..Default::default()
    };
    let summary = pipeline::run(&webapp_path(), &options).unwrap();

    let names: Vec<_> = summary.overlays.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Production", "Staging"]);

    let production = &summary.overlays[0];
    assert!(production.observed.is_empty());

    let staging = &summary.overlays[1];
    let missing: Vec<_> = staging
        .rows
        .iter()
        .filter(|r| r.classification.is_some_and(|c| c.is_missing))
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(missing, vec!["Logging:LogLevel:Microsoft.AspNetCore"]);

    let unknown: Vec<_> = staging
        .rows
        .iter()
        .filter(|r| r.classification.is_some_and(|c| c.is_unknown))
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(unknown, vec!["Features:BetaDashboard", "Cors:Origins:1"]);

    let signup = row(&staging.rows, "Features:EnableSignup").unwrap();
    assert_eq!(signup.value.as_deref(), Some("true"));
    assert_eq!(signup.display_key, "--> EnableSignup");

    assert_eq!(summary.verdict, Verdict::Failure);
}

#[test]
fn test_webapp_ignore_makes_run_pass() {
    let options = Options {
        environments: vec!["Staging".to_string()],
        failure_states: FailureStates::from([Missing, Unknown]),
        ignore_paths: vec![
            "logging:loglevel:microsoft.aspnetcore".to_string(),
            "Features:BetaDashboard".to_string(),
            "Cors:Origins:1".to_string(),
        ],
        ..Default::default()
    };
    let summary = pipeline::run(&webapp_path(), &options).unwrap();

    assert!(summary.observed.is_empty());
    assert_eq!(summary.verdict, Verdict::Success);
}
