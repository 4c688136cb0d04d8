use super::run::status_lines;
use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use webdiff_core::error::{ConfigurationError, WebdiffError};
use webdiff_core::pipeline::{Environments, PreparedRun};
use webdiff_core::scenario::BackstopConfig;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_minimal() {
    let cli = parse(&[
        "webdiff",
        "--urls",
        "urls.txt",
        "--test-env",
        "http://staging.example.com",
        "--reference-env",
        "http://example.com",
    ]);
    assert_eq!(cli.urls, PathBuf::from("urls.txt"));
    assert_eq!(cli.test_env.as_deref(), Some("http://staging.example.com"));
    assert_eq!(cli.reference_env.as_deref(), Some("http://example.com"));
    assert!(!cli.skip_reference);
    assert!(!cli.skip_test);
    assert!(!cli.verbose);
    assert!(!cli.dry_run);
    assert!(cli.headers.is_none());
}

#[test]
fn cli_requires_urls() {
    assert!(Cli::try_parse_from([
        "webdiff",
        "--test-env",
        "http://t",
        "--reference-env",
        "http://r"
    ])
    .is_err());
}

#[test]
fn cli_requires_envs_unless_skipped() {
    assert!(Cli::try_parse_from(["webdiff", "--urls", "u.txt", "--test-env", "http://t"]).is_err());

    let cli = parse(&[
        "webdiff",
        "--urls",
        "u.txt",
        "--test-env",
        "http://t",
        "--skip-reference",
    ]);
    assert!(cli.skip_reference);
    assert!(cli.reference_env.is_none());

    let cli = parse(&["webdiff", "--urls", "u.txt", "--reference-env", "http://r", "--skip-test"]);
    assert!(cli.skip_test);
}

#[test]
fn cli_both_skips_parse_and_are_rejected_by_pipeline() {
    let cli = parse(&["webdiff", "--urls", "u.txt", "--skip-reference", "--skip-test"]);
    let opts = cli.run_options(&WebdiffConfig::default());
    let mut pipeline = webdiff_core::pipeline::Pipeline::new(opts);
    assert!(pipeline.resolve_environments().is_err());
}

#[test]
fn run_options_follow_flags_and_config() {
    let cli = parse(&[
        "webdiff",
        "--urls",
        "u.txt",
        "--test-env",
        "http://t",
        "--reference-env",
        "http://r",
        "--independent-phases",
        "-v",
    ]);
    let cfg = WebdiffConfig {
        label_max_len: 40,
        header_script: "setHeaders.js".to_string(),
        ..WebdiffConfig::default()
    };
    let opts = cli.run_options(&cfg);
    assert_eq!(opts.policy, PhasePolicy::Independent);
    assert!(opts.verbose);
    assert_eq!(opts.label_max_len, 40);
    assert_eq!(opts.header_script, "setHeaders.js");
}

#[test]
fn config_and_engine_overrides() {
    let cfg = WebdiffConfig::default();
    let cli = parse(&["webdiff", "--urls", "u.txt", "--test-env", "http://t", "--skip-reference"]);
    assert_eq!(cli.backstop_config_path(&cfg), PathBuf::from("backstop.json"));
    assert_eq!(cli.engine_command(&cfg), "backstop");

    let cli = parse(&[
        "webdiff",
        "--urls",
        "u.txt",
        "--test-env",
        "http://t",
        "--skip-reference",
        "--config",
        "visual/backstop.json",
        "--engine",
        "npx backstop",
        "--headers",
        "headers.json",
    ]);
    assert_eq!(cli.backstop_config_path(&cfg), PathBuf::from("visual/backstop.json"));
    assert_eq!(cli.engine_command(&cfg), "npx backstop");
    assert_eq!(cli.headers, Some(PathBuf::from("headers.json")));
}

fn path_arg(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn config_error(err: &anyhow::Error) -> &ConfigurationError {
    match err.downcast_ref::<WebdiffError>() {
        Some(WebdiffError::Configuration(e)) => e,
        other => panic!("expected configuration error, got {other:?} ({err:#})"),
    }
}

#[tokio::test]
async fn dry_run_writes_only_engine_config_to_out() {
    let dir = tempdir().unwrap();
    let urls = dir.path().join("urls.txt");
    fs::write(&urls, "http://a.com/p1\nbad-url\nhttp://b.com/p1\nhttp://a.com/p2\n").unwrap();
    let backstop = dir.path().join("backstop.json");
    fs::write(&backstop, r#"{"id": "site", "defaultScenario": {"delay": 100}}"#).unwrap();

    let cli = parse(&[
        "webdiff",
        "--urls",
        path_arg(&urls),
        "--test-env",
        "http://stage.local/x",
        "--reference-env",
        "http://prod.local",
        "--config",
        path_arg(&backstop),
        "--engine",
        "webdiff-engine-must-not-run",
        "--dry-run",
        "--verbose",
    ]);
    let mut out: Vec<u8> = Vec::new();
    run_compare(&cli, &WebdiffConfig::default(), &mut out)
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["id"], "site");
    let scenarios = value["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0]["label"], "/p1");
    assert_eq!(scenarios[0]["url"], "http://stage.local/p1");
    assert_eq!(scenarios[1]["label"], "/p1--1--");
    assert_eq!(scenarios[1]["referenceUrl"], "http://prod.local/p1");
    assert_eq!(scenarios[2]["delay"], 100);
}

#[tokio::test]
async fn missing_default_scenario_fails_before_urls_are_read() {
    let dir = tempdir().unwrap();
    let backstop = dir.path().join("backstop.json");
    fs::write(&backstop, r#"{"id": "site"}"#).unwrap();
    let missing_urls = dir.path().join("no-such-urls.txt");

    let cli = parse(&[
        "webdiff",
        "--urls",
        path_arg(&missing_urls),
        "--test-env",
        "http://stage.local",
        "--skip-reference",
        "--config",
        path_arg(&backstop),
        "--dry-run",
    ]);
    let mut out: Vec<u8> = Vec::new();
    let err = run_compare(&cli, &WebdiffConfig::default(), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(
        config_error(&err),
        ConfigurationError::MissingDefaultScenario { .. }
    ));
    assert!(out.is_empty());
}

#[tokio::test]
async fn invalid_environment_fails_before_config_is_read() {
    let dir = tempdir().unwrap();
    let cli = parse(&[
        "webdiff",
        "--urls",
        path_arg(&dir.path().join("urls.txt")),
        "--test-env",
        "not a url",
        "--skip-reference",
        "--config",
        path_arg(&dir.path().join("no-such-backstop.json")),
        "--dry-run",
    ]);
    let err = run_compare(&cli, &WebdiffConfig::default(), &mut Vec::<u8>::new())
        .await
        .unwrap_err();
    assert!(matches!(
        config_error(&err),
        ConfigurationError::InvalidEnvironment { env: "test", .. }
    ));
}

#[test]
fn status_lines_report_dropped_urls_only_when_verbose() {
    let prepared = PreparedRun {
        environments: Environments {
            reference: None,
            test: Some("http://t".to_string()),
        },
        config: BackstopConfig::from_json(r#"{"defaultScenario": {}}"#, Path::new("b.json"))
            .unwrap(),
        rejected: vec![("bad-url".to_string(), "relative URL without a base".to_string())],
    };
    assert_eq!(
        status_lines(&prepared, true),
        ["Removing invalid URL: \"bad-url\"", "Generated 0 scenario(s)."]
    );
    assert_eq!(status_lines(&prepared, false), ["Generated 0 scenario(s)."]);
}
