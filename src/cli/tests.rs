//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use clap::Parser;
use std::io::Write;

const MANIFEST: &str = r#"
routes:
  - path: /
    name: home
  - path: /users/:id
    name: user
  - path: /users/*rest
    name: user-pages
  - path: /old/:id
    redirect: /users/:id
"#;

fn manifest_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(MANIFEST.as_bytes()).unwrap();
    file
}

fn run_to_json(args: &[&str]) -> serde_json::Value {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    run(&cli, &mut out).unwrap();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from(["routeway", "match", "--routes", "r.yaml", "/users/1"]).unwrap();
    match cli.command {
        Commands::Match { routes, base, path } => {
            assert_eq!(routes.to_string_lossy(), "r.yaml");
            assert!(base.is_none());
            assert_eq!(path, "/users/1");
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_navigate_requires_paths() {
    assert!(Cli::try_parse_from(["routeway", "navigate", "--routes", "r.yaml"]).is_err());
}

#[test]
fn test_resolve_command_output() {
    let cli = Cli::try_parse_from([
        "routeway",
        "resolve",
        "--base",
        "/app",
        "--from",
        "/app/users/42",
        "..",
    ])
    .unwrap();
    let mut out = Vec::new();
    run(&cli, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/app/users\n");

    let cli = Cli::try_parse_from(["routeway", "resolve", "--no-resolve", "/other"]).unwrap();
    let mut out = Vec::new();
    run(&cli, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/other\n");
}

#[test]
fn test_resolve_command_rejects_urls() {
    let cli = Cli::try_parse_from(["routeway", "resolve", "https://example.com"]).unwrap();
    let mut out = Vec::new();
    let err = run(&cli, &mut out).unwrap_err();
    assert!(err.to_string().contains("not a routable path"));
}

#[test]
fn test_branches_command_ranks() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let report = run_to_json(&["routeway", "branches", "--routes", path]);
    let first = &report[0];
    assert_eq!(first["patterns"][0], "/users/:id");
    assert_eq!(report.as_array().unwrap().len(), 4);
}

#[test]
fn test_match_command_trace() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let report = run_to_json(&["routeway", "match", "--routes", path, "/users/42/edit"]);
    assert_eq!(report["pathname"], "/users/42/edit");
    assert_eq!(report["matches"][0]["pattern"], "/users/*rest");
    assert_eq!(report["matches"][0]["params"]["rest"], "42/edit");
    assert_eq!(report["rendered"], "user-pages");
}

#[test]
fn test_match_command_follows_redirect() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let report = run_to_json(&["routeway", "match", "--routes", path, "/old/7"]);
    assert_eq!(report["pathname"], "/users/7");
    assert_eq!(report["redirected_to"], "/users/7");
    assert_eq!(report["rendered"], "user");
}
