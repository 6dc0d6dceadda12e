//! End-to-end tests for the command-line front end.

use std::fs;
use std::path::Path;

use clap::Parser;
use templify_cli::{cli::Cli, execute};

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("templify").chain(args.iter().copied()))?;
    execute(&cli.command)
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_render_text_with_json_context() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = write(dir.path(), "ctx.json", r#"{"user": {"name": "Alice"}}"#);

    let out = run(&["render-text", "Hello {user.name}!", "--context", &ctx]).unwrap();
    assert_eq!(out, "Hello Alice!\n");
}

#[test]
fn test_render_text_keeps_missing_by_default() {
    let out = run(&["render-text", "Hello {user.name}!"]).unwrap();
    assert_eq!(out, "Hello {user.name}!\n");
}

#[test]
fn test_render_text_default_policy() {
    let out = run(&["render-text", "count={items_num}", "--missing", "default"]).unwrap();
    assert_eq!(out, "count=0\n");
}

#[test]
fn test_render_text_raise_policy_fails() {
    let err = run(&["render-text", "{user.name}", "--missing", "raise"]).unwrap_err();
    assert!(format!("{err:#}").contains("user.name"));
}

#[test]
fn test_render_text_with_query() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = write(
        dir.path(),
        "ctx.yaml",
        "items:\n  - name: a\n    price: 3\n  - name: b\n    price: 7\n",
    );

    let out = run(&[
        "render-text",
        "{{ items | jmespath('max_by(@, &price).name') }}",
        "--context",
        &ctx,
    ])
    .unwrap();
    assert_eq!(out, "b\n");
}

#[test]
fn test_render_data_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = write(dir.path(), "ctx.json", r#"{"name": "Alice", "tags": ["x", "y"]}"#);
    let data = write(
        dir.path(),
        "data.yaml",
        "greeting: Hello {name}\ntags: '{tags}'\ncount: 3\n",
    );

    let out = run(&[
        "render-data",
        &data,
        "--context",
        &ctx,
        "--format",
        "yaml",
    ])
    .unwrap();

    let rendered: serde_json::Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(
        rendered,
        serde_json::json!({"greeting": "Hello Alice", "tags": ["x", "y"], "count": 3})
    );
}

#[test]
fn test_render_jinja_file() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = write(dir.path(), "ctx.json", r#"{"items": ["a", "b"]}"#);
    let template = write(
        dir.path(),
        "list.j2",
        "{% for item in items %}- {{ item }}\n{% endfor %}",
    );

    let out = run(&["render-jinja", &template, "--context", &ctx]).unwrap();
    assert_eq!(out, "- a\n- b\n");
}

#[test]
fn test_missing_context_file_reports_path() {
    let err = run(&["render-text", "x", "--context", "/nonexistent/ctx.json"]).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/ctx.json"));
}
