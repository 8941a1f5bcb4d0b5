//! Tests for the console binary's argument parsing and offline commands.

mod common;

use std::process::Command;

fn folio_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
    cmd.env_remove("FOLIO_API_URL").env_remove("FOLIO_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let output = folio_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "logout", "projects", "contact", "delete-project", "theme"] {
        assert!(stdout.contains(command), "missing {}", command);
    }
}

#[test]
fn test_missing_subcommand_fails() {
    let output = folio_cmd().output().expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let (dir, config) = common::temp_config("");
    let output = folio_cmd()
        .arg("--config")
        .arg(&config)
        .arg("--api-url")
        .arg("not a url")
        .arg("projects")
        .current_dir(dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid API base URL"));
}

#[test]
fn test_theme_toggle_persists() {
    let storage = tempfile::TempDir::new().unwrap();
    let (_dir, config) = common::temp_config(&format!(
        "[storage]\ndir = {:?}\n",
        storage.path().display().to_string()
    ));

    let run = |args: &[&str]| {
        let output = folio_cmd()
            .arg("--config")
            .arg(&config)
            .args(args)
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    };

    assert_eq!(run(&["theme"]), "light");
    assert_eq!(run(&["theme", "toggle"]), "dark");
    assert_eq!(run(&["theme"]), "dark");
}

/// Config pointing the binary at `base_url`, with storage in a temp dir.
fn backend_config(base_url: &str) -> (tempfile::TempDir, tempfile::TempDir, std::path::PathBuf) {
    let storage = tempfile::TempDir::new().unwrap();
    let (dir, config) = common::temp_config(&format!(
        "[api]\nbase_url = {:?}\n\n[storage]\ndir = {:?}\n",
        base_url,
        storage.path().display().to_string()
    ));
    (dir, storage, config)
}

async fn run_blocking(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute command"))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_save_project_update_keeps_unspecified_fields() {
    let mock = common::MockBackend::start().await;
    mock.enqueue_for(
        "GET",
        "/api/projects",
        common::MockResponse::json(common::PROJECTS_JSON),
    )
    .await;
    let (_dir, _storage, config) = backend_config(&mock.base_url());

    let mut cmd = folio_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["save-project", "--id", "1", "--title", "Folio renamed"]);
    let output = run_blocking(cmd).await;
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let puts = mock.requests_to("PUT", "/api/projects/1").await;
    assert_eq!(puts.len(), 1);
    assert_eq!(
        puts[0].body_json(),
        serde_json::json!({
            "title": "Folio renamed",
            "description": "Portfolio",
            "live_url": "https://folio.dev",
            "tech_stack": ["Rust", "tokio"],
            "image_url": "/uploads/folio.png"
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_save_project_unknown_id_sends_nothing() {
    let mock = common::MockBackend::start().await;
    mock.enqueue_for(
        "GET",
        "/api/projects",
        common::MockResponse::json(common::PROJECTS_JSON),
    )
    .await;
    let (_dir, _storage, config) = backend_config(&mock.base_url());

    let mut cmd = folio_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["save-project", "--id", "99", "--title", "Ghost"]);
    let output = run_blocking(cmd).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No project with id 99"));
    assert!(mock.requests_to("PUT", "/api/projects/99").await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_save_project_create_requires_title() {
    let mock = common::MockBackend::start().await;
    let (_dir, _storage, config) = backend_config(&mock.base_url());

    let mut cmd = folio_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["save-project", "--description", "No title"]);
    let output = run_blocking(cmd).await;

    assert!(!output.status.success());
    assert!(mock.captured_requests().await.is_empty());
}
