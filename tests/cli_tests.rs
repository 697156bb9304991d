//! Tests for the studio-api binary: output, exit codes, and config errors.

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;
use tokio::net::TcpListener;

/// Start a stub studio answering every request with `status` and JSON `body`.
async fn start_stub(status: StatusCode, body: Value) -> SocketAddr {
    let body = body.to_string();
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, [(header::CONTENT_TYPE, "application/json")], body).into_response() }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// An address nothing is listening on.
fn unreachable_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Run studio-api in `dir` with no studio settings inherited from the environment.
async fn run_cli(dir: &Path, args: &[&str]) -> Output {
    let dir = dir.to_path_buf();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_studio-api"))
            .args(&args)
            .current_dir(&dir)
            .env_remove("STUDIO_ADDRESS")
            .env_remove("STUDIO_PSDEVSLNSYS")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run studio-api")
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_unreachable_prints_no_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let address = format!("http://{}", unreachable_addr());

    let output = run_cli(
        dir.path(),
        &["--studio-address", &address, "--session", "sys-1", "tasks"],
    )
    .await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No running tasks"),
        "unexpected stdout: {}",
        stdout
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_strict_tasks_unreachable_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let address = format!("http://{}", unreachable_addr());

    let output = run_cli(
        dir.path(),
        &[
            "--studio-address",
            &address,
            "--session",
            "sys-1",
            "--strict",
            "tasks",
        ],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("No running tasks"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_studio_address_exits_2() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(dir.path(), &["--session", "sys-1", "tasks"]).await;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing required setting: studio_address"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(output.stdout.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_refresh_cache() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_stub(StatusCode::OK, json!({"pssysappid": "x1"})).await;
    let address = format!("http://{}", addr);

    let output = run_cli(
        dir.path(),
        &[
            "--studio-address",
            &address,
            "--session",
            "sys-1",
            "--json",
            "refresh-cache",
            "app1",
        ],
    )
    .await;

    assert_eq!(output.status.code(), Some(0));
    let printed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({"app": "app1", "refreshed": true}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_from_discovered_config() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_stub(
        StatusCode::OK,
        json!([{"pssysdevbktaskid": "t-1", "pssysdevbktaskname": "publish", "taskstate": 20}]),
    )
    .await;
    std::fs::write(
        dir.path().join("studio.json"),
        json!({"studio_address": format!("http://{}", addr), "psdevslnsys": "sys-1"}).to_string(),
    )
    .unwrap();

    let output = run_cli(dir.path(), &["tasks"]).await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 running task(s):"), "unexpected stdout: {}", stdout);
    assert!(stdout.contains("t-1  publish  [state 20]"));
}
