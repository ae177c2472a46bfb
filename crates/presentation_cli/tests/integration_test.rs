//! Integration tests for the CLI binary
//!
//! Each test runs `weatherbot-cli` as a child process against a temporary
//! database, configured through `WEATHERBOT_*` environment variables.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{path::Path, process::Output};

use tokio::process::Command;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

async fn run(db: &Path, base_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weatherbot-cli"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("WEATHERBOT_USER")
        .env("WEATHERBOT_WEATHER__API_KEY", "test-key")
        .env("WEATHERBOT_WEATHER__BASE_URL", base_url)
        .env("WEATHERBOT_DATABASE__PATH", db.join("cli.db"))
        .env("WEATHERBOT_TELEMETRY__LOG_FILTER", "warn")
        .output()
        .await
        .expect("Failed to run weatherbot-cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "Vienna", "country": "Austria", "localtime": "2024-02-01 09:00" },
        "current": {
            "last_updated": "2024-02-01 09:00",
            "temp_c": -2.0,
            "feelslike_c": -6.0,
            "humidity": 85,
            "wind_kph": 18.0,
            "wind_degree": 315,
            "condition": { "text": "Light snow" }
        },
        "forecast": { "forecastday": [] }
    })
}

#[tokio::test]
async fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "http://127.0.0.1:9", &["--help"]).await;

    assert!(output.status.success());
    let help = stdout(&output);
    for command in ["current", "forecast", "prefs", "cleanup", "serve-maintenance"] {
        assert!(help.contains(command), "missing {command} in help");
    }
}

#[tokio::test]
async fn preferences_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let base = "http://127.0.0.1:9";

    let set = run(dir.path(), base, &["--user", "7", "prefs", "set-language", "de"]).await;
    assert!(set.status.success());
    assert!(stdout(&set).contains("Deutsch"));

    let units = run(
        dir.path(),
        base,
        &["--user", "7", "prefs", "set-units", "--temperature", "fahrenheit", "--wind", "mph"],
    )
    .await;
    assert!(units.status.success());
    assert!(stdout(&units).contains("Einheiten"));

    let show = run(dir.path(), base, &["--user", "7", "prefs", "show"]).await;
    let shown = stdout(&show);
    assert!(shown.contains("Language: de"), "{shown}");
    assert!(shown.contains("Temperature: fahrenheit"), "{shown}");
    assert!(shown.contains("Wind: mph"), "{shown}");
}

#[tokio::test]
async fn unsupported_language_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "http://127.0.0.1:9", &["prefs", "set-language", "tlh"]).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported language"));
}

#[tokio::test(flavor = "multi_thread")]
async fn current_is_rendered_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Vienna"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let first = run(dir.path(), &server.uri(), &["current", "Vienna"]).await;
    let second = run(dir.path(), &server.uri(), &["current", "vienna"]).await;

    assert!(first.status.success());
    let card = stdout(&first);
    assert!(card.contains("Current Weather"), "{card}");
    assert!(card.contains("Vienna, Austria"), "{card}");
    assert!(!card.contains("<b>"), "{card}");
    assert_eq!(stdout(&second), card);

    let stats = run(dir.path(), &server.uri(), &["stats"]).await;
    assert!(stdout(&stats).contains("Total: 2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn provider_errors_are_rendered_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &server.uri(), &["--lang", "es", "current", "Nowhere"]).await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Ocurrió un error"));
}

#[tokio::test]
async fn malformed_action_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "http://127.0.0.1:9", &["action", "bogus"]).await;

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Invalid request");
}

#[tokio::test]
async fn cleanup_on_empty_database_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "http://127.0.0.1:9", &["cleanup"]).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Cache maintenance completed"));
}
