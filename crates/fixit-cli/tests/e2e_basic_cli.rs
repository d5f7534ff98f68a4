//! E2E tests for the `fixit` binary.
//!
//! Each test runs the real binary in a sandboxed HOME. Commands that talk
//! to the service point `--api-url` at an in-process [`common::Responder`].

mod common;

use common::{Responder, Sandbox};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

const REPORTS: &str = r#"[
  {"id":3,"title":"Pothole on Elm","description":"Deep","status":"in_progress",
   "category":"Roads","priority":"High","ai_summary":"Road damage","suspicious_flag":false,
   "user_id":2,"photo_url":null}
]"#;

// ─── Surface ───────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("login"))
        .stdout(contains("reports"))
        .stdout(contains("status"))
        .stdout(contains("create"));
}

#[test]
fn version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_status_value_is_a_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["status", "1", "done"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}

// ─── Configuration ─────────────────────────────────────────────────

#[test]
fn config_show_reflects_cli_override() {
    Sandbox::new()
        .cmd()
        .args(["--api-url", "https://fixit.example", "config", "show"])
        .assert()
        .success()
        .stdout(contains("base_url = \"https://fixit.example\""));
}

#[test]
fn config_show_reflects_env() {
    Sandbox::new()
        .cmd()
        .env("FIXIT_TIMEOUT_SECS", "9")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("timeout_secs = 9"));
}

#[test]
fn project_config_is_loaded() {
    let sandbox = Sandbox::new();
    let project = sandbox.path().join("proj");
    std::fs::create_dir_all(project.join(".fixit")).unwrap();
    std::fs::write(
        project.join(".fixit/config.toml"),
        "[api]\nbase_url = \"https://project.example\"\n",
    )
    .unwrap();

    sandbox
        .cmd()
        .arg("-C")
        .arg(&project)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("https://project.example"));
}

#[test]
fn bad_api_url_fails() {
    Sandbox::new()
        .cmd()
        .args(["--api-url", "localhost:8000", "reports"])
        .assert()
        .failure()
        .stderr(contains("Config error"));
}

#[test]
fn bad_env_value_fails() {
    Sandbox::new()
        .cmd()
        .env("FIXIT_TIMEOUT_SECS", "soon")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(contains("FIXIT_TIMEOUT_SECS"));
}

// ─── Local refusals ────────────────────────────────────────────────

#[test]
fn reports_when_logged_out() {
    Sandbox::new()
        .cmd()
        .arg("reports")
        .assert()
        .failure()
        .stderr(contains("not logged in"));
}

#[test]
fn unsupported_photo_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    sandbox
        .cmd()
        .args(["create", "--title", "t", "--description", "d", "--photo", "x.bmp"])
        .assert()
        .failure()
        .stderr(contains("unsupported photo type"));
    assert_eq!(sandbox.stored_token().as_deref(), Some("tok"));
}

#[test]
fn register_with_mismatched_confirmation_is_refused() {
    let sandbox = Sandbox::new();
    let server = Responder::start(&[("POST /users/register", 200, r#"{"id":1}"#)]);

    sandbox
        .cmd()
        .args([
            "--api-url",
            server.url(),
            "register",
            "--email",
            "new@city.gov",
            "--password",
            "secret1",
            "--confirm-password",
            "secret2",
        ])
        .assert()
        .failure()
        .stderr(contains("Passwords do not match"));

    assert!(server.seen().is_empty());
}

#[test]
fn logout_removes_stored_credential() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    sandbox
        .cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Logged out"));
    assert!(!sandbox.credential_path().exists());
}

// ─── Against a responder ───────────────────────────────────────────

#[test]
fn unreachable_service_keeps_credential() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    sandbox
        .cmd()
        .args(["--api-url", "http://127.0.0.1:9", "reports"])
        .assert()
        .failure()
        .stderr(contains("request failed"));
    assert_eq!(sandbox.stored_token().as_deref(), Some("tok"));
}

#[test]
fn login_stores_token() {
    let sandbox = Sandbox::new();
    let server = Responder::start(&[(
        "POST /users/login",
        200,
        r#"{"access_token":"e2e-token","token_type":"bearer"}"#,
    )]);

    sandbox
        .cmd()
        .args(["--api-url", server.url(), "login", "--email", "op@city.gov"])
        .env("FIXIT_PASSWORD", "hunter22")
        .assert()
        .success()
        .stdout(contains("Logged in as op@city.gov"));

    assert_eq!(sandbox.stored_token().as_deref(), Some("e2e-token"));
    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].body, "username=op%40city.gov&password=hunter22");
}

#[test]
fn reports_render_for_admin() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    let server = Responder::start(&[
        ("GET /reports/", 200, REPORTS),
        ("GET /reports/admin/all", 200, "[]"),
    ]);

    sandbox
        .cmd()
        .args(["--api-url", server.url(), "reports"])
        .assert()
        .success()
        .stdout(contains("Reports (1) [Admin]"))
        .stdout(contains("Pothole on Elm"))
        .stdout(contains("In Progress"));

    assert!(server
        .seen()
        .iter()
        .all(|s| s.authorization.as_deref() == Some("Bearer tok")));
}

#[test]
fn expired_session_removes_credential() {
    let sandbox = Sandbox::new();
    sandbox.store_token("stale");
    let server = Responder::start(&[
        (
            "GET /reports/",
            401,
            r#"{"detail":"Could not validate credentials"}"#,
        ),
        ("GET /reports/admin/all", 401, r#"{"detail":"expired"}"#),
    ]);

    sandbox
        .cmd()
        .args(["--api-url", server.url(), "reports"])
        .assert()
        .failure()
        .stderr(contains("session expired, please log in again"));

    assert!(!sandbox.credential_path().exists());
}

#[test]
fn status_change_refused_for_standard_role() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    let server = Responder::start(&[
        ("GET /reports/", 200, REPORTS),
        (
            "GET /reports/admin/all",
            403,
            r#"{"detail":"Not enough permissions"}"#,
        ),
    ]);

    sandbox
        .cmd()
        .args(["--api-url", server.url(), "status", "3", "resolved"])
        .assert()
        .failure()
        .stderr(contains("elevated session"));

    assert!(!server.seen().iter().any(|s| s.method == "PUT"));
}

#[test]
fn status_change_as_admin() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    let server = Responder::start(&[
        ("GET /reports/", 200, REPORTS),
        ("GET /reports/admin/all", 200, "[]"),
        ("PUT /reports/3/status", 200, r#"{"message":"Status updated"}"#),
    ]);

    sandbox
        .cmd()
        .args(["--api-url", server.url(), "status", "3", "resolved"])
        .assert()
        .success()
        .stdout(contains("Report #3 is now Resolved"));

    let put = server
        .seen()
        .into_iter()
        .find(|s| s.method == "PUT")
        .expect("status request sent");
    assert_eq!(put.body, r#"{"status":"resolved"}"#);
}

#[test]
fn create_prints_triage() {
    let sandbox = Sandbox::new();
    sandbox.store_token("tok");
    let server = Responder::start(&[(
        "POST /reports/",
        200,
        r#"{"id":11,"title":"Leak","description":"Hydrant","status":"pending",
           "category":"Water","priority":"High","ai_summary":"Hydrant leak",
           "suspicious_flag":false,"user_id":2,"photo_url":null}"#,
    )]);

    sandbox
        .cmd()
        .args([
            "--api-url",
            server.url(),
            "create",
            "--title",
            "Leak",
            "--description",
            "Hydrant",
        ])
        .assert()
        .success()
        .stdout(contains("Report #11 submitted"))
        .stdout(contains("Category:   Water").and(contains("Suspicious: no")));
}

#[test]
fn password_request_prints_token() {
    let sandbox = Sandbox::new();
    let server = Responder::start(&[(
        "POST /users/forgot-password",
        200,
        r#"{"message":"Reset token generated","reset_token":"rst-9","expires_in_minutes":15}"#,
    )]);

    sandbox
        .cmd()
        .args([
            "--api-url",
            server.url(),
            "password",
            "request",
            "--email",
            "a@b.c",
        ])
        .assert()
        .success()
        .stdout(contains("Reset token: rst-9"));
}
