//! Shared E2E test helpers for `fixit` binary tests.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default timeout for basic CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Variables the binary reads; removed so the host environment can't leak in.
const FIXIT_VARS: &[&str] = &[
    "FIXIT_DEBUG",
    "FIXIT_VERBOSE",
    "FIXIT_COLOR",
    "FIXIT_API_URL",
    "FIXIT_TIMEOUT_SECS",
    "FIXIT_CREDENTIAL_PATH",
    "FIXIT_LOG_FILE",
    "FIXIT_LOG_LEVEL",
    "FIXIT_PASSWORD",
    "FIXIT_CONFIRM_PASSWORD",
    "FIXIT_NEW_PASSWORD",
    "RUST_LOG",
];

/// Isolated home directory for one test.
///
/// Global config, project config and the credential file all resolve
/// inside it.
pub struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create sandbox home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn credential_path(&self) -> PathBuf {
        self.path().join(".fixit").join("credential.json")
    }

    /// Writes a stored credential the way a previous `login` would.
    pub fn store_token(&self, token: &str) {
        let path = self.credential_path();
        std::fs::create_dir_all(path.parent().expect("credential dir")).expect("mkdir");
        let content = serde_json::json!({
            "version": 1,
            "access_token": token,
            "saved_at": "2026-01-01T00:00:00Z",
        });
        std::fs::write(&path, content.to_string()).expect("write credential");
    }

    pub fn stored_token(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.credential_path()).ok()?;
        let value: serde_json::Value = serde_json::from_str(&raw).expect("credential json");
        value["access_token"].as_str().map(str::to_string)
    }

    /// Builds a `fixit` command running inside this sandbox.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("fixit");
        cmd.timeout(TIMEOUT_BASIC);
        for var in FIXIT_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.path()).current_dir(self.path());
        cmd
    }
}

/// One request seen by a [`Responder`].
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Canned HTTP server on a background thread.
///
/// Routes are keyed by `"METHOD /path"`; anything else gets a 404.
pub struct Responder {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Responder {
    pub fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind responder");
        let base_url = format!("http://{}", listener.local_addr().expect("addr"));
        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(key, status, body)| ((*key).to_string(), (*status, (*body).to_string())))
            .collect();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let Some(request) = read_request(&mut stream) else {
                    continue;
                };
                let key = format!("{} {}", request.method, request.path);
                let (status, body) = routes
                    .get(&key)
                    .cloned()
                    .unwrap_or((404, r#"{"detail":"Not Found"}"#.to_string()));
                log.lock().expect("seen lock").push(request);
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self { base_url, seen }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().expect("seen lock").clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Seen> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let content_length: usize = header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(Seen {
        method,
        path,
        authorization: header("authorization"),
        body: String::from_utf8_lossy(&buf[head_end..]).into_owned(),
    })
}
