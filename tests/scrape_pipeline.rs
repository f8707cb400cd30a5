use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use fs25docs::config::DEFAULT_USER_AGENT;
use fs25docs::formats::{Manifest, Version};
use predicates::prelude::*;

const DOCS_PATH: &str = "/documentation_scripting_fs25.php";

const ROOT_HTML: &str = r#"<!doctype html>
<html>
  <head><title>Docs</title></head>
  <body>
    <div style="width:200px; float:left;">
      <h3 class="version">Script Documentation</h3>
      <ul>
        <li><a href="documentation_scripting_fs25.php?version=script&category=12&class=Vehicle">Vehicle Classes</a></li>
      </ul>
      <h3 class="version">Engine Documentation</h3>
      <ul></ul>
    </div>
    <div id="box5"><div class="entry"><div>nav</div><div><p>Welcome</p></div></div></div>
  </body>
</html>
"#;

const CATEGORY_HTML: &str = r#"<!doctype html>
<html>
  <body>
    <div style="width:200px; float:left;">
      <h3 class="version">Script Documentation</h3>
      <ul>
        <li class="selected"><a href="documentation_scripting_fs25.php?version=script&category=12&class=Vehicle">Vehicle Classes</a>
          <ul>
            <li><a href="documentation_scripting_fs25.php?version=script&category=12&class=Wheels">Wheels</a></li>
            <li><a href="documentation_scripting_fs25.php?version=script&category=12&class=Motorized">Motorized</a></li>
            <li><a href="documentation_scripting_fs25.php?version=script&category=12&class=Broken">Broken</a></li>
          </ul>
        </li>
      </ul>
    </div>
  </body>
</html>
"#;

const LEAF_HTML: &str = r#"<!doctype html>
<html>
  <body>
    <div id="box5">
      <div class="entry">
        <div><a href="?version=script">Back to index</a></div>
        <div><h2>Overview</h2><p>Hello</p></div>
      </div>
    </div>
  </body>
</html>
"#;

#[derive(Debug, Clone)]
struct SeenRequest {
    url: String,
    user_agent: String,
    at: Instant,
}

type RequestLog = Arc<Mutex<Vec<SeenRequest>>>;

fn spawn_docs_server() -> (
    String,
    RequestLog,
    mpsc::Sender<()>,
    thread::JoinHandle<()>,
) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let addr = server.server_addr();
    let base_url = format!("http://{addr}{DOCS_PATH}");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let url = request.url().to_string();
            let user_agent = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("User-Agent"))
                .map(|h| h.value.as_str().to_owned())
                .unwrap_or_default();
            seen.lock().expect("lock request log").push(SeenRequest {
                url: url.clone(),
                user_agent,
                at: Instant::now(),
            });

            let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
            let (status, body) = if path != DOCS_PATH {
                (404, "not found")
            } else if query.is_empty() {
                (200, ROOT_HTML)
            } else if query.contains("class=Vehicle") {
                (200, CATEGORY_HTML)
            } else if query.contains("class=Wheels") || query.contains("class=Motorized") {
                (200, LEAF_HTML)
            } else if query.contains("class=Broken") {
                (500, "internal error")
            } else {
                (404, "not found")
            };

            let mut response = tiny_http::Response::from_string(body).with_status_code(status);
            if status == 200 {
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/html; charset=utf-8"[..],
                )
                .expect("build header");
                response = response.with_header(header);
            }
            let _ = request.respond(response);
        }
    });

    (base_url, requests, shutdown_tx, handle)
}

fn scraper_cmd(base_url: &str, out_dir: &Path, delay_ms: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fs25docs");
    cmd.env_remove("FS25DOCS_USER_AGENT").args([
        "--base-url",
        base_url,
        "--out",
        out_dir.to_str().unwrap(),
        "--delay-ms",
        delay_ms,
        "--timeout-secs",
        "5",
    ]);
    cmd
}

fn run_scraper(base_url: &str, out_dir: &Path) -> assert_cmd::assert::Assert {
    scraper_cmd(base_url, out_dir, "0").assert()
}

fn logged_requests(requests: &RequestLog) -> Vec<SeenRequest> {
    requests.lock().expect("lock request log").clone()
}

fn read_manifest(out_dir: &Path) -> anyhow::Result<Manifest> {
    let json = fs::read_to_string(out_dir.join("manifest.json"))?;
    Ok(serde_json::from_str(&json)?)
}

#[test]
fn scrape_writes_documents_manifest_and_index() -> anyhow::Result<()> {
    let (base_url, requests, shutdown_tx, server_handle) = spawn_docs_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("output");

    run_scraper(&base_url, &out_dir)
        .success()
        .stdout(predicate::str::contains("Successfully scraped: 2"))
        .stdout(predicate::str::contains("Failed: 1"));

    let category_dir = out_dir.join("script").join("Vehicle_Classes");
    let wheels = fs::read_to_string(category_dir.join("Wheels.md"))?;
    assert!(wheels.starts_with(
        "# Wheels\n\n**Category:** Vehicle Classes\n**Version:** script\n\n---\n\n"
    ));
    assert!(wheels.contains("Hello"));
    assert!(!wheels.contains("Back to index"));
    assert!(category_dir.join("Motorized.md").exists());
    assert!(!category_dir.join("Broken.md").exists());

    let manifest = read_manifest(&out_dir)?;
    assert_eq!(manifest.metadata.total_files, 2);
    assert_eq!(manifest.metadata.source_url, base_url);
    assert!(manifest.metadata.generated_at.is_some());
    let items = &manifest.versions[&Version::Script].categories["Vehicle Classes"].items;
    assert_eq!(items.len(), 2);

    let index = fs::read_to_string(out_dir.join("INDEX.md"))?;
    assert!(index.contains("**Total Files:** 2"));
    assert!(index.contains("- [SCRIPT](#script)"));
    assert!(index.contains(
        "### Vehicle Classes (2 items)\n\n\
- [Motorized](script/Vehicle_Classes/Motorized.md)\n\
- [Wheels](script/Vehicle_Classes/Wheels.md)\n"
    ));

    let logged = logged_requests(&requests);
    assert_eq!(logged.len(), 5, "root, category and three leaves: {logged:?}");
    assert!(logged.iter().any(|r| r.url.contains("version=script")
        && r.url.contains("category=12")
        && r.url.contains("class=Wheels")));
    assert!(logged.iter().all(|r| r.user_agent == DEFAULT_USER_AGENT));

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn rerun_skips_documents_already_on_disk() -> anyhow::Result<()> {
    let (base_url, requests, shutdown_tx, server_handle) = spawn_docs_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("output");

    run_scraper(&base_url, &out_dir).success();
    requests.lock().expect("lock request log").clear();

    run_scraper(&base_url, &out_dir)
        .success()
        .stdout(predicate::str::contains("Already exists: Wheels"))
        .stdout(predicate::str::contains("Already exists: Motorized"))
        .stdout(predicate::str::contains("Already present: 2"));

    let logged = logged_requests(&requests);
    assert!(
        !logged
            .iter()
            .any(|r| r.url.contains("class=Wheels") || r.url.contains("class=Motorized")),
        "leaf pages must not be fetched again: {logged:?}"
    );

    let manifest = read_manifest(&out_dir)?;
    assert_eq!(manifest.metadata.total_files, 0);

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn user_agent_can_be_overridden_from_env() -> anyhow::Result<()> {
    let (base_url, requests, shutdown_tx, server_handle) = spawn_docs_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("output");

    scraper_cmd(&base_url, &out_dir, "0")
        .env("FS25DOCS_USER_AGENT", "fs25docs-test/1.0")
        .assert()
        .success();

    let logged = logged_requests(&requests);
    assert!(!logged.is_empty());
    assert!(
        logged.iter().all(|r| r.user_agent == "fs25docs-test/1.0"),
        "{logged:?}"
    );

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn delay_ms_spaces_out_every_request() -> anyhow::Result<()> {
    let (base_url, requests, shutdown_tx, server_handle) = spawn_docs_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("output");
    let delay = Duration::from_millis(150);

    scraper_cmd(&base_url, &out_dir, "150")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed: 1"));

    let logged = logged_requests(&requests);
    assert_eq!(logged.len(), 5);
    for pair in logged.windows(2) {
        let gap = pair[1].at.duration_since(pair[0].at);
        assert!(gap >= delay, "requests only {gap:?} apart: {pair:?}");
    }

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn unreachable_root_page_fails_the_run() -> anyhow::Result<()> {
    let (base_url, _requests, shutdown_tx, server_handle) = spawn_docs_server();
    let temp = tempfile::TempDir::new()?;
    let out_dir = temp.path().join("output");
    let missing = base_url.replace(DOCS_PATH, "/missing.php");

    run_scraper(&missing, &out_dir)
        .failure()
        .stderr(predicate::str::contains("failed to fetch main documentation page"));
    assert!(!out_dir.join("manifest.json").exists());

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn rust_log_debug_emits_parsed_cli_to_stderr() {
    let (base_url, _requests, shutdown_tx, server_handle) = spawn_docs_server();
    let temp = tempfile::TempDir::new().expect("create temp dir");
    let out_dir = temp.path().join("output");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fs25docs");
    cmd.env("RUST_LOG", "debug")
        .args([
            "--base-url",
            &base_url,
            "--out",
            out_dir.to_str().unwrap(),
            "--delay-ms",
            "0",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
}
