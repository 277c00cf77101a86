use std::fs;

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn status_when_never_started() {
    let env = TestEnv::new();
    env.init_project();

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("is stopped"))
        .stdout(predicate::str::contains("port: 3000"))
        .stdout(predicate::str::contains("global install"));
}

#[test]
fn stop_when_not_running() {
    let env = TestEnv::new();
    env.init_project();

    env.cmd()
        .arg("stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("is not running"));
}

#[test]
fn stale_pid_file_is_reported_and_cleared() {
    let env = TestEnv::new();
    env.init_project();
    let pid_file = env.agc_dir().join("mcp-server.pid");
    fs::write(&pid_file, "999999999\n").unwrap();

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("PID file exists but process is not running"));

    env.cmd()
        .arg("stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed stale PID file"));
    assert!(!pid_file.exists());
}

#[test]
fn corrupt_pid_file_counts_as_stale() {
    let env = TestEnv::new();
    env.init_project();
    fs::write(env.agc_dir().join("mcp-server.pid"), "not a pid").unwrap();

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("PID file is unreadable"));
}

#[cfg(unix)]
#[test]
fn start_status_stop() {
    let env = TestEnv::new();
    env.init_project();
    env.cmd()
        .args(["config", "set", "port", "0"])
        .assert()
        .success();

    env.cmd()
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("AgCel MCP server started (PID:"));
    let pid_file = env.agc_dir().join("mcp-server.pid");
    let pid = fs::read_to_string(&pid_file).unwrap();

    env.cmd()
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("already running"));

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("is running"))
        .stdout(predicate::str::contains(format!("PID: {}", pid.trim())));

    env.cmd()
        .arg("restart")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopped AgCel MCP server"))
        .stdout(predicate::str::contains("AgCel MCP server started"));

    env.cmd()
        .arg("stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopped AgCel MCP server"));
    assert!(!pid_file.exists());
    assert!(env.agc_dir().join("server.log").exists());
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn post_without_session(port: u16) -> Option<String> {
    use std::io::{Read, Write};

    let mut stream = std::net::TcpStream::connect(("127.0.0.1", port)).ok()?;
    stream
        .set_read_timeout(Some(std::time::Duration::from_secs(2)))
        .ok()?;
    let body = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0.0.0"}}}"#;
    let request = format!(
        "POST /message HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).ok()?;
    let mut response = String::new();
    stream.read_to_string(&mut response).ok()?;
    Some(response)
}

/// Poll until the SSE endpoint on `port` answers as an AgCel server.
fn wait_for_server(port: u16) {
    for _ in 0..100 {
        if post_without_session(port).is_some_and(|r| r.contains("Session not found")) {
            return;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
    panic!("no AgCel server answered on port {port}");
}

#[cfg(unix)]
#[test]
fn restart_serves_configured_port() {
    let env = TestEnv::new();
    env.init_project();
    let port = free_port();
    env.cmd()
        .args(["config", "set", "port", &port.to_string()])
        .assert()
        .success();

    env.cmd()
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("http://localhost:{port}/sse")));
    wait_for_server(port);
    let pid_file = env.agc_dir().join("mcp-server.pid");
    let first = fs::read_to_string(&pid_file).unwrap();

    env.cmd().arg("restart").assert().success();
    let second = fs::read_to_string(&pid_file).unwrap();
    assert_ne!(first.trim(), second.trim());
    wait_for_server(port);

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("PID: {}", second.trim())))
        .stdout(predicate::str::contains(format!("port: {port}")));

    env.cmd().arg("stop").assert().success();

    // logs are plain text when stderr is redirected to a file
    let log = fs::read_to_string(env.agc_dir().join("server.log")).unwrap();
    assert!(log.contains("running on SSE"), "{log}");
    assert!(!log.contains('\u{1b}'), "{log}");
}
