//! Process-level tests of the `app-server` binary.

use std::io::Write;
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};

fn app_server() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_app-server"));
    cmd.env_remove("RUST_LOG")
        .env_remove("APP_CONFIG")
        .env_remove("APP_PROFILE")
        .env_remove("APP_LOG_LEVEL")
        .env("APP_HOST", "127.0.0.1")
        .stdin(Stdio::null());
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn occupied_port_exits_non_zero() {
    let holder = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = holder.local_addr().unwrap().port();

    let output = app_server()
        .env("APP_PORT", port.to_string())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("port already in use"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn malformed_config_exits_non_zero() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nport = ").unwrap();

    let output = app_server()
        .arg("--config")
        .arg(file.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("configuration error"));
}

#[test]
fn missing_config_file_exits_non_zero() {
    let output = app_server()
        .args(["--config", "/nonexistent/application.toml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot read"));
}

#[test]
fn invalid_profile_exits_non_zero() {
    let output = app_server()
        .env("APP_PORT", "0")
        .env("APP_PROFILE", "no spaces allowed")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("profile"));
}

#[cfg(unix)]
#[test]
fn sigterm_shuts_down_cleanly() {
    use std::time::{Duration, Instant};

    let port = {
        let spare = TcpListener::bind("127.0.0.1:0").unwrap();
        spare.local_addr().unwrap().port()
    };

    let mut child = app_server()
        .env("APP_PORT", port.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while std::net::TcpStream::connect(("127.0.0.1", port)).is_err() {
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("server never started listening");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    // Signal immediately: handlers are in place before the port opens.
    let killed = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let status = child.wait().unwrap();
    assert!(status.success(), "exit status: {status}");

    // The socket is released once the process is gone.
    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}
