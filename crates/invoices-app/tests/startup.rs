use std::net::TcpListener;
use std::process::{Command, Output};

fn find_free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

// Runs the binary outside the workspace so no stray .env file is picked up.
fn run_app(vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_invoices-app"));
    cmd.current_dir(std::env::temp_dir())
        .env_remove("MONGO_URL")
        .env_remove("MONGODB_URL")
        .env("RUST_LOG", "info");
    for (k, v) in vars {
        cmd.env(k, v);
    }
    cmd.output().expect("spawn invoices-app")
}

#[test]
fn exits_before_binding_without_connection_string() {
    let port = find_free_port();
    let out = run_app(&[("PORT", &port.to_string())]);

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let logs = String::from_utf8_lossy(&out.stdout);
    assert!(logs.contains("MONGO_URL"), "logs: {logs}");
    assert!(!logs.contains("Server is running"));
    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}

#[cfg(feature = "mongodb")]
#[test]
fn exits_when_initial_connection_fails() {
    let port = find_free_port();
    let dead = format!(
        "mongodb://127.0.0.1:{}/?serverSelectionTimeoutMS=300&connectTimeoutMS=300",
        find_free_port()
    );
    let out = run_app(&[("PORT", &port.to_string()), ("MONGO_URL", &dead)]);

    assert_eq!(out.status.code(), Some(1));
    let logs = String::from_utf8_lossy(&out.stdout);
    assert!(logs.contains("Error in connecting to MongoDB"), "logs: {logs}");
    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}
