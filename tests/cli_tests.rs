use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

/// Closed local port: connections are refused immediately.
const DEAD_API: &str = "http://127.0.0.1:9";

/// Command isolated from the user's environment: no token env, no config file, cwd in `dir`.
fn backyard(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("backyard").unwrap();
    cmd.current_dir(dir)
        .env_remove("BACKYARD_TOKEN")
        .env_remove("RUST_LOG")
        .args(["--config", "no-such-config.toml"]);
    cmd
}

fn write_token(dir: &Path) -> String {
    let token = dir.join("passwd");
    fs::write(&token, "test-token\n").unwrap();
    token.display().to_string()
}

#[test]
fn test_version_exits_zero() {
    let mut cmd = Command::cargo_bin("backyard").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_srcpath_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    backyard(dir.path())
        .args(["--dstpath", "/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--srcpath"));
}

#[test]
fn test_missing_dstpath_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    backyard(dir.path())
        .args(["--srcpath", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dstpath"));
}

#[test]
fn test_missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let token = write_token(dir.path());
    backyard(dir.path())
        .args(["--srcpath", "does-not-exist", "--dstpath", "/x"])
        .args(["--token-file", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot access source path"));
}

#[test]
fn test_unreadable_token_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("f.txt"), b"data").unwrap();
    backyard(dir.path())
        .args(["--srcpath", "f.txt", "--dstpath", "/f.txt"])
        .args(["--tokenFile", "missing-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read OAuth token"));
}

#[test]
fn test_single_file_upload_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let token = write_token(dir.path());
    fs::write(dir.path().join("f.txt"), b"data").unwrap();
    backyard(dir.path())
        .args(["--srcpath", "f.txt", "--dstpath", "/f.txt"])
        .args(["--token-file", &token, "--api-url", DEAD_API, "--retries", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source path is a file."))
        .stderr(predicate::str::contains("Failed to upload file"))
        .stderr(predicate::str::contains("waiting loop").not());
}

#[test]
fn test_directory_with_failed_uploads_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let token = write_token(dir.path());
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("a.txt"), b"a").unwrap();
    fs::write(src.join("sub").join("b.txt"), b"b").unwrap();
    backyard(dir.path())
        .args(["--srcpath", "src", "--dstpath", "/backup"])
        .args(["--token-file", &token, "--api-url", DEAD_API, "--retries", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source path is a directory."))
        .stderr(predicate::str::contains("Error channel is closed."))
        .stderr(predicate::str::contains("Finished with errors: 2 failed upload(s)"));
}

#[test]
fn test_json_log_format() {
    let dir = tempfile::tempdir().unwrap();
    backyard(dir.path())
        .args(["--srcpath", "does-not-exist", "--dstpath", "/x", "--json-log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"level\":\"error\""))
        .stderr(predicate::str::contains("\"pid\""));
}

#[test]
fn test_single_dash_long_flags_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let token = write_token(dir.path());
    backyard(dir.path())
        .args(["-srcpath", "does-not-exist", "-dstpath", "/y"])
        .args(["-tokenFile", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot access source path"))
        .stderr(predicate::str::contains("unexpected argument").not());
}

#[test]
fn test_single_dash_version_exits_zero() {
    let mut cmd = Command::cargo_bin("backyard").unwrap();
    cmd.arg("-version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
