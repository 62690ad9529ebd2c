//! Yandex Disk client against a mock API.
//!
//! The client is blocking, so each call runs on a plain thread outside the tokio runtime that
//! drives the mock server.

use backyard::Uploader;
use backyard::remote::{DiskClient, DiskClientConfig};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{body_bytes, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || std::thread::spawn(f).join().unwrap())
        .await
        .unwrap()
}

fn test_config(uri: String) -> DiskClientConfig {
    let mut config = DiskClientConfig::new(uri, "test-token");
    config.timeout = Duration::from_secs(5);
    config.retries = 2;
    config.retry_backoff = Duration::from_millis(10);
    config
}

fn local_file(dir: &tempfile::TempDir, name: &str, body: &[u8]) -> PathBuf {
    let p = dir.path().join(name);
    std::fs::write(&p, body).unwrap();
    p
}

async fn mount_upload_link(server: &MockServer, remote: &str, overwrite: &str, target: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources/upload"))
        .and(query_param("path", remote))
        .and(query_param("overwrite", overwrite))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": format!("{}{}", server.uri(), target),
            "method": "PUT",
            "templated": false
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_creates_folder_requests_link_and_sends_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/disk/resources"))
        .and(query_param("path", "/backup"))
        .and(header("authorization", "OAuth test-token"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    mount_upload_link(&server, "/backup/a.txt", "true", "/target/a.txt").await;
    Mock::given(method("PUT"))
        .and(path("/target/a.txt"))
        .and(body_bytes(b"hello".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = local_file(&dir, "a.txt", b"hello");
    let uri = server.uri();
    let result = run_blocking(move || {
        let client = DiskClient::new(test_config(uri))?;
        client.upload(&src, "/backup/a.txt", true)
    })
    .await;

    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_existing_folder_is_created_once_per_client() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/disk/resources"))
        .and(query_param("path", "/photos"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "DiskPathPointsToExistentDirectoryError",
            "message": "exists"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_upload_link(&server, "/photos/1.jpg", "false", "/target/1.jpg").await;
    mount_upload_link(&server, "/photos/2.jpg", "false", "/target/2.jpg").await;
    Mock::given(method("PUT"))
        .and(path("/target/1.jpg"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/target/2.jpg"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let one = local_file(&dir, "1.jpg", b"1");
    let two = local_file(&dir, "2.jpg", b"2");
    let uri = server.uri();
    let result = run_blocking(move || -> anyhow::Result<()> {
        let client = DiskClient::new(test_config(uri))?;
        client.upload(&one, "/photos/1.jpg", false)?;
        client.upload(&two, "/photos/2.jpg", false)
    })
    .await;

    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_existing_file_without_overwrite_fails_with_api_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/disk/resources/upload"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "DiskResourceAlreadyExistsError",
            "message": "Resource \"disk:/a.txt\" already exists.",
            "description": "Resource already exists"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = local_file(&dir, "a.txt", b"a");
    let uri = server.uri();
    let result = run_blocking(move || {
        let client = DiskClient::new(test_config(uri))?;
        client.upload(&src, "/a.txt", false)
    })
    .await;

    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("409"), "{err}");
    assert!(err.contains("DiskResourceAlreadyExistsError"), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/disk/resources/upload"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_upload_link(&server, "/a.txt", "true", "/target/a.txt").await;
    Mock::given(method("PUT"))
        .and(path("/target/a.txt"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = local_file(&dir, "a.txt", b"a");
    let uri = server.uri();
    let result = run_blocking(move || {
        let client = DiskClient::new(test_config(uri))?;
        client.upload(&src, "/a.txt", true)
    })
    .await;

    assert!(result.is_ok(), "{:?}", result);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/disk/resources/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "UnauthorizedError",
            "message": "Unauthorized"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = local_file(&dir, "a.txt", b"a");
    let uri = server.uri();
    let result = run_blocking(move || {
        let client = DiskClient::new(test_config(uri))?;
        client.upload(&src, "/a.txt", true)
    })
    .await;

    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("401"), "{err}");
    assert!(err.contains("UnauthorizedError"), "{err}");
}
