//! Blocking Yandex Disk REST client: folder creation and the two-step upload (request link, send body).

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::Uploader;
use crate::engine::tools::remote_ancestors;
use crate::utils::config::RemoteConsts;

/// Connection settings for [`DiskClient`].
#[derive(Clone, Debug)]
pub struct DiskClientConfig {
    /// API base URL, e.g. `https://cloud-api.yandex.net`.
    pub api_url: String,
    pub token: String,
    /// Timeout for API calls. File bodies are only bounded by the connect timeout.
    pub timeout: Duration,
    /// Retries for transport errors, 429 and 5xx.
    pub retries: u32,
    pub retry_backoff: Duration,
}

impl DiskClientConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(RemoteConsts::REQUEST_TIMEOUT_SECS),
            retries: RemoteConsts::DEFAULT_RETRIES,
            retry_backoff: Duration::from_millis(RemoteConsts::RETRY_BACKOFF_MS),
        }
    }
}

/// Response of `GET /v1/disk/resources/upload`.
#[derive(Debug, Deserialize)]
struct UploadLink {
    href: String,
    #[serde(default = "default_method")]
    method: String,
}

fn default_method() -> String {
    "PUT".to_string()
}

/// Error body returned by the API on 4xx/5xx.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    description: String,
}

pub struct DiskClient {
    http: Client,
    api_url: String,
    timeout: Duration,
    retries: u32,
    retry_backoff: Duration,
    /// Remote folders already created (or found existing) by this client.
    known_dirs: Mutex<HashSet<String>>,
}

impl DiskClient {
    pub fn new(config: DiskClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("OAuth {}", config.token))
            .context("OAuth token contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(None)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            retries: config.retries,
            retry_backoff: config.retry_backoff,
            known_dirs: Mutex::new(HashSet::new()),
        })
    }

    fn resources_url(&self) -> String {
        format!("{}/v1/disk/resources", self.api_url)
    }

    /// Send a request built by `build`, retrying transport errors, 429 and 5xx.
    /// `build` is called once per attempt so bodies (open files) can be recreated.
    fn send_with_retry<F>(&self, what: &str, build: F) -> Result<Response>
    where
        F: Fn() -> Result<RequestBuilder>,
    {
        let mut attempt = 0_u32;
        loop {
            let retryable = match build()?.send() {
                Ok(resp) => {
                    let status = resp.status();
                    if !(status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
                        || attempt >= self.retries
                    {
                        return Ok(resp);
                    }
                    format!("HTTP {status}")
                }
                Err(e) if attempt < self.retries => e.to_string(),
                Err(e) => return Err(e).with_context(|| format!("{what} failed")),
            };
            attempt += 1;
            warn!(
                "{what}: {retryable}, retrying ({attempt}/{})",
                self.retries
            );
            std::thread::sleep(self.retry_backoff * attempt);
        }
    }

    /// Turn a non-success response into an error carrying the API's message.
    fn api_error(what: &str, resp: Response) -> anyhow::Error {
        let status = resp.status();
        let body: ApiErrorBody = resp.json().unwrap_or_default();
        let detail = [body.error, body.message, body.description]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(": ");
        if detail.is_empty() {
            anyhow::anyhow!("{what} failed: HTTP {status}")
        } else {
            anyhow::anyhow!("{what} failed: HTTP {status}: {detail}")
        }
    }

    /// Create one remote folder. An existing folder is not an error.
    pub fn create_dir(&self, path: &str) -> Result<()> {
        let url = self.resources_url();
        let resp = self.send_with_retry("create folder", || {
            Ok(self
                .http
                .put(&url)
                .timeout(self.timeout)
                .query(&[("path", path)]))
        })?;
        match resp.status() {
            StatusCode::CREATED => {
                debug!("Created remote folder {path}");
                Ok(())
            }
            StatusCode::CONFLICT => Ok(()),
            _ => Err(Self::api_error(&format!("create folder {path}"), resp)),
        }
    }

    /// Make sure every parent folder of `remote` exists.
    pub fn ensure_parent_dirs(&self, remote: &str) -> Result<()> {
        for dir in remote_ancestors(remote) {
            if self
                .known_dirs
                .lock()
                .map(|known| known.contains(&dir))
                .unwrap_or(false)
            {
                continue;
            }
            self.create_dir(&dir)?;
            if let Ok(mut known) = self.known_dirs.lock() {
                known.insert(dir);
            }
        }
        Ok(())
    }

    fn upload_link(&self, dst: &str, overwrite: bool) -> Result<UploadLink> {
        let url = format!("{}/upload", self.resources_url());
        let overwrite = if overwrite { "true" } else { "false" };
        let resp = self.send_with_retry("request upload link", || {
            Ok(self
                .http
                .get(&url)
                .timeout(self.timeout)
                .query(&[("path", dst), ("overwrite", overwrite)]))
        })?;
        if !resp.status().is_success() {
            return Err(Self::api_error(&format!("request upload link for {dst}"), resp));
        }
        resp.json().context("Parsing upload link json")
    }

    fn send_file(&self, link: &UploadLink, src: &Path) -> Result<()> {
        let method = reqwest::Method::from_bytes(link.method.as_bytes())
            .with_context(|| format!("Unsupported upload method {:?}", link.method))?;
        let resp = self.send_with_retry("send file", || {
            let file = std::fs::File::open(src)
                .with_context(|| format!("Failed to open {}", src.display()))?;
            Ok(self.http.request(method.clone(), &link.href).body(file))
        })?;
        match resp.status() {
            StatusCode::CREATED | StatusCode::ACCEPTED | StatusCode::OK => Ok(()),
            _ => Err(Self::api_error(&format!("send {}", src.display()), resp)),
        }
    }
}

impl Uploader for DiskClient {
    fn upload(&self, src: &Path, dst: &str, overwrite: bool) -> Result<()> {
        self.ensure_parent_dirs(dst)?;
        let link = self.upload_link(dst, overwrite)?;
        debug!("Upload link for {dst}: {} {}", link.method, link.href);
        self.send_file(&link, src)
    }
}
