use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;

/// Where server artifacts come from. The fetcher only needs "GET this URL
/// into that file"; tests plug in a counting fake.
#[async_trait]
pub trait ArtifactTransport: Send + Sync {
    /// Downloads `url` into `dest`, returning the number of bytes written.
    /// Nothing is written unless the server answers `200 OK`.
    async fn download(&self, url: &str, dest: &Path) -> LauncherResult<u64>;
}

/// Single-shot HTTP downloader. One GET per call, no retries.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Download a single file to `dest`.
    ///
    /// Creates parent directories as needed. Bytes land in `<dest>.part`
    /// first and are renamed into place only once fully written, so a
    /// failed write never leaves a truncated jar under the final name.
    pub async fn download_file(&self, url: &str, dest: &Path) -> LauncherResult<u64> {
        info!("Downloading {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let part = part_path(dest);
        if let Err(e) = write_file(&part, &bytes).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }
        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, bytes.len());
        Ok(bytes.len() as u64)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

// The handle is dropped before the rename.
async fn write_file(path: &Path, bytes: &[u8]) -> LauncherResult<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| LauncherError::io(path, e))?;
    file.flush().await.map_err(|e| LauncherError::io(path, e))?;
    file.sync_all().await.map_err(|e| LauncherError::io(path, e))
}

#[async_trait]
impl ArtifactTransport for Downloader {
    async fn download(&self, url: &str, dest: &Path) -> LauncherResult<u64> {
        self.download_file(url, dest).await
    }
}
