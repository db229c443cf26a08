use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;
use crate::core::settings::DEFAULT_DOWNLOAD_CONCURRENCY;

use super::progress::{OperationTracker, ProgressOptions};

const MAX_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;

/// A single file to download with optional SHA-1 for validation.
#[derive(Debug, Clone)]
pub struct DownloadEntry {
    pub url: String,
    pub dest: PathBuf,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

/// Concurrent, SHA-1 validated downloader.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    /// Maximum number of parallel downloads.
    concurrency: usize,
}

impl Downloader {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            concurrency: DEFAULT_DOWNLOAD_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    // ── Single file download ────────────────────────────

    /// Download a single file to `dest`, optionally validating SHA-1.
    ///
    /// Creates parent directories as needed. Byte progress goes to
    /// `progress.on_download_progress` after every received chunk. The body
    /// is written to a `.part` sibling and renamed into place, so `dest` is
    /// either absent or complete.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
        progress: &ProgressOptions,
    ) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length().unwrap_or(0);
        let mut bytes = Vec::with_capacity(total_bytes.min(MAX_PREALLOC_BYTES) as usize);
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            progress.report_download(dest, bytes.len() as u64, total_bytes);
        }

        // Validate before anything touches the destination.
        if let Some(expected) = sha1_expected {
            let actual = sha1_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(LauncherError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        let part = part_path(dest);
        if let Err(e) = write_file(&part, &bytes).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }
        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    // ── Batch concurrent downloads ──────────────────────

    /// Download many files concurrently using `buffer_unordered`.
    ///
    /// Returns the list of files that failed (if any).
    pub async fn download_batch(
        &self,
        entries: Vec<DownloadEntry>,
        progress: &ProgressOptions,
    ) -> Vec<(DownloadEntry, LauncherError)> {
        info!(
            "Starting batch download: {} files, concurrency={}",
            entries.len(),
            self.concurrency
        );

        let mut tracker = OperationTracker::new(progress, entries.len());
        let mut results = stream::iter(entries)
            .map(|entry| async move {
                let result = self
                    .download_file(&entry.url, &entry.dest, entry.sha1.as_deref(), progress)
                    .await;
                (entry, result)
            })
            .buffer_unordered(self.concurrency);

        let mut failures = Vec::new();
        while let Some((entry, result)) = results.next().await {
            tracker.advance();
            if let Err(e) = result {
                failures.push((entry, e));
            }
        }

        failures
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

async fn write_file(path: &Path, bytes: &[u8]) -> LauncherResult<()> {
    let io_err = |source: std::io::Error| LauncherError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
    file.write_all(bytes).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
