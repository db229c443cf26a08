// ─── Acquisition ───
// The seam through which the resolver asks for missing artifacts.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::launch::validate::is_valid;
use crate::core::settings::GamePaths;
use crate::core::version::{HostOs, VersionJson};

use super::client::{DownloadEntry, Downloader};
use super::progress::ProgressOptions;

/// Fetches artifacts a resolution run found missing.
#[async_trait]
pub trait Acquirer: Send + Sync {
    /// Fetch the client jar for `version_id` into its canonical location.
    async fn acquire_primary(
        &self,
        manifest: &VersionJson,
        version_id: &str,
        progress: &ProgressOptions,
    ) -> LauncherResult<()>;

    /// Fetch every outstanding library of `manifest` in one pass.
    ///
    /// An error means the pass made no progress at all; partial failures are
    /// left for the caller's re-validation to find.
    async fn acquire_dependencies(
        &self,
        manifest: &VersionJson,
        progress: &ProgressOptions,
    ) -> LauncherResult<()>;

    /// Resolves once work started by `acquire_dependencies` has settled.
    async fn wait_until_complete(&self) {}
}

/// [`Acquirer`] backed by the HTTP [`Downloader`].
#[derive(Debug, Clone)]
pub struct DownloadAcquirer {
    downloader: Downloader,
    paths: GamePaths,
    host: HostOs,
}

impl DownloadAcquirer {
    pub fn new(downloader: Downloader, paths: GamePaths, host: HostOs) -> Self {
        Self {
            downloader,
            paths,
            host,
        }
    }

    /// Libraries that apply to this host, carry a URL and are not valid on disk.
    pub async fn pending_downloads(&self, manifest: &VersionJson) -> Vec<DownloadEntry> {
        let mut pending = Vec::new();

        for lib in &manifest.libraries {
            if !lib.is_allowed_for(self.host) {
                continue;
            }

            let (Some(relative), Some(artifact)) = (lib.artifact_path(), lib.artifact()) else {
                continue;
            };
            let Some(url) = artifact.url.as_deref().filter(|u| !u.trim().is_empty()) else {
                debug!("Library has no download URL: {}", lib.name);
                continue;
            };

            let dest = self.paths.library_path(relative);
            if is_valid(&dest).await {
                continue;
            }

            pending.push(DownloadEntry {
                url: url.to_string(),
                dest,
                sha1: artifact.sha1.clone(),
                size: artifact.size,
            });
        }

        pending
    }
}

#[async_trait]
impl Acquirer for DownloadAcquirer {
    async fn acquire_primary(
        &self,
        manifest: &VersionJson,
        version_id: &str,
        progress: &ProgressOptions,
    ) -> LauncherResult<()> {
        let client = manifest.client_download().ok_or_else(|| {
            LauncherError::Acquisition(format!("Version {} declares no client download", version_id))
        })?;

        let dest = self.paths.primary_artifact_path(version_id);
        info!("Downloading client jar for {}", version_id);
        self.downloader
            .download_file(&client.url, &dest, client.sha1.as_deref(), progress)
            .await
    }

    async fn acquire_dependencies(
        &self,
        manifest: &VersionJson,
        progress: &ProgressOptions,
    ) -> LauncherResult<()> {
        let pending = self.pending_downloads(manifest).await;
        if pending.is_empty() {
            debug!("No downloadable libraries outstanding");
            return Ok(());
        }

        let total = pending.len();
        let failures = self.downloader.download_batch(pending, progress).await;
        for (entry, error) in &failures {
            warn!("Library download failed {}: {}", entry.url, error);
        }

        if failures.len() < total {
            if !failures.is_empty() {
                warn!("{} of {} library downloads failed", failures.len(), total);
            }
            return Ok(());
        }
        Err(LauncherError::Acquisition(format!(
            "all {} library downloads failed",
            total
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::downloader::testing;
    use crate::core::launch::{normalize_path, Diagnostic, Resolver};
    use crate::core::version::{LibraryEntry, LibraryRule};

    fn library(name: &str, path: &str, url: Option<&str>) -> LibraryEntry {
        let mut lib = LibraryEntry::with_path(name, path);
        if let Some(artifact) = lib.downloads.as_mut().and_then(|d| d.artifact.as_mut()) {
            artifact.url = url.map(str::to_string);
        }
        lib
    }

    #[tokio::test]
    async fn pending_downloads_skip_present_foreign_and_url_less_libraries() {
        let temp = tempfile::tempdir().unwrap();
        let paths = GamePaths::new(temp.path());
        let acquirer = DownloadAcquirer::new(
            Downloader::with_client(reqwest::Client::new()),
            paths.clone(),
            HostOs::Linux,
        );

        let present = paths.library_path("a/present-1.0.jar");
        std::fs::create_dir_all(present.parent().unwrap()).unwrap();
        std::fs::write(&present, b"jar").unwrap();

        let mut windows_only = library("a:win:1.0", "a/win-1.0.jar", Some("https://x/win.jar"));
        windows_only.rules = Some(vec![LibraryRule::allow(Some("windows"))]);

        let manifest = VersionJson {
            libraries: vec![
                library("a:present:1.0", "a/present-1.0.jar", Some("https://x/present.jar")),
                library("a:missing:1.0", "a/missing-1.0.jar", Some("https://x/missing.jar")),
                library("a:no-url:1.0", "a/no-url-1.0.jar", None),
                windows_only,
            ],
            ..VersionJson::default()
        };

        let pending = acquirer.pending_downloads(&manifest).await;

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].url, "https://x/missing.jar");
        assert_eq!(pending[0].dest, paths.library_path("a/missing-1.0.jar"));
    }

    #[tokio::test]
    async fn primary_without_client_download_is_an_acquisition_error() {
        let temp = tempfile::tempdir().unwrap();
        let acquirer = DownloadAcquirer::new(
            Downloader::with_client(reqwest::Client::new()),
            GamePaths::new(temp.path()),
            HostOs::Linux,
        );

        let err = acquirer
            .acquire_primary(&VersionJson::default(), "1.20.4", &ProgressOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::Acquisition(_)));
    }

    #[tokio::test]
    async fn nothing_outstanding_is_a_successful_pass() {
        let temp = tempfile::tempdir().unwrap();
        let acquirer = DownloadAcquirer::new(
            Downloader::with_client(reqwest::Client::new()),
            GamePaths::new(temp.path()),
            HostOs::Linux,
        );

        acquirer
            .acquire_dependencies(&VersionJson::default(), &ProgressOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pending_downloads_follow_the_configured_host() {
        let temp = tempfile::tempdir().unwrap();
        let mut mac_only = library("a:mac:1.0", "a/mac-1.0.jar", Some("https://x/mac.jar"));
        mac_only.rules = Some(vec![LibraryRule::allow(Some("osx"))]);
        let manifest = VersionJson {
            libraries: vec![mac_only],
            ..VersionJson::default()
        };

        let for_host = |host| {
            DownloadAcquirer::new(
                Downloader::with_client(reqwest::Client::new()),
                GamePaths::new(temp.path()),
                host,
            )
        };

        assert_eq!(for_host(HostOs::Osx).pending_downloads(&manifest).await.len(), 1);
        assert!(for_host(HostOs::Linux).pending_downloads(&manifest).await.is_empty());
    }

    #[tokio::test]
    async fn partially_failed_pass_still_recovers_what_arrived() {
        let base = testing::serve(b"jar").await;
        let temp = tempfile::tempdir().unwrap();
        let paths = GamePaths::new(temp.path());
        std::fs::create_dir_all(paths.versions_dir().join("1.20.4")).unwrap();
        std::fs::write(paths.primary_artifact_path("1.20.4"), b"jar").unwrap();

        let ok_url = format!("{}/ok.jar", base);
        let gone_url = format!("{}/gone.jar", testing::UNREACHABLE);
        let manifest = VersionJson {
            libraries: vec![
                library("a:ok:1.0", "a/ok-1.0.jar", Some(ok_url.as_str())),
                library("a:gone:1.0", "a/gone-1.0.jar", Some(gone_url.as_str())),
            ],
            ..VersionJson::default()
        };
        let acquirer = DownloadAcquirer::new(
            Downloader::with_client(testing::client()),
            paths.clone(),
            HostOs::Linux,
        );

        let resolution = Resolver::new(paths.clone(), acquirer)
            .with_host(HostOs::Linux)
            .resolve(&manifest, "1.20.4", None)
            .await
            .unwrap();

        assert!(resolution
            .classpath
            .contains(&normalize_path(&paths.library_path("a/ok-1.0.jar"))));
        assert_eq!(resolution.missing, 1);
        assert!(matches!(
            &resolution.diagnostics[..],
            [Diagnostic::AcquisitionFailed { library, .. }] if library == "a:gone:1.0"
        ));
    }

    #[tokio::test]
    async fn pass_without_any_success_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let acquirer = DownloadAcquirer::new(
            Downloader::with_client(testing::client()),
            GamePaths::new(temp.path()),
            HostOs::Linux,
        );
        let gone_url = format!("{}/gone.jar", testing::UNREACHABLE);
        let manifest = VersionJson {
            libraries: vec![library("a:gone:1.0", "a/gone-1.0.jar", Some(gone_url.as_str()))],
            ..VersionJson::default()
        };

        let err = acquirer
            .acquire_dependencies(&manifest, &ProgressOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::Acquisition(_)));
    }
}
