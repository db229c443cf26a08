pub mod core;

use std::path::Path;

use tracing_subscriber::EnvFilter;

pub use crate::core::downloader::{Acquirer, DownloadAcquirer, Downloader, ProgressOptions};
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::launch::{Classpath, Diagnostic, Resolution, ResolveReport, Resolver};
pub use crate::core::settings::{default_data_dir, GamePaths, LauncherSettings};
pub use crate::core::version::{HostOs, LocalManifestProvider, ManifestProvider, VersionJson};

/// Initialize structured logging for an embedding process.
///
/// Honours `RUST_LOG`; defaults to `info,launch_classpath=debug`. Safe to call
/// more than once, later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launch_classpath=debug")),
        )
        .try_init();
}

/// Load the manifest for `version_id`, resolve its classpath with the HTTP
/// downloader as acquirer, and collapse duplicate library versions.
///
/// `data_dir` defaults to [`default_data_dir`]. `progress` reaches the
/// acquirer as given.
pub async fn resolve_version(
    data_dir: Option<&Path>,
    version_id: &str,
    custom_primary: Option<&Path>,
    progress: ProgressOptions,
) -> LauncherResult<Resolution> {
    let data_dir = data_dir.map_or_else(default_data_dir, Path::to_path_buf);
    let settings = LauncherSettings::load(&data_dir);
    let paths = settings.paths(&data_dir);
    let host = settings.host();

    let manifest = LocalManifestProvider::new(paths.versions_dir())
        .load(version_id)
        .await?;

    let downloader = Downloader::new()?.with_concurrency(settings.download_concurrency);
    let acquirer = DownloadAcquirer::new(downloader, paths.clone(), host);

    let mut resolution = Resolver::new(paths, acquirer)
        .with_host(host)
        .with_progress(progress)
        .resolve(&manifest, version_id, custom_primary)
        .await?;

    let removed = resolution.dedupe();
    if removed > 0 {
        tracing::info!("Removed {} outdated duplicate libraries", removed);
    }

    Ok(resolution)
}
