// ─── Manifest Provider ───
// Supplies parsed version JSONs to the resolver.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

use super::version_file::VersionJson;

#[async_trait]
pub trait ManifestProvider: Send + Sync {
    async fn load(&self, version_id: &str) -> LauncherResult<VersionJson>;
}

/// Reads `<versions>/<id>/<id>.json` from the local game directory.
#[derive(Debug, Clone)]
pub struct LocalManifestProvider {
    versions_dir: PathBuf,
}

impl LocalManifestProvider {
    pub fn new(versions_dir: impl Into<PathBuf>) -> Self {
        Self {
            versions_dir: versions_dir.into(),
        }
    }

    pub fn manifest_path(&self, version_id: &str) -> PathBuf {
        self.versions_dir
            .join(version_id)
            .join(format!("{}.json", version_id))
    }
}

#[async_trait]
impl ManifestProvider for LocalManifestProvider {
    async fn load(&self, version_id: &str) -> LauncherResult<VersionJson> {
        let path = self.manifest_path(version_id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(LauncherError::VersionNotFound(version_id.to_string()));
        }

        debug!("Loading version manifest {:?}", path);
        let mut manifest = VersionJson::from_file(&path).await?;
        if manifest.id.is_none() {
            manifest.id = Some(version_id.to_string());
        }
        Ok(manifest)
    }
}
