// ─── Settings & Paths ───
// On-disk launcher settings and the directory layout derived from them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::HostOs;

const APP_DIR_NAME: &str = "InterfaceOficial";
const SETTINGS_FILE: &str = "launcher_settings.json";

pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LauncherSettings {
    /// Overrides `<data_dir>/libraries`.
    pub libraries_dir: Option<PathBuf>,
    /// Overrides `<data_dir>/versions`.
    pub versions_dir: Option<PathBuf>,
    /// Forces the OS tag used for library rules instead of the build target.
    pub host_os: Option<HostOs>,
    pub download_concurrency: usize,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            libraries_dir: None,
            versions_dir: None,
            host_os: None,
            download_concurrency: DEFAULT_DOWNLOAD_CONCURRENCY,
        }
    }
}

impl LauncherSettings {
    /// Load `launcher_settings.json` from `data_dir`.
    ///
    /// A missing file yields defaults; a malformed one is logged and ignored.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) -> LauncherResult<()> {
        std::fs::create_dir_all(data_dir).map_err(|source| LauncherError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;

        let path = data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|source| LauncherError::Io { path, source })
    }

    pub fn host(&self) -> HostOs {
        self.host_os.unwrap_or_else(HostOs::current)
    }

    pub fn paths(&self, data_dir: &Path) -> GamePaths {
        let defaults = GamePaths::new(data_dir);
        GamePaths {
            libraries_dir: self
                .libraries_dir
                .clone()
                .unwrap_or(defaults.libraries_dir),
            versions_dir: self.versions_dir.clone().unwrap_or(defaults.versions_dir),
            data_dir: defaults.data_dir,
        }
    }
}

/// Where primary artifacts and libraries live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    data_dir: PathBuf,
    libraries_dir: PathBuf,
    versions_dir: PathBuf,
}

impl GamePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            libraries_dir: data_dir.join("libraries"),
            versions_dir: data_dir.join("versions"),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn libraries_dir(&self) -> &Path {
        &self.libraries_dir
    }

    pub fn versions_dir(&self) -> &Path {
        &self.versions_dir
    }

    /// Canonical location of a version's client jar:
    /// `<versions>/<id>/<id>.jar`.
    pub fn primary_artifact_path(&self, version_id: &str) -> PathBuf {
        self.versions_dir
            .join(version_id)
            .join(format!("{}.jar", version_id))
    }

    pub fn library_path(&self, relative: &str) -> PathBuf {
        self.libraries_dir.join(relative)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
