// ─── Version File ───
// Serde model of a version JSON, limited to what classpath resolution reads.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};

use super::rules::{self, HostOs, LibraryRule};

/// A parsed version JSON.
///
/// Parsing is lenient: libraries with missing download fields still load and
/// are skipped later by the resolver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
}

/// Remote location of the primary client artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

// ─── Library Entry with Rules ───

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default)]
    pub rules: Option<Vec<LibraryRule>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
}

/// Where a library lives, relative to the libraries root, and where to get it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibDownloadArtifact {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl LibraryEntry {
    /// Library with a single artifact path and no rules.
    pub fn with_path(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            downloads: Some(LibraryDownloads {
                artifact: Some(LibDownloadArtifact {
                    path: Some(path.to_string()),
                    ..LibDownloadArtifact::default()
                }),
            }),
            rules: None,
        }
    }

    pub fn artifact(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }

    /// Relative storage path of the main artifact, if the manifest declares one.
    pub fn artifact_path(&self) -> Option<&str> {
        self.artifact()?
            .path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }

    pub fn is_allowed_for(&self, host: HostOs) -> bool {
        rules::is_allowed(self.rules.as_deref(), host)
    }
}

impl VersionJson {
    /// Parse a version JSON document.
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a version JSON from disk.
    pub async fn from_file(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LauncherError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&raw)
    }

    pub fn client_download(&self) -> Option<&DownloadArtifact> {
        self.downloads.as_ref()?.client.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_without_rules_is_allowed_everywhere() {
        let lib = LibraryEntry::with_path("test:lib:1.0", "test/lib/1.0/lib-1.0.jar");
        assert!(lib.is_allowed_for(HostOs::Windows));
        assert!(lib.is_allowed_for(HostOs::Linux));
        assert_eq!(lib.artifact_path(), Some("test/lib/1.0/lib-1.0.jar"));
    }

    #[test]
    fn parse_version_json_with_rules_and_downloads() {
        let parsed = VersionJson::parse(
            &serde_json::json!({
                "id": "1.20.4",
                "mainClass": "net.minecraft.client.main.Main",
                "downloads": {
                    "client": {
                        "url": "https://example.com/client.jar",
                        "sha1": "abc",
                        "size": 10
                    }
                },
                "libraries": [
                    {
                        "name": "org.lwjgl:lwjgl:3.3.3",
                        "downloads": {
                            "artifact": {
                                "path": "org/lwjgl/lwjgl/3.3.3/lwjgl-3.3.3.jar",
                                "url": "https://example.com/lwjgl-3.3.3.jar",
                                "sha1": "def",
                                "size": 20
                            }
                        },
                        "rules": [{"action": "allow", "os": {"name": "osx"}}]
                    }
                ]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(parsed.id.as_deref(), Some("1.20.4"));
        assert_eq!(
            parsed.client_download().map(|c| c.url.as_str()),
            Some("https://example.com/client.jar")
        );

        let lib = &parsed.libraries[0];
        assert!(lib.is_allowed_for(HostOs::Osx));
        assert!(!lib.is_allowed_for(HostOs::Linux));
        assert_eq!(lib.artifact().and_then(|a| a.size), Some(20));
    }

    #[test]
    fn malformed_library_entries_still_parse() {
        let parsed = VersionJson::parse(
            r#"{
                "libraries": [
                    {"name": "a:no-downloads:1.0"},
                    {"name": "a:no-artifact:1.0", "downloads": {}},
                    {"name": "a:no-path:1.0", "downloads": {"artifact": {"url": "https://x"}}},
                    {"name": "a:blank-path:1.0", "downloads": {"artifact": {"path": "  "}}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.libraries.len(), 4);
        assert!(parsed
            .libraries
            .iter()
            .all(|lib| lib.artifact_path().is_none()));
    }
}
