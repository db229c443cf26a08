pub mod compare;
pub mod provider;
pub mod rules;
pub mod version_file;

pub use compare::compare_versions;
pub use provider::{LocalManifestProvider, ManifestProvider};
pub use rules::{is_allowed, HostOs, LibraryRule, OsRule, RuleAction};
pub use version_file::{
    DownloadArtifact, LibDownloadArtifact, LibraryDownloads, LibraryEntry, VersionDownloads,
    VersionJson,
};
