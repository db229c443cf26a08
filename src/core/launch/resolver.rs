// ─── Classpath Resolver ───
// Validates the primary artifact and every library of a version, asks the
// acquirer for whatever is missing, and re-validates before accepting it.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::downloader::{Acquirer, ProgressOptions};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::settings::GamePaths;
use crate::core::version::{HostOs, LibraryEntry, VersionJson};

use super::classpath::{normalize_path, AddOptions, AddRejection, Classpath};

/// Something that went wrong without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The caller-supplied primary artifact was not accepted.
    CustomPrimaryRejected { path: PathBuf, reason: AddRejection },
    /// The canonical primary artifact was not accepted after acquisition.
    PrimaryRejected { path: PathBuf, reason: AddRejection },
    /// The acquirer failed while fetching libraries; the entry was skipped.
    AcquisitionFailed { library: String, error: String },
    /// The library was still missing or empty after the re-fetch.
    DependencyUnresolved { library: String, path: PathBuf },
}

/// Outcome of one resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub classpath: Classpath,
    /// Libraries that could not be resolved, recovered ones excluded.
    pub missing: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.missing == 0 && self.diagnostics.is_empty()
    }

    /// Collapse same-named jars to their newest version. Returns how many
    /// entries were dropped.
    pub fn dedupe(&mut self) -> usize {
        self.classpath.dedupe()
    }
}

/// What [`Resolver::resolve_into`] could not put on the classpath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub missing: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds classpaths for versions laid out under [`GamePaths`].
///
/// Each call to [`Resolver::resolve`] works on its own [`Classpath`], so one
/// resolver can serve concurrent runs as long as the acquirer allows it.
pub struct Resolver<A> {
    paths: GamePaths,
    host: HostOs,
    acquirer: A,
    progress: ProgressOptions,
}

impl<A: Acquirer> Resolver<A> {
    pub fn new(paths: GamePaths, acquirer: A) -> Self {
        Self {
            paths,
            host: HostOs::current(),
            acquirer,
            progress: ProgressOptions::default(),
        }
    }

    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    pub fn with_progress(mut self, progress: ProgressOptions) -> Self {
        self.progress = progress;
        self
    }

    pub fn acquirer(&self) -> &A {
        &self.acquirer
    }

    /// Resolve the classpath for `version_id` into a fresh [`Classpath`].
    ///
    /// Order: primary artifact first, then libraries in manifest order. Only a
    /// failed acquisition of the canonical primary artifact is an error;
    /// everything else ends up in [`Resolution::diagnostics`].
    pub async fn resolve(
        &self,
        manifest: &VersionJson,
        version_id: &str,
        custom_primary: Option<&Path>,
    ) -> LauncherResult<Resolution> {
        let mut classpath = Classpath::new();
        let report = self
            .resolve_into(&mut classpath, manifest, version_id, custom_primary)
            .await?;

        Ok(Resolution {
            classpath,
            missing: report.missing,
            diagnostics: report.diagnostics,
        })
    }

    /// Like [`Resolver::resolve`], but fills a caller-owned accumulator.
    ///
    /// The accumulator is cleared first, so entries from an earlier run never
    /// leak into this one.
    pub async fn resolve_into(
        &self,
        classpath: &mut Classpath,
        manifest: &VersionJson,
        version_id: &str,
        custom_primary: Option<&Path>,
    ) -> LauncherResult<ResolveReport> {
        classpath.clear();
        let mut diagnostics = Vec::new();

        self.resolve_primary(
            classpath,
            &mut diagnostics,
            manifest,
            version_id,
            custom_primary,
        )
        .await?;

        let mut missing = 0;
        for library in &manifest.libraries {
            if !self
                .resolve_library(classpath, &mut diagnostics, manifest, library)
                .await
            {
                missing += 1;
            }
        }

        if missing > 0 {
            warn!("{} libraries are missing for {}", missing, version_id);
        }
        info!(
            "Resolved classpath for {}: {} entries",
            version_id,
            classpath.len()
        );

        Ok(ResolveReport {
            missing,
            diagnostics,
        })
    }

    async fn resolve_primary(
        &self,
        classpath: &mut Classpath,
        diagnostics: &mut Vec<Diagnostic>,
        manifest: &VersionJson,
        version_id: &str,
        custom_primary: Option<&Path>,
    ) -> LauncherResult<()> {
        if let Some(custom) = custom_primary {
            if let Err(reason) = classpath.try_add(custom, AddOptions::default()).await {
                warn!("Custom primary artifact {:?} rejected: {:?}", custom, reason);
                diagnostics.push(Diagnostic::CustomPrimaryRejected {
                    path: custom.to_path_buf(),
                    reason,
                });
            }
            return Ok(());
        }

        let path = self.paths.primary_artifact_path(version_id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            info!("Primary artifact for {} not found, acquiring", version_id);
            self.acquirer
                .acquire_primary(manifest, version_id, &self.progress)
                .await
                .map_err(|source| LauncherError::PrimaryArtifactUnavailable {
                    version: version_id.to_string(),
                    source: Box::new(source),
                })?;
        }

        if let Err(reason) = classpath.try_add(&path, AddOptions::default()).await {
            warn!("Primary artifact {:?} rejected: {:?}", path, reason);
            diagnostics.push(Diagnostic::PrimaryRejected { path, reason });
        }
        Ok(())
    }

    /// Returns `false` when the library applies but could not be resolved.
    async fn resolve_library(
        &self,
        classpath: &mut Classpath,
        diagnostics: &mut Vec<Diagnostic>,
        manifest: &VersionJson,
        library: &LibraryEntry,
    ) -> bool {
        if !library.is_allowed_for(self.host) {
            debug!("Skipping library (OS rule): {}", library.name);
            return true;
        }

        let Some(relative) = library.artifact_path() else {
            debug!("Skipping library without artifact path: {}", library.name);
            return true;
        };

        let local = normalize_path(&self.paths.library_path(relative));
        match classpath.try_add(&local, AddOptions::default()).await {
            Ok(()) => return true,
            Err(AddRejection::Duplicate) => {
                debug!("Library already on classpath: {}", library.name);
                return true;
            }
            Err(AddRejection::Invalid) => {}
        }

        // Any miss triggers a full pass over the manifest's outstanding libraries.
        debug!("Library not found on disk, acquiring: {}", library.name);
        if let Err(e) = self
            .acquirer
            .acquire_dependencies(manifest, &self.progress)
            .await
        {
            warn!("Acquisition failed for {}: {}", library.name, e);
            diagnostics.push(Diagnostic::AcquisitionFailed {
                library: library.name.clone(),
                error: e.to_string(),
            });
            return false;
        }
        self.acquirer.wait_until_complete().await;

        if classpath.add(&local).await {
            debug!("Recovered library after acquisition: {}", library.name);
            return true;
        }

        warn!("Library still missing after acquisition: {}", library.name);
        diagnostics.push(Diagnostic::DependencyUnresolved {
            library: library.name.clone(),
            path: local,
        });
        false
    }
}
