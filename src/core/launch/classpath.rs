// ─── Classpath Accumulator ───
// Ordered, duplicate-free set of artifact paths for one resolution run.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::dedupe::dedupe;
use super::validate::is_valid;

/// Why [`Classpath::try_add`] refused a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRejection {
    /// The normalized path is already on the classpath.
    Duplicate,
    /// The file is missing or empty.
    Invalid,
}

/// Per-call switches for [`Classpath::add_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOptions {
    pub normalize: bool,
    pub validate: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            validate: true,
        }
    }
}

/// Classpath entries in JVM precedence order.
///
/// Owned by a single resolution run; never share one between concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    entries: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize, validate and append `path`. Returns `false` when rejected.
    pub async fn add(&mut self, path: &Path) -> bool {
        self.add_with(path, AddOptions::default()).await
    }

    pub async fn add_with(&mut self, path: &Path, options: AddOptions) -> bool {
        self.try_add(path, options).await.is_ok()
    }

    /// Like [`Classpath::add_with`] but reports the rejection reason.
    pub async fn try_add(&mut self, path: &Path, options: AddOptions) -> Result<(), AddRejection> {
        let entry = if options.normalize {
            normalize_path(path)
        } else {
            path.to_path_buf()
        };

        if self.seen.contains(&entry) {
            return Err(AddRejection::Duplicate);
        }

        if options.validate && !is_valid(&entry).await {
            return Err(AddRejection::Invalid);
        }

        debug!("Classpath += {:?}", entry);
        self.seen.insert(entry.clone());
        self.entries.push(entry);
        Ok(())
    }

    /// Membership check against the normalized form of `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(&normalize_path(path)) || self.seen.contains(path)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collapse same-named jars to their newest version.
    ///
    /// Returns how many entries were dropped; the accumulator is only
    /// rewritten when that number is non-zero.
    pub fn dedupe(&mut self) -> usize {
        let kept = dedupe(&self.entries);
        let removed = self.entries.len() - kept.len();

        if removed > 0 {
            debug!("Deduplicated classpath: removed {} entries", removed);
            self.seen = kept.iter().cloned().collect();
            self.entries = kept;
        }

        removed
    }

    /// Render the `-cp` argument.
    pub fn to_classpath_string(&self) -> String {
        self.entries
            .iter()
            .map(|entry| safe_path_str(entry))
            .collect::<Vec<_>>()
            .join(classpath_separator())
    }
}

/// Platform-specific Java classpath separator.
pub fn classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

/// Absolute, lexically normalized form of `path` (`.` and `..` folded away).
///
/// Does not touch the filesystem, so it works for files that do not exist yet.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Convert a path to a string for the JVM command line.
pub fn safe_path_str(path: &Path) -> String {
    let text = path.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // Java classpath handling can fail for Windows extended-length paths
        // (e.g. `\\?\C:\...`). Strip the prefix before building launch arguments.
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}
