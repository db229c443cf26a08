// ─── Classpath Deduplication ───
// Collapses jars that differ only by their trailing version to the newest one.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::version::compare_versions;

/// `-<version>.jar` at the end of a file name, where each dotted segment is
/// digits optionally followed by `-qualifier`.
static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(\d+(?:-[A-Za-z0-9.]+)?(?:\.\d+(?:-[A-Za-z0-9.]+)?)*)\.jar$")
        .expect("version suffix pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    /// File name with its `-<version>.jar` suffix removed.
    Versioned(String),
    /// Full file name of a jar without a recognizable version.
    Unversioned(String),
}

/// Split a jar file name into its base name and version.
///
/// `guava-31.1-jre.jar` → `("guava", "31.1-jre")`.
pub fn split_versioned_name(file_name: &str) -> Option<(&str, &str)> {
    let captures = VERSION_SUFFIX.captures(file_name)?;
    let suffix = captures.get(0)?;
    let version = captures.get(1)?;
    Some((&file_name[..suffix.start()], version.as_str()))
}

fn group_key(path: &Path) -> (GroupKey, Option<String>) {
    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return (GroupKey::Unversioned(path.to_string_lossy().to_string()), None),
    };

    match split_versioned_name(&file_name) {
        Some((base, version)) => (GroupKey::Versioned(base.to_string()), Some(version.to_string())),
        None => (GroupKey::Unversioned(file_name), None),
    }
}

/// Keep only the newest version of each jar.
///
/// Jars are grouped by base name (`foo-1.0.jar` and `foo-2.0.jar` share `foo`);
/// the group keeps the path whose version compares greatest, or the earlier
/// path on a tie. Jars without a version suffix are grouped by their full file
/// name.
///
/// Output order is the order in which each group was first seen, so a newer
/// duplicate takes over the slot of the first occurrence.
pub fn dedupe<P>(paths: &[P]) -> Vec<P>
where
    P: AsRef<Path> + Clone,
{
    let mut slots: Vec<(P, Option<String>)> = Vec::with_capacity(paths.len());
    let mut index_by_key: HashMap<GroupKey, usize> = HashMap::new();

    for path in paths {
        let (key, version) = group_key(path.as_ref());

        match index_by_key.get(&key) {
            None => {
                index_by_key.insert(key, slots.len());
                slots.push((path.clone(), version));
            }
            Some(&idx) => {
                let (kept, kept_version) = &slots[idx];
                let newer = match (&version, kept_version) {
                    (Some(candidate), Some(existing)) => {
                        compare_versions(candidate, existing) == Ordering::Greater
                    }
                    _ => false,
                };

                if newer {
                    debug!(
                        "Replacing {:?} with newer {:?}",
                        kept.as_ref(),
                        path.as_ref()
                    );
                    slots[idx] = (path.clone(), version);
                } else {
                    debug!("Dropping duplicate {:?}", path.as_ref());
                }
            }
        }
    }

    slots.into_iter().map(|(path, _)| path).collect()
}
