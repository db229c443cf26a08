use std::path::Path;

use tracing::debug;

/// A usable artifact is an existing, non-empty regular file.
///
/// Missing files, empty files and probe failures all report `false`.
pub async fn is_valid(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            debug!("Cannot probe artifact {:?}: {}", path, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_empty_file_is_valid() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("lib.jar");
        std::fs::write(&jar, b"PK").unwrap();

        assert!(is_valid(&jar).await);
    }

    #[tokio::test]
    async fn missing_empty_and_directory_paths_are_invalid() {
        let temp = tempfile::tempdir().unwrap();
        let empty = temp.path().join("empty.jar");
        std::fs::write(&empty, b"").unwrap();

        assert!(!is_valid(&temp.path().join("missing.jar")).await);
        assert!(!is_valid(&empty).await);
        assert!(!is_valid(temp.path()).await);
    }
}
