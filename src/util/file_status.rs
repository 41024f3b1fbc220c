//! File-type queries used by the I/O layer to validate CLI arguments.

use std::path::Path;

/// Returns `true` if `path` refers to a directory.
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_directory_detects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_directory(dir.path()));
    }

    #[test]
    fn is_directory_false_for_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"x").unwrap();
        assert!(!is_directory(&path));
    }
}
