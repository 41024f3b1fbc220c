//! Scoped temporary-directory lifecycle for a round's intermediate files
//! (thread-local hash table dumps, rewrite output segments).
//!
//! Every file created under the returned directory is removed when the
//! round exits, on every exit path including a fatal error, because the
//! directory itself is removed on drop. Mirrors the source's
//! `create_temp_folder` contract without needing an explicit cleanup call
//! on error paths.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Owns one round's scratch directory. Dropping it removes the directory
/// and everything a worker wrote into it.
pub struct RoundTempDir {
    dir: TempDir,
}

impl RoundTempDir {
    /// Creates a fresh scratch directory under `parent` (or the system
    /// temp directory if `parent` is `None`).
    pub fn new(parent: Option<&Path>) -> Result<Self> {
        let dir = match parent {
            Some(p) => tempfile::Builder::new().prefix("lc-gram-round-").tempdir_in(p)?,
            None => tempfile::Builder::new().prefix("lc-gram-round-").tempdir()?,
        };
        Ok(RoundTempDir { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for worker `i`'s hash-table dump file within this round.
    pub fn dump_path(&self, worker: usize) -> PathBuf {
        self.path().join(format!("worker-{worker}.dump"))
    }

    /// Path for worker `i`'s rewrite output segment within this round.
    pub fn output_path(&self, worker: usize) -> PathBuf {
        self.path().join(format!("worker-{worker}.out"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_exists_while_held_and_removed_on_drop() {
        let path;
        {
            let d = RoundTempDir::new(None).unwrap();
            path = d.path().to_path_buf();
            assert!(path.exists());
            std::fs::write(d.dump_path(0), b"data").unwrap();
            assert!(d.dump_path(0).exists());
        }
        assert!(!path.exists());
    }
}
