//! File I/O primitives for the `gram`/`decomp`/`bwt` CLI surface.
//!
//! - [`open_src_file`] — resolves a path string to a `Box<dyn Read>`,
//!   handling the `"stdin"` sentinel and rejecting directories.
//! - [`open_dst_file`] — resolves a path string to a [`DstFile`], handling
//!   the `"stdout"` and `/dev/null` sentinels and enforcing the overwrite
//!   policy from [`crate::config`].
//!
//! Sentinel string constants ([`STDIN_MARK`], [`STDOUT_MARK`], [`NUL_MARK`])
//! are re-exported so callers can compare against them without embedding
//! magic strings.
//!
//! Verbosity-gated diagnostics are emitted via stderr using the global
//! [`crate::cli::constants::DISPLAY_LEVEL`] atomic.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use std::sync::atomic::Ordering;

use crate::cli::constants::DISPLAY_LEVEL;
use crate::util::is_directory;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

/// Sentinel: discard output (write to /dev/null or equivalent).
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";

#[inline]
fn is_dev_null(s: &str) -> bool {
    s == NUL_MARK
}

#[inline]
fn is_stdin(s: &str) -> bool {
    s == STDIN_MARK
}

#[inline]
fn is_stdout(s: &str) -> bool {
    s == STDOUT_MARK
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source file for reading, returning a boxed [`Read`].
///
/// - If `path` is the sentinel `"stdin"`, returns standard input.
/// - If `path` is a directory, returns an [`io::ErrorKind::InvalidInput`] error.
/// - Otherwise opens the file and wraps it in a [`BufReader`] for efficient
///   sequential reads.
pub fn open_src_file(path: &str) -> io::Result<Box<dyn Read>> {
    if is_stdin(path) {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 4 {
            eprintln!("Using stdin for input");
        }
        return Ok(Box::new(io::stdin()));
    }

    if is_directory(Path::new(path)) {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 1 {
            eprintln!("gram: {path} is a directory -- ignored");
        }
        return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("{path}: is a directory")));
    }

    let f = File::open(path).map_err(|e| {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 1 {
            eprintln!("{path}: {e}");
        }
        e
    })?;
    Ok(Box::new(BufReader::new(f)))
}

/// Reads the whole contents of `path` (or stdin) into memory.
pub fn read_all(path: &str) -> io::Result<Vec<u8>> {
    let mut reader = open_src_file(path)?;
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// A write-capable destination produced by [`open_dst_file`].
pub struct DstFile {
    inner: Box<dyn Write>,
    pub is_stdout: bool,
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens a destination for writing, returning a [`DstFile`].
///
/// Resolves special sentinels before touching the filesystem:
/// - `"stdout"` → stdout.
/// - [`NUL_MARK`] → [`io::sink`] (all bytes discarded, no file created).
///
/// For regular paths, an existing file is always truncated; this crate has
/// no interactive overwrite prompt, unlike compressors meant for terminal use.
pub fn open_dst_file(path: &str) -> io::Result<DstFile> {
    if is_stdout(path) {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 4 {
            eprintln!("Using stdout for output");
        }
        return Ok(DstFile { inner: Box::new(io::stdout()), is_stdout: true });
    }

    if is_dev_null(path) {
        return Ok(DstFile { inner: Box::new(io::sink()), is_stdout: false });
    }

    let f = OpenOptions::new().write(true).create(true).truncate(true).open(path).map_err(|e| {
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 1 {
            eprintln!("{path}: {e}");
        }
        e
    })?;
    Ok(DstFile { inner: Box::new(f), is_stdout: false })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_src_file_nonexistent_returns_err() {
        let result = open_src_file("/nonexistent/path/that/cannot/exist.gram");
        assert!(result.is_err());
    }

    #[test]
    fn read_all_round_trips_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, b"hello gram").unwrap();
        let data = read_all(path.to_str().unwrap()).unwrap();
        assert_eq!(data, b"hello gram");
    }

    #[test]
    fn open_src_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = match open_src_file(dir.path().to_str().unwrap()) {
            Err(e) => e,
            Ok(_) => panic!("expected an error when opening a directory"),
        };
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn open_dst_file_stdout_sentinel() {
        let dst = open_dst_file(STDOUT_MARK).unwrap();
        assert!(dst.is_stdout);
    }

    #[test]
    fn open_dst_file_devnull_sentinel() {
        let dst = open_dst_file(NUL_MARK).unwrap();
        assert!(!dst.is_stdout);
    }

    #[test]
    fn open_dst_file_creates_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        {
            let mut w = open_dst_file(path.to_str().unwrap()).unwrap();
            w.write_all(b"first").unwrap();
        }
        {
            let mut w = open_dst_file(path.to_str().unwrap()).unwrap();
            w.write_all(b"second").unwrap();
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn sentinel_constants() {
        assert_eq!(STDIN_MARK, "stdin");
        assert_eq!(STDOUT_MARK, "stdout");
        #[cfg(not(windows))]
        assert_eq!(NUL_MARK, "/dev/null");
    }
}
