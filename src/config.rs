// config.rs — configuration constants for the grammar pipeline.
//
// IS_CONSOLE(stream) equivalents are handled at each CLI call site via
// std::io::IsTerminal; no constant is needed for that here.

/// Default compression level, written as the container's leading version byte.
/// Level 1 uses a plain packed rule stream; level 2 shapes the rule stream
/// with a variable-width code favoring frequent ids (see [`crate::grammar`]).
pub const COMP_LEVEL_DEFAULT: u8 = 1;

/// Whether the multi-threaded round driver is compiled in.
pub const MULTITHREAD: bool = cfg!(feature = "multithread") || true;

/// Default number of worker threads for a round, when `-t 0` (auto) is given.
pub const NB_WORKERS_DEFAULT: usize = 4;

/// Maximum number of round worker threads selectable from the CLI.
pub const NB_WORKERS_MAX: usize = 200;

/// Default fraction of the input size the hashing stage may use for its
/// combined thread-local hash buffers (`-f` / `--hbuff`).
pub const HBUFF_FRAC_DEFAULT: f32 = 0.15;

/// Default file I/O buffer size (bytes) used by the decompression walker.
pub const FILE_BUFFER_DEFAULT: usize = 16 * 1024 * 1024;

/// Default separator byte marking string boundaries in multi-string mode.
pub const DEFAULT_SEPARATOR: u8 = b'\n';
