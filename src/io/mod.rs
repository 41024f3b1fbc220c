//! File I/O orchestration for the CLI: resolving source/destination paths
//! (including the `stdin`/`stdout`/`/dev/null` sentinels) to readers and
//! writers used by the `gram`, `decomp`, and `bwt` subcommands.

pub mod file_io;

pub use file_io::{open_dst_file, open_src_file, read_all, DstFile, NUL_MARK, STDIN_MARK, STDOUT_MARK};
