//! Clap-derive argument definitions for the three subcommands this crate
//! exposes: `gram` (build a grammar), `decomp` (decompress one), and `bwt`
//! (build the Burrows-Wheeler transform of a decompressed grammar).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = crate::cli::constants::TOOL_NAME, author = crate::cli::constants::AUTHOR, version)]
pub struct Cli {
    /// Verbosity: 0 silent, 1 errors, 2 normal, 3 verbose.
    #[arg(short = 'v', long = "verbose", global = true, default_value_t = 2)]
    pub verbosity: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a grammar from a text file.
    Gram(GramArgs),
    /// Decompress a grammar back to bytes.
    Decomp(DecompArgs),
    /// Build the Burrows-Wheeler transform of a grammar's decompressed text.
    Bwt(BwtArgs),
}

#[derive(Parser, Debug)]
pub struct GramArgs {
    /// Input text file, or "stdin".
    pub text: String,

    /// Output grammar container path, or "stdout". Defaults to `TEXT.gram`.
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Number of round worker threads (0 = auto).
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    pub threads: usize,

    /// Fraction of the input size usable for combined thread-local hash buffers.
    #[arg(short = 'f', long = "hbuff", default_value_t = crate::config::HBUFF_FRAC_DEFAULT)]
    pub hbuff_frac: f32,

    /// Directory to create the round's scoped scratch directory under.
    #[arg(short = 'T', long = "tmpdir")]
    pub tmpdir: Option<PathBuf>,

    /// Container compression level: 1 (plain packed rule stream) or 2 (shaped).
    #[arg(short = 'L', long = "level", default_value_t = crate::config::COMP_LEVEL_DEFAULT, value_parser = parse_level)]
    pub level: u8,

    /// Separator byte marking string boundaries in multi-string mode.
    #[arg(long = "sep", default_value_t = crate::config::DEFAULT_SEPARATOR)]
    pub separator: u8,
}

#[derive(Parser, Debug)]
pub struct DecompArgs {
    /// Input grammar container path, or "stdin".
    pub gram: String,

    /// Output text path, or "stdout". Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Number of worker threads (currently unused by the walker; reserved
    /// for parity with `gram`/`bwt`).
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    pub threads: usize,

    /// Directory to create the scoped scratch directory under.
    #[arg(short = 'T', long = "tmpdir")]
    pub tmpdir: Option<PathBuf>,

    /// Keep the input grammar file after a successful decompression (by
    /// default it is removed, mirroring the common decompressor convention
    /// of consuming its compressed input).
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Output buffer size in MiB.
    #[arg(short = 'B', long = "buffer-mib", default_value_t = (crate::config::FILE_BUFFER_DEFAULT / crate::cli::constants::MB as usize) as u32)]
    pub buffer_mib: u32,
}

#[derive(Parser, Debug)]
pub struct BwtArgs {
    /// Input grammar container path, or "stdin".
    pub gram: String,

    /// Output path for the BWT bytes plus primary index, or "stdout".
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Number of worker threads (reserved; the BWT builder is single-threaded).
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    pub threads: usize,

    /// Directory to create the scoped scratch directory under.
    #[arg(short = 'T', long = "tmpdir")]
    pub tmpdir: Option<PathBuf>,
}

fn parse_level(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(1) => Ok(1),
        Ok(2) => Ok(2),
        _ => Err(format!("compression level must be 1 or 2, got {s}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn gram_subcommand_parses_minimal_args() {
        let cli = Cli::parse_from(["lcgram", "gram", "input.txt"]);
        match cli.command {
            Command::Gram(a) => {
                assert_eq!(a.text, "input.txt");
                assert_eq!(a.level, 1);
            }
            _ => panic!("expected Gram subcommand"),
        }
    }

    #[test]
    fn gram_rejects_bad_level() {
        let result = Cli::try_parse_from(["lcgram", "gram", "input.txt", "-L", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn decomp_subcommand_parses_keep_flag() {
        let cli = Cli::parse_from(["lcgram", "decomp", "input.gram", "-k"]);
        match cli.command {
            Command::Decomp(a) => assert!(a.keep),
            _ => panic!("expected Decomp subcommand"),
        }
    }
}
