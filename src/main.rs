//! Binary entry point: dispatches to the `gram`, `decomp`, and `bwt`
//! subcommands over the locally-consistent grammar pipeline.

use anyhow::{Context, Result};
use clap::Parser;

use lc_gram::cli::args::{BwtArgs, Cli, Command, DecompArgs, GramArgs};
use lc_gram::cli::constants::set_display_level;
use lc_gram::io::{open_dst_file, read_all};
use lc_gram::tempdir::RoundTempDir;
use lc_gram::{bwt, decompress, Grammar};

fn main() {
    let cli = Cli::parse();
    set_display_level(cli.verbosity);

    let result = match cli.command {
        Command::Gram(args) => run_gram(args),
        Command::Decomp(args) => run_decomp(args),
        Command::Bwt(args) => run_bwt(args),
    };

    if let Err(e) = result {
        lc_gram::displaylevel!(1, "{:#}\n", e);
        std::process::exit(1);
    }
}

fn run_gram(args: GramArgs) -> Result<()> {
    let input = read_all(&args.text).with_context(|| format!("reading {}", args.text))?;

    let _scratch = RoundTempDir::new(args.tmpdir.as_deref())
        .context("could not create scratch directory")?;

    let n_threads = if args.threads == 0 { lc_gram::util::count_cores() } else { args.threads };
    lc_gram::displaylevel!(3, "Using {} round worker threads\n", n_threads);

    let clock_start = lc_gram::timefn::get_time();
    let grammar = lc_gram::compress(&input, args.separator, n_threads, args.level)?;
    let elapsed_ns = lc_gram::timefn::clock_span_ns(clock_start);

    lc_gram::displaylevel!(
        2,
        "{} -> {} rules, grammar size {}, start rule length {}, {:.3}s\n",
        args.text,
        grammar.rule_count(),
        grammar.grammar_size(),
        grammar.start_rule_len(),
        elapsed_ns as f64 / 1e9
    );

    let output = args.output.unwrap_or_else(|| format!("{}.gram", args.text));
    let mut dst = open_dst_file(&output).with_context(|| format!("opening {output}"))?;
    grammar.serialize(&mut dst).with_context(|| format!("writing {output}"))?;
    Ok(())
}

fn run_decomp(args: DecompArgs) -> Result<()> {
    let _scratch = RoundTempDir::new(args.tmpdir.as_deref())
        .context("could not create scratch directory")?;
    lc_gram::displaylevel!(4, "output buffer: {} MiB\n", args.buffer_mib);

    let raw = read_all(&args.gram).with_context(|| format!("reading {}", args.gram))?;
    let grammar = Grammar::deserialize(&mut &raw[..]).context("decoding grammar container")?;

    let bytes = decompress(&grammar);
    let output = args.output.unwrap_or_else(|| lc_gram::io::STDOUT_MARK.to_owned());
    let mut dst = open_dst_file(&output).with_context(|| format!("opening {output}"))?;
    use std::io::Write;
    dst.write_all(&bytes).with_context(|| format!("writing {output}"))?;

    if !args.keep && args.gram != lc_gram::io::STDIN_MARK {
        if let Err(e) = std::fs::remove_file(&args.gram) {
            lc_gram::displaylevel!(2, "warning: could not remove {}: {}\n", args.gram, e);
        }
    }
    Ok(())
}

fn run_bwt(args: BwtArgs) -> Result<()> {
    let _scratch = RoundTempDir::new(args.tmpdir.as_deref())
        .context("could not create scratch directory")?;

    let raw = read_all(&args.gram).with_context(|| format!("reading {}", args.gram))?;
    let grammar = Grammar::deserialize(&mut &raw[..]).context("decoding grammar container")?;
    let transform = bwt::build_from_grammar(&grammar).context("building Burrows-Wheeler transform")?;

    let output = args.output.unwrap_or_else(|| lc_gram::io::STDOUT_MARK.to_owned());
    let mut dst = open_dst_file(&output).with_context(|| format!("opening {output}"))?;
    use std::io::Write;
    dst.write_all(&(transform.primary_index as u64).to_le_bytes())
        .with_context(|| format!("writing {output}"))?;
    dst.write_all(&transform.bytes).with_context(|| format!("writing {output}"))?;
    Ok(())
}
