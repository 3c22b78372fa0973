// Generate AES stimulus corpora for the hardware testbench
// Run: cargo run --release --bin gen_aes_stimulus -- -m aes256_cbc_iter -n 100
//
// Outputs:
// - <stimulus-dir>/pkts_in.txt   key material + input payload per vector
// - <stimulus-dir>/pkts_out.txt  expected output per vector
// - <include-dir>/tb_conf.svh    DUT selector and AXI-stream parameters

use std::path::PathBuf;

use aes_stimulus::{publish, Interface, OutputPaths, RunConfig, Variant, VARIANTS};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gen_aes_stimulus", version, about = "AES Stimulus Generator")]
struct Cli {
    /// Module version (e.g. aes256_cbc_iter)
    #[arg(short = 'm', default_value = "aes256_cbc_iter")]
    module: Variant,

    /// Number of test vectors; payload size in single/bad packet mode
    #[arg(short = 'n', default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    vectors: u64,

    /// S_AXIS.tdata width in bits
    #[arg(long = "ws", default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..))]
    slave_width: u32,

    /// M_AXIS.tdata width in bits
    #[arg(long = "wm", default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..))]
    master_width: u32,

    /// Driver delay in clock periods
    #[arg(long = "ds", default_value_t = 0)]
    slave_delay: u32,

    /// Monitor delay in clock periods
    #[arg(long = "dm", default_value_t = 0)]
    master_delay: u32,

    /// Generate exactly one packet of -n blocks (ECB/CBC) or bytes (CTR)
    #[arg(long, action = ArgAction::SetTrue)]
    single: bool,

    /// Generate one bad packet whose expected output has its last byte inverted
    #[arg(long, action = ArgAction::SetTrue)]
    corrupt: bool,

    /// Seed for the ChaCha20 generator; drawn from the OS when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Directory receiving pkts_in.txt and pkts_out.txt
    #[arg(long, default_value = "stimulus")]
    stimulus_dir: PathBuf,

    /// Directory receiving tb_conf.svh
    #[arg(long, default_value = "include")]
    include_dir: PathBuf,

    /// Also write a YAML manifest of the corpus
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Print the supported module types and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let default = match (quiet, verbosity) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity, cli.quiet);

    if cli.list {
        for v in VARIANTS {
            println!("{:<22} {:>3}-bit {}", v.name, v.key_size.bits(), v.mode);
        }
        return Ok(());
    }

    let interface = Interface {
        slave_width: cli.slave_width,
        master_width: cli.master_width,
        slave_delay: cli.slave_delay,
        master_delay: cli.master_delay,
    };
    let vectors = usize::try_from(cli.vectors).context("vector count does not fit in memory")?;
    let config = RunConfig::new(cli.module, vectors, cli.single, cli.corrupt, interface)?;

    let seed = cli.seed.unwrap_or_else(|| OsRng.next_u64());
    info!(module = config.variant.name, seed, "generating {} vector(s)", config.corpus_len());
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let paths = OutputPaths {
        stimulus_dir: cli.stimulus_dir,
        include_dir: cli.include_dir,
        manifest: cli.manifest,
    };
    publish(&config, Some(seed), &mut rng, &paths)
        .with_context(|| format!("failed to write corpus for {}", config.variant.name))?;

    Ok(())
}
