// Verify an AES stimulus corpus against the reference transform
// Run: cargo run --release --bin verify_aes_stimulus -- -m aes256_ctr_pipe

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aes_stimulus::generator::{PKTS_IN, PKTS_OUT};
use aes_stimulus::verify::{verify_corpus, Verdict};
use aes_stimulus::Variant;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "verify_aes_stimulus", version, about = "AES Stimulus Verifier")]
struct Cli {
    /// Module version the corpus was generated for
    #[arg(short = 'm', default_value = "aes256_cbc_iter")]
    module: Variant,

    /// Directory holding pkts_in.txt and pkts_out.txt
    #[arg(long, default_value = "stimulus")]
    stimulus_dir: PathBuf,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn run(cli: &Cli) -> Result<bool> {
    let in_path = cli.stimulus_dir.join(PKTS_IN);
    let out_path = cli.stimulus_dir.join(PKTS_OUT);

    let report = verify_corpus(&cli.module, open(&in_path)?, open(&out_path)?)
        .with_context(|| format!("failed to verify {}", in_path.display()))?;

    if report.in_lines != report.out_lines {
        warn!(
            "{} has {} lines, {} has {}",
            in_path.display(),
            report.in_lines,
            out_path.display(),
            report.out_lines
        );
    }
    for l in report.lines.iter().filter(|l| l.verdict == Verdict::Mismatch) {
        warn!(line = l.line, "expected output does not match the reference transform");
    }
    for l in report.lines.iter().filter(|l| l.verdict == Verdict::Corrupted) {
        info!(line = l.line, "bad packet (last byte inverted)");
    }

    info!(
        module = cli.module.name,
        matched = report.count(Verdict::Match),
        corrupted = report.count(Verdict::Corrupted),
        mismatched = report.count(Verdict::Mismatch),
        "verified {} record(s)",
        report.lines.len()
    );
    Ok(report.is_consistent())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(&Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
