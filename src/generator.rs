// Corpus generation: plan -> transform -> encode, one vector at a time, in
// index order.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{CryptoRng, Rng};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

use crate::conf;
use crate::config::RunConfig;
use crate::encoder;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::planner::{Direction, Plan, Planner};
use crate::transform::transform;

pub const PKTS_IN: &str = "pkts_in.txt";
pub const PKTS_OUT: &str = "pkts_out.txt";
pub const TB_CONF: &str = "tb_conf.svh";

/// A planned vector with its reference output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector {
    pub plan: Plan,
    pub output: Vec<u8>,
    /// Last output byte has been bit-inverted.
    pub corrupted: bool,
}

impl Vector {
    pub fn inject_corruption(&mut self) {
        if let Some(last) = self.output.last_mut() {
            *last = !*last;
            self.corrupted = true;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusSummary {
    pub vectors: usize,
    pub encrypt: usize,
    pub decrypt: usize,
    pub corrupted: usize,
    pub payload_bytes: usize,
}

impl CorpusSummary {
    fn record(&mut self, vector: &Vector) {
        self.vectors += 1;
        match vector.plan.direction {
            Direction::Encrypt => self.encrypt += 1,
            Direction::Decrypt => self.decrypt += 1,
        }
        if vector.corrupted {
            self.corrupted += 1;
        }
        self.payload_bytes += vector.plan.input.len();
    }
}

pub struct CorpusGenerator<'a> {
    config: &'a RunConfig,
}

impl<'a> CorpusGenerator<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Builds vector `index`: plan, reference transform, optional corruption.
    pub fn vector<R: Rng + CryptoRng>(&self, index: usize, rng: &mut R) -> Result<Vector> {
        let plan = Planner::new(self.config).plan(index, rng)?;
        let output = transform(
            self.config.variant.key_size,
            &plan.key,
            &plan.secondary,
            plan.direction,
            &plan.input,
        )?;

        let mut vector = Vector { plan, output, corrupted: false };
        if self.config.corrupt {
            vector.inject_corruption();
        }
        Ok(vector)
    }

    pub fn generate<R, I, O>(&self, rng: &mut R, pkts_in: &mut I, pkts_out: &mut O) -> Result<CorpusSummary>
    where
        R: Rng + CryptoRng,
        I: Write,
        O: Write,
    {
        self.generate_with(rng, pkts_in, pkts_out, |_| {})
    }

    /// Like [`generate`](Self::generate), handing every vector to `observe`
    /// once both of its records are written.
    pub fn generate_with<R, I, O, F>(
        &self,
        rng: &mut R,
        pkts_in: &mut I,
        pkts_out: &mut O,
        mut observe: F,
    ) -> Result<CorpusSummary>
    where
        R: Rng + CryptoRng,
        I: Write,
        O: Write,
        F: FnMut(&Vector),
    {
        let direction_bit = self.config.variant.caps.direction_bit;
        let mut summary = CorpusSummary::default();

        for index in 1..=self.config.corpus_len() {
            let vector = self.vector(index, rng)?;
            let record = encoder::encode(&vector, direction_bit);
            writeln!(pkts_in, "{}", record.stimulus_in)?;
            writeln!(pkts_out, "{}", record.stimulus_out)?;

            debug!(
                index,
                direction = ?vector.plan.direction,
                len = vector.plan.input.len(),
                corrupted = vector.corrupted,
                "vector written"
            );
            summary.record(&vector);
            observe(&vector);
        }

        Ok(summary)
    }
}

/// Where a run's artifacts are published.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub stimulus_dir: PathBuf,
    pub include_dir: PathBuf,
    pub manifest: Option<PathBuf>,
}

impl OutputPaths {
    pub fn pkts_in(&self) -> PathBuf {
        self.stimulus_dir.join(PKTS_IN)
    }

    pub fn pkts_out(&self) -> PathBuf {
        self.stimulus_dir.join(PKTS_OUT)
    }

    pub fn tb_conf(&self) -> PathBuf {
        self.include_dir.join(TB_CONF)
    }
}

fn staging_file(target: &Path) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let file = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    file.as_file().set_permissions(published_permissions(target)?)?;
    Ok(file)
}

/// Mode of the file being replaced, or 0644 for a new one. Temp files are
/// created owner-only, which the simulator side may not be able to read.
#[cfg(unix)]
fn published_permissions(target: &Path) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(target) {
        Ok(meta) if meta.is_file() => Ok(meta.permissions()),
        Ok(_) => Ok(fs::Permissions::from_mode(0o644)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(fs::Permissions::from_mode(0o644)),
        Err(e) => Err(e),
    }
}

/// Copy of an existing target, kept until every staged file is in place.
fn backup(target: &Path) -> Result<Option<TempPath>> {
    if !target.is_file() {
        return Ok(None);
    }
    let copy = staging_file(target)?.into_temp_path();
    fs::copy(target, &copy)?;
    Ok(Some(copy))
}

/// Renames every staged file onto its target. If one rename fails, targets
/// already replaced get their previous contents back (or are removed when
/// they did not exist), so the stimulus pair never mixes two runs.
fn commit(staged: Vec<(NamedTempFile, PathBuf)>) -> Result<()> {
    let mut done: Vec<(PathBuf, Option<TempPath>)> = Vec::with_capacity(staged.len());

    for (file, target) in staged {
        let previous = match backup(&target) {
            Ok(previous) => previous,
            Err(e) => {
                rollback(done);
                return Err(e);
            }
        };
        if let Err(e) = file.persist(&target) {
            rollback(done);
            return Err(e.error.into());
        }
        done.push((target, previous));
    }
    Ok(())
}

fn rollback(done: Vec<(PathBuf, Option<TempPath>)>) {
    for (target, previous) in done.into_iter().rev() {
        let restored = match previous {
            Some(copy) => copy.persist(&target).map_err(|e| e.error),
            None => fs::remove_file(&target),
        };
        if let Err(e) = restored {
            warn!(target = %target.display(), error = %e, "failed to restore previous artifact");
        }
    }
}

pub fn publish<R: Rng + CryptoRng>(
    config: &RunConfig,
    seed: Option<u64>,
    rng: &mut R,
    paths: &OutputPaths,
) -> Result<CorpusSummary> {
    let (pkts_in_path, pkts_out_path, tb_conf_path) = (paths.pkts_in(), paths.pkts_out(), paths.tb_conf());

    let mut pkts_in = staging_file(&pkts_in_path)?;
    let mut pkts_out = staging_file(&pkts_out_path)?;
    let mut manifest = paths.manifest.as_ref().map(|_| Manifest::new(config, seed));

    let summary = {
        let mut w_in = BufWriter::new(&mut pkts_in);
        let mut w_out = BufWriter::new(&mut pkts_out);
        let summary = CorpusGenerator::new(config).generate_with(rng, &mut w_in, &mut w_out, |v| {
            if let Some(m) = manifest.as_mut() {
                m.push(config, v);
            }
        })?;
        w_in.flush()?;
        w_out.flush()?;
        summary
    };

    let mut tb_conf = staging_file(&tb_conf_path)?;
    tb_conf.write_all(conf::render(config).as_bytes())?;

    let mut staged = vec![
        (pkts_in, pkts_in_path.clone()),
        (pkts_out, pkts_out_path.clone()),
        (tb_conf, tb_conf_path.clone()),
    ];
    if let (Some(path), Some(m)) = (&paths.manifest, &manifest) {
        let mut file = staging_file(path)?;
        file.write_all(m.to_yaml()?.as_bytes())?;
        staged.push((file, path.clone()));
    }

    commit(staged)?;

    info!(
        module = config.variant.name,
        vectors = summary.vectors,
        encrypt = summary.encrypt,
        decrypt = summary.decrypt,
        corrupted = summary.corrupted,
        "written {} and {}",
        pkts_in_path.display(),
        pkts_out_path.display()
    );
    info!("written {}", tb_conf_path.display());

    Ok(summary)
}
