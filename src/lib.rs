//! Randomized stimulus corpora for AES hardware testbenches.
//!
//! A run picks one hardware variant, draws fresh keys, IVs/counters and
//! payloads per vector, computes the reference AES result and writes two
//! line-aligned files (`pkts_in.txt`, `pkts_out.txt`) plus the `tb_conf.svh`
//! defines the testbench is built with.

pub mod conf;
pub mod config;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod planner;
pub mod transform;
pub mod variant;
pub mod verify;

pub use config::{Interface, RunConfig};
pub use error::{Error, Result};
pub use generator::{publish, CorpusGenerator, CorpusSummary, OutputPaths, Vector};
pub use planner::{Direction, SecondaryMaterial};
pub use variant::{CipherMode, KeySize, Variant, VARIANTS};
