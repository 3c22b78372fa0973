// YAML description of a generated corpus, for humans and for replaying a run
// from its seed.

use serde::Serialize;

use crate::config::RunConfig;
use crate::error::Result;
use crate::generator::Vector;
use crate::planner::{Direction, SecondaryMaterial};
use crate::variant::{Architecture, CipherMode, CounterLayout};

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    index: usize,
    direction: Direction,
    key_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_hex: Option<String>,
    input_length: usize,
    corrupted: bool,
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    module: String,
    key_bits: usize,
    mode: CipherMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    counter: Option<CounterLayout>,
    architecture: Architecture,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    single: bool,
    corrupt: bool,
    vectors: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(config: &RunConfig, seed: Option<u64>) -> Self {
        let variant = &config.variant;
        Self {
            module: variant.name.to_string(),
            key_bits: variant.key_size.bits(),
            mode: variant.mode,
            counter: variant.counter,
            architecture: variant.arch,
            seed,
            single: config.is_single(),
            corrupt: config.corrupt,
            vectors: Vec::with_capacity(config.corpus_len()),
        }
    }

    pub fn push(&mut self, config: &RunConfig, vector: &Vector) {
        let plan = &vector.plan;
        let secondary_hex = match plan.secondary {
            SecondaryMaterial::None => None,
            ref material => Some(hex::encode(material.wire_bytes())),
        };

        self.vectors.push(ManifestEntry {
            name: format!("{}_{:04}", config.variant.name, plan.index),
            description: vector
                .corrupted
                .then(|| "bad packet: last byte of expected output inverted".to_string()),
            index: plan.index,
            direction: plan.direction,
            key_hex: hex::encode(&plan.key),
            secondary_hex,
            input_length: plan.input.len(),
            corrupted: vector.corrupted,
        });
    }

    pub fn to_yaml(&self) -> Result<String> {
        let header = format!(
            "# AES stimulus corpus manifest\n\
             # Generated by gen_aes_stimulus ({})\n\
             # Records live in pkts_in.txt / pkts_out.txt, one line per entry below.\n\n",
            self.module
        );
        Ok(header + &serde_yaml::to_string(self)?)
    }
}
