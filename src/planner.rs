// Per-vector parameter selection.

use rand::{CryptoRng, Rng, RngCore};
use serde::Serialize;

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::transform::counter_block;
use crate::variant::{CipherMode, CounterLayout, Variant, AES_BLOCK_SIZE, AES_NONCE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    /// Record-level flag: `1` encrypt, `0` decrypt.
    pub fn bit(self) -> &'static str {
        match self {
            Direction::Encrypt => "1",
            Direction::Decrypt => "0",
        }
    }

    pub fn from_bit(bit: &str) -> Option<Self> {
        match bit {
            "1" => Some(Direction::Encrypt),
            "0" => Some(Direction::Decrypt),
            _ => None,
        }
    }
}

/// Mode-specific parameter beyond the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryMaterial {
    /// ECB
    None,
    /// CBC initialization vector.
    Iv([u8; AES_BLOCK_SIZE]),
    /// Raw 128-bit initial counter block.
    CounterSeed([u8; AES_BLOCK_SIZE]),
    /// Nonce of a counter block whose 32-bit counter starts at zero.
    Nonce([u8; AES_NONCE_SIZE]),
}

impl SecondaryMaterial {
    /// The bytes written between key and payload in a stimulus-in record.
    pub fn wire_bytes(&self) -> Vec<u8> {
        match self {
            SecondaryMaterial::None => Vec::new(),
            SecondaryMaterial::Iv(iv) => iv.to_vec(),
            SecondaryMaterial::CounterSeed(seed) => seed.to_vec(),
            SecondaryMaterial::Nonce(nonce) => counter_block(nonce).to_vec(),
        }
    }

    fn random<R: RngCore + CryptoRng>(variant: &Variant, rng: &mut R) -> Self {
        match (variant.mode, variant.counter) {
            (CipherMode::Ecb, _) => SecondaryMaterial::None,
            (CipherMode::Cbc, _) => SecondaryMaterial::Iv(random_bytes(rng)),
            (CipherMode::Ctr, Some(CounterLayout::FromZero)) => {
                SecondaryMaterial::Nonce(random_bytes(rng))
            }
            (CipherMode::Ctr, _) => SecondaryMaterial::CounterSeed(random_bytes(rng)),
        }
    }
}

fn random_bytes<const N: usize, R: RngCore>(rng: &mut R) -> [u8; N] {
    let mut bytes = [0u8; N];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Inputs of one vector, before the reference transform runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// 1-based position in the corpus.
    pub index: usize,
    pub direction: Direction,
    pub key: Vec<u8>,
    pub secondary: SecondaryMaterial,
    /// Plaintext when encrypting, ciphertext when decrypting.
    pub input: Vec<u8>,
}

/// Payload size for `units`: whole blocks in ECB/CBC, bytes in CTR.
pub fn payload_len(mode: CipherMode, units: usize) -> Result<usize> {
    if mode.is_block_oriented() {
        units.checked_mul(AES_BLOCK_SIZE).ok_or(Error::PayloadTooLarge { units })
    } else {
        Ok(units)
    }
}

pub struct Planner<'a> {
    config: &'a RunConfig,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Ramp runs scale with the vector index; single runs use the requested
    /// count directly as the payload size.
    pub fn payload_len(&self, index: usize) -> Result<usize> {
        let units = if self.config.is_single() { self.config.vectors } else { index };
        payload_len(self.config.variant.mode, units)
    }

    /// Draws key, secondary material, direction and payload, in that order.
    pub fn plan<R: Rng + CryptoRng>(&self, index: usize, rng: &mut R) -> Result<Plan> {
        let variant = &self.config.variant;

        let mut key = vec![0u8; variant.key_size.bytes()];
        rng.fill_bytes(&mut key);

        let secondary = SecondaryMaterial::random(variant, rng);

        let direction = if variant.caps.direction_bit && !rng.gen_bool(0.5) {
            Direction::Decrypt
        } else {
            Direction::Encrypt
        };

        let mut input = vec![0u8; self.payload_len(index)?];
        rng.fill_bytes(&mut input);

        Ok(Plan { index, direction, key, secondary, input })
    }
}
