// Stimulus record format.
//
//   pkts_in.txt   [<dir> ]hex(key || secondary || input)
//   pkts_out.txt  [<dir> ]hex(output)
//
// The direction bit and its separating space are present only for variants
// that model direction. Hex is lowercase without separators.

use crate::error::{Error, Result};
use crate::generator::Vector;
use crate::planner::{Direction, SecondaryMaterial};
use crate::variant::{CipherMode, CounterLayout, Variant, AES_BLOCK_SIZE, AES_NONCE_SIZE};

/// One line of each stimulus file, without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub stimulus_in: String,
    pub stimulus_out: String,
}

pub fn encode(vector: &Vector, direction_bit: bool) -> Record {
    let plan = &vector.plan;

    let mut material = Vec::with_capacity(plan.key.len() + AES_BLOCK_SIZE + plan.input.len());
    material.extend_from_slice(&plan.key);
    material.extend_from_slice(&plan.secondary.wire_bytes());
    material.extend_from_slice(&plan.input);

    let stimulus_in = hex::encode(&material);
    let stimulus_out = hex::encode(&vector.output);

    if direction_bit {
        let bit = plan.direction.bit();
        Record {
            stimulus_in: format!("{} {}", bit, stimulus_in),
            stimulus_out: format!("{} {}", bit, stimulus_out),
        }
    } else {
        Record { stimulus_in, stimulus_out }
    }
}

/// A stimulus-in line split back into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub direction: Direction,
    pub key: Vec<u8>,
    pub secondary: SecondaryMaterial,
    pub input: Vec<u8>,
}

/// A stimulus-out line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// `None` for variants without a direction bit.
    pub direction: Option<Direction>,
    pub output: Vec<u8>,
}

fn split_direction<'a>(
    variant: &Variant,
    text: &'a str,
    line: usize,
) -> Result<(Option<Direction>, &'a str)> {
    if !variant.caps.direction_bit {
        return Ok((None, text));
    }
    let (bit, rest) = text.split_once(' ').ok_or_else(|| Error::Record {
        line,
        reason: "missing direction bit".to_string(),
    })?;
    let direction = Direction::from_bit(bit).ok_or_else(|| Error::Record {
        line,
        reason: format!("invalid direction bit `{}`", bit),
    })?;
    Ok((Some(direction), rest))
}

fn decode_hex(text: &str, line: usize) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| Error::Record { line, reason: e.to_string() })
}

pub fn decode_input(variant: &Variant, text: &str, line: usize) -> Result<InputRecord> {
    let (direction, hex_part) = split_direction(variant, text, line)?;
    let mut bytes = decode_hex(hex_part, line)?;

    let prefix = variant.prefix_len();
    if bytes.len() < prefix {
        return Err(Error::Record {
            line,
            reason: format!("record holds {} bytes, key material alone needs {}", bytes.len(), prefix),
        });
    }
    let input = bytes.split_off(prefix);
    let wire = bytes.split_off(variant.key_size.bytes());
    let key = bytes;

    let secondary = match (variant.mode, variant.counter) {
        (CipherMode::Ecb, _) => SecondaryMaterial::None,
        (CipherMode::Cbc, _) => SecondaryMaterial::Iv(block(&wire)),
        (CipherMode::Ctr, Some(CounterLayout::FromZero)) => {
            if wire[AES_NONCE_SIZE..].iter().any(|&b| b != 0) {
                return Err(Error::Record {
                    line,
                    reason: "counter suffix is not zero".to_string(),
                });
            }
            let mut nonce = [0u8; AES_NONCE_SIZE];
            nonce.copy_from_slice(&wire[..AES_NONCE_SIZE]);
            SecondaryMaterial::Nonce(nonce)
        }
        (CipherMode::Ctr, _) => SecondaryMaterial::CounterSeed(block(&wire)),
    };

    Ok(InputRecord {
        direction: direction.unwrap_or(Direction::Encrypt),
        key,
        secondary,
        input,
    })
}

pub fn decode_output(variant: &Variant, text: &str, line: usize) -> Result<OutputRecord> {
    let (direction, hex_part) = split_direction(variant, text, line)?;
    Ok(OutputRecord { direction, output: decode_hex(hex_part, line)? })
}

fn block(bytes: &[u8]) -> [u8; AES_BLOCK_SIZE] {
    let mut out = [0u8; AES_BLOCK_SIZE];
    out.copy_from_slice(bytes);
    out
}
