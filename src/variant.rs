// Hardware variant catalogue.
//
// Every selector accepted on the command line maps to one `Variant`: the
// cipher parameters the corpus is generated for plus the capability set of
// the stimulus format the testbench of that variant understands.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

pub const AES_BLOCK_SIZE: usize = 16;
pub const AES_NONCE_SIZE: usize = 12;
pub const AES_CTR_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    Ecb,
    Cbc,
    Ctr,
}

impl CipherMode {
    /// Block modes need payloads that are a whole number of blocks.
    pub fn is_block_oriented(self) -> bool {
        matches!(self, CipherMode::Ecb | CipherMode::Cbc)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CipherMode::Ecb => "ecb",
            CipherMode::Cbc => "cbc",
            CipherMode::Ctr => "ctr",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeySize {
    Aes128,
    Aes256,
}

impl KeySize {
    pub fn bytes(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes256 => 32,
        }
    }

    pub fn bits(self) -> usize {
        self.bytes() * 8
    }
}

/// How the initial CTR counter block is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterLayout {
    /// 16 random bytes used as a 128-bit big-endian counter.
    Explicit,
    /// 12-byte random nonce followed by a 32-bit counter starting at 0.
    FromZero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Iterative,
    Combinational,
    Pipelined,
    Unrolled,
}

/// Stimulus-format features a variant's testbench supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub direction_bit: bool,
    pub single_vector: bool,
    pub corruption: bool,
    pub interface_widths: bool,
}

const BLOCK_FIXED: Capabilities = Capabilities {
    direction_bit: false,
    single_vector: true,
    corruption: false,
    interface_widths: false,
};

const STREAM_BIDIR: Capabilities = Capabilities {
    direction_bit: true,
    single_vector: true,
    corruption: true,
    interface_widths: true,
};

const STREAM_FIXED: Capabilities = Capabilities {
    direction_bit: false,
    single_vector: true,
    corruption: true,
    interface_widths: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub name: &'static str,
    pub key_size: KeySize,
    pub mode: CipherMode,
    /// Only meaningful for `CipherMode::Ctr`.
    pub counter: Option<CounterLayout>,
    pub arch: Architecture,
    pub caps: Capabilities,
}

const fn variant(
    name: &'static str,
    key_size: KeySize,
    mode: CipherMode,
    counter: Option<CounterLayout>,
    arch: Architecture,
    caps: Capabilities,
) -> Variant {
    Variant { name, key_size, mode, counter, arch, caps }
}

use Architecture::*;
use CipherMode::*;
use KeySize::*;

pub const VARIANTS: &[Variant] = &[
    variant("aes128_ecb_iter", Aes128, Ecb, None, Iterative, BLOCK_FIXED),
    variant("aes128_ecb_comb", Aes128, Ecb, None, Combinational, BLOCK_FIXED),
    variant("aes256_ecb_iter", Aes256, Ecb, None, Iterative, BLOCK_FIXED),
    variant("aes256_ecb_unroll", Aes256, Ecb, None, Unrolled, BLOCK_FIXED),
    variant("aes128_cbc_iter", Aes128, Cbc, None, Iterative, STREAM_BIDIR),
    variant("aes256_cbc_iter", Aes256, Cbc, None, Iterative, STREAM_BIDIR),
    variant("aes256_cbc_comb", Aes256, Cbc, None, Combinational, STREAM_BIDIR),
    variant("aes256_ctr_iter", Aes256, Ctr, Some(CounterLayout::Explicit), Iterative, STREAM_BIDIR),
    variant("aes256_ctr_comb", Aes256, Ctr, Some(CounterLayout::Explicit), Combinational, STREAM_BIDIR),
    variant("aes256_ctr_pipe", Aes256, Ctr, Some(CounterLayout::Explicit), Pipelined, STREAM_BIDIR),
    variant("aes128_ctr32_pipe", Aes128, Ctr, Some(CounterLayout::FromZero), Pipelined, STREAM_FIXED),
    variant("aes256_ctr32_unroll", Aes256, Ctr, Some(CounterLayout::FromZero), Unrolled, STREAM_FIXED),
];

impl Variant {
    pub fn lookup(name: &str) -> Option<&'static Variant> {
        VARIANTS.iter().find(|v| v.name == name)
    }

    /// Bytes of key-side material preceding the payload in a stimulus-in record.
    pub fn prefix_len(&self) -> usize {
        self.key_size.bytes() + self.secondary_len()
    }

    pub fn secondary_len(&self) -> usize {
        match self.mode {
            CipherMode::Ecb => 0,
            CipherMode::Cbc | CipherMode::Ctr => AES_BLOCK_SIZE,
        }
    }

    /// Name of the `define` emitted into tb_conf.svh.
    pub fn define_name(&self) -> String {
        self.name.to_uppercase()
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::lookup(s)
            .copied()
            .ok_or_else(|| Error::InvalidSelector(s.to_string()))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
