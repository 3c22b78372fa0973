use tracing::warn;

use crate::error::{Error, Result};
use crate::planner::payload_len;
use crate::variant::Variant;

/// AXI-stream interface parameters of the device under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    /// S_AXIS tdata width in bits.
    pub slave_width: u32,
    /// M_AXIS tdata width in bits.
    pub master_width: u32,
    /// Driver delay in clock periods.
    pub slave_delay: u32,
    /// Monitor delay in clock periods.
    pub master_delay: u32,
}

impl Default for Interface {
    fn default() -> Self {
        Self { slave_width: 64, master_width: 64, slave_delay: 0, master_delay: 0 }
    }
}

/// Parameters of one generator invocation.
///
/// `single` and `corrupt` hold the effective flags: a flag the variant does
/// not support is dropped by [`RunConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub variant: Variant,
    pub vectors: usize,
    pub single: bool,
    pub corrupt: bool,
    pub interface: Interface,
}

impl RunConfig {
    pub fn new(
        variant: Variant,
        vectors: usize,
        single: bool,
        corrupt: bool,
        interface: Interface,
    ) -> Result<Self> {
        if vectors == 0 {
            return Err(Error::EmptyCorpus);
        }
        // Both ramp and single runs top out at `vectors` units.
        payload_len(variant.mode, vectors)?;

        let single = if single && !variant.caps.single_vector {
            warn!(variant = variant.name, "single packet mode not supported, ignoring");
            false
        } else {
            single
        };
        let corrupt = if corrupt && !variant.caps.corruption {
            warn!(variant = variant.name, "bad packet injection not supported, ignoring");
            false
        } else {
            corrupt
        };

        Ok(Self { variant, vectors, single, corrupt, interface })
    }

    /// Shorthand for a plain ramp run with default interface settings.
    pub fn ramp(variant: Variant, vectors: usize) -> Result<Self> {
        Self::new(variant, vectors, false, false, Interface::default())
    }

    /// Corruption forces single-vector generation.
    pub fn is_single(&self) -> bool {
        self.single || self.corrupt
    }

    /// Number of vectors the corpus will contain.
    pub fn corpus_len(&self) -> usize {
        if self.is_single() {
            1
        } else {
            self.vectors
        }
    }
}
