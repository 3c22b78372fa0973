use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Module/variant selector outside the supported set.
    #[error("Invalid module type: {0}")]
    InvalidSelector(String),

    /// A run must produce at least one vector.
    #[error("vector count must be positive")]
    EmptyCorpus,

    /// Key, IV or counter block of the wrong size for the cipher.
    #[error("invalid key or IV length")]
    InvalidLength,

    /// Requested payload does not fit in memory addressing.
    #[error("payload of {units} units is too large")]
    PayloadTooLarge { units: usize },

    #[error("payload of {len} bytes is not a multiple of the {block}-byte block size")]
    PartialBlock { len: usize, block: usize },

    /// Malformed stimulus record.
    #[error("line {line}: {reason}")]
    Record { line: usize, reason: String },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Self {
        Error::InvalidLength
    }
}
