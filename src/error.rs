//! The crate's single error type.

use thiserror::Error;

/// All ways a call into this crate can fail.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum Error {
    /// `t` (iterations) was below the RFC minimum of 1.
    #[error("time cost must be at least 1, got {0}")]
    TooFewPasses(u32),

    /// `p` (lanes) was below the RFC minimum of 1.
    #[error("parallelism must be at least 1, got {0}")]
    TooFewLanes(u32),

    /// `p` exceeded the RFC's 2^24-1 lane ceiling.
    #[error("parallelism must be at most {max}, got {got}")]
    TooManyLanes { got: u32, max: u32 },

    /// `m_kb` was below the `8 * p` floor.
    #[error("memory cost must be at least {min} KiB for {lanes} lane(s), got {got}")]
    MinKiB { got: u32, min: u64, lanes: u32 },

    /// `tag_len` was below the RFC minimum of 4 bytes.
    #[error("output length must be at least 4 bytes, got {0}")]
    TagTooShort(usize),

    /// `salt` was shorter than the RFC minimum of 8 bytes.
    #[error("salt must be at least 8 bytes, got {0}")]
    SaltTooShort(usize),

    /// `hash_into`'s output buffer length did not equal `params.tag_len`.
    #[error("output buffer length {got} does not match configured tag length {want}")]
    InvalidLength { got: usize, want: usize },

    /// A PHC string was structurally invalid at the given byte offset.
    #[error("malformed PHC string at byte {0}")]
    Malformed(usize),

    /// A PHC string named a variant other than `argon2d`/`argon2i`/`argon2id`.
    #[error("unknown Argon2 variant in PHC string")]
    InvalidVariant,

    /// `generate_salt` was asked for fewer than 8 bytes.
    #[error("requested salt length {0} is below the minimum of 8 bytes")]
    SaltLenTooShort(usize),

    /// `phc_encode` was asked to encode parameters with no salt attached.
    #[error("cannot encode a PHC string without a salt")]
    MissingSalt,
}

pub type Result<T> = std::result::Result<T, Error>;
