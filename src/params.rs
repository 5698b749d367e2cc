//! Immutable hash parameters and their validating builder.

use crate::error::{Error, Result};

/// Which of the three Argon2 addressing strategies to run.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u32)]
pub enum Variant {
    /// Data-dependent addressing throughout; fastest, vulnerable to
    /// cache-timing side channels.
    Argon2d = 0,
    /// Data-independent addressing throughout; side-channel resistant,
    /// weaker against GPU/ASIC time-memory tradeoffs.
    Argon2i = 1,
    /// Data-independent addressing for the first half of pass 0, then
    /// data-dependent for the rest. The RFC 9106 recommended default.
    Argon2id = 2,
}

impl Variant {
    pub(crate) fn as_u32(self) -> u32 { self as u32 }

    /// The lowercase suffix used in PHC strings (`argon2<suffix>`).
    pub fn phc_suffix(self) -> &'static str {
        match self {
            Variant::Argon2d => "d",
            Variant::Argon2i => "i",
            Variant::Argon2id => "id",
        }
    }

    pub fn from_phc_suffix(s: &str) -> Option<Variant> {
        match s {
            "d" => Some(Variant::Argon2d),
            "i" => Some(Variant::Argon2i),
            "id" => Some(Variant::Argon2id),
            _ => None,
        }
    }

    /// Whether segment `slice` of pass `pass` uses data-independent
    /// (address-stream) addressing under this variant.
    pub(crate) fn data_independent(self, pass: u32, slice: u32) -> bool {
        match self {
            Variant::Argon2i => true,
            Variant::Argon2d => false,
            Variant::Argon2id => pass == 0 && slice < 2,
        }
    }
}

/// The wire version of the algorithm. Only changes the passes->=1 overwrite
/// rule.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(u32)]
pub enum Version {
    /// 0x10 (decimal 16): overwrite, no XOR-with-previous-contents.
    V0x10 = 0x10,
    /// 0x13 (decimal 19, recommended default): XOR the new block into the
    /// one it replaces during passes >= 1.
    V0x13 = 0x13,
}

impl Default for Version {
    fn default() -> Self { Version::V0x13 }
}

impl Version {
    pub(crate) fn as_u32(self) -> u32 { self as u32 }

    pub fn from_decimal(n: u32) -> Option<Version> {
        match n {
            0x10 => Some(Version::V0x10),
            0x13 => Some(Version::V0x13),
            _ => None,
        }
    }
}

pub(crate) const MIN_SALT_LEN: usize = 8;
pub(crate) const MIN_TAG_LEN: usize = 4;
pub(crate) const MAX_LANES: u32 = (1 << 24) - 1;

/// Validated, immutable Argon2 configuration.
///
/// Constructed exclusively through [`ParamsBuilder`]; once built, every
/// field has already passed the invariants, so the hashing engine never
/// has to re-derive them.
#[derive(Debug, Clone)]
pub struct Params {
    variant: Variant,
    version: Version,
    m_kb: u32,
    t: u32,
    p: u32,
    tag_len: usize,
    salt: Vec<u8>,
    secret: Vec<u8>,
    ad: Vec<u8>,
    lane_len: u32,
}

impl Params {
    pub fn variant(&self) -> Variant { self.variant }
    pub fn version(&self) -> Version { self.version }
    /// The *requested* memory cost, before rounding to a multiple of `4p`.
    pub fn m_kb(&self) -> u32 { self.m_kb }
    pub fn t_cost(&self) -> u32 { self.t }
    pub fn lanes(&self) -> u32 { self.p }
    pub fn tag_len(&self) -> usize { self.tag_len }
    pub fn salt(&self) -> &[u8] { &self.salt }
    pub fn secret(&self) -> &[u8] { &self.secret }
    pub fn ad(&self) -> &[u8] { &self.ad }

    /// Blocks per lane after rounding `m_kb` down to a multiple of `4p`.
    pub fn lane_len(&self) -> u32 { self.lane_len }
    /// Blocks per segment; one quarter of a lane.
    pub fn segment_len(&self) -> u32 { self.lane_len / 4 }
    /// Total blocks in the memory matrix (`p * lane_len`).
    pub fn block_count(&self) -> u32 { self.p * self.lane_len }
}

/// Builder for [`Params`]; performs every invariant check in `build()`.
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    variant: Variant,
    version: Version,
    m_kb: u32,
    t: u32,
    p: u32,
    tag_len: usize,
    salt: Vec<u8>,
    secret: Vec<u8>,
    ad: Vec<u8>,
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        ParamsBuilder {
            variant: Variant::Argon2id,
            version: Version::V0x13,
            m_kb: 19 * 1024,
            t: 2,
            p: 1,
            tag_len: 32,
            salt: Vec::new(),
            secret: Vec::new(),
            ad: Vec::new(),
        }
    }
}

impl ParamsBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn m_cost(mut self, m_kb: u32) -> Self {
        self.m_kb = m_kb;
        self
    }

    pub fn t_cost(mut self, t: u32) -> Self {
        self.t = t;
        self
    }

    pub fn lanes(mut self, p: u32) -> Self {
        self.p = p;
        self
    }

    pub fn tag_len(mut self, tag_len: usize) -> Self {
        self.tag_len = tag_len;
        self
    }

    pub fn salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    pub fn secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn ad(mut self, ad: impl Into<Vec<u8>>) -> Self {
        self.ad = ad.into();
        self
    }

    /// Validates all invariants and produces an immutable [`Params`].
    pub fn build(self) -> Result<Params> {
        if self.t < 1 {
            return Err(Error::TooFewPasses(self.t));
        }
        if self.p < 1 {
            return Err(Error::TooFewLanes(self.p));
        }
        if self.p > MAX_LANES {
            return Err(Error::TooManyLanes { got: self.p, max: MAX_LANES });
        }
        let min_kib = 8u64 * self.p as u64;
        if (self.m_kb as u64) < min_kib {
            return Err(Error::MinKiB { got: self.m_kb, min: min_kib, lanes: self.p });
        }
        if self.tag_len < MIN_TAG_LEN {
            return Err(Error::TagTooShort(self.tag_len));
        }
        if self.salt.len() < MIN_SALT_LEN {
            return Err(Error::SaltTooShort(self.salt.len()));
        }

        // Round lane_len down to a multiple of 4 so each lane divides
        // evenly into four slices.
        let lane_len = self.m_kb / (4 * self.p) * 4;

        Ok(Params {
            variant: self.variant,
            version: self.version,
            m_kb: self.m_kb,
            t: self.t,
            p: self.p,
            tag_len: self.tag_len,
            salt: self.salt,
            secret: self.secret,
            ad: self.ad,
            lane_len,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_short_salt() {
        let err = ParamsBuilder::new().salt(b"short".to_vec()).build().unwrap_err();
        assert_eq!(err, Error::SaltTooShort(5));
    }

    #[test]
    fn rejects_too_little_memory() {
        let err = ParamsBuilder::new()
            .lanes(4)
            .m_cost(16)
            .salt(b"somesalt".to_vec())
            .build()
            .unwrap_err();
        assert_eq!(err, Error::MinKiB { got: 16, min: 32, lanes: 4 });
    }

    #[test]
    fn rounds_lane_len_to_multiple_of_four() {
        let p = ParamsBuilder::new()
            .lanes(3)
            .m_cost(100)
            .salt(b"somesaltsomesalt".to_vec())
            .build()
            .unwrap();
        // 100 / (4*3) = 8, *4 = 32 per lane, 3 lanes -> 96 blocks total.
        assert_eq!(p.lane_len(), 32);
        assert_eq!(p.segment_len(), 8);
        assert_eq!(p.block_count(), 96);
    }

    #[test]
    fn rejects_zero_passes_and_lanes() {
        assert_eq!(
            ParamsBuilder::new().t_cost(0).salt(b"somesalt".to_vec()).build().unwrap_err(),
            Error::TooFewPasses(0)
        );
        assert_eq!(
            ParamsBuilder::new().lanes(0).salt(b"somesalt".to_vec()).build().unwrap_err(),
            Error::TooFewLanes(0)
        );
    }
}
