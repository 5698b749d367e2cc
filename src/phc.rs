//! PHC string encode/decode.
//!
//! A hand-written recursive-descent parser for the
//! `$argon2<x>$v=<dec>$m=<dec>,t=<dec>,p=<dec>$<salt>$<tag>` grammar, built
//! on the `base64` crate's no-pad engine.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use crate::error::{Error, Result};
use crate::params::{Params, ParamsBuilder, Variant, Version};

/// The parameters and tag recovered from a PHC string. `secret`/`ad` are
/// never serialized and so are always empty here; callers that need
/// them re-attach them from their own configuration before hashing.
pub struct Decoded {
    pub params: Params,
    pub tag: Vec<u8>,
}

/// Encodes `params` (which must carry a salt) and `tag` as a PHC string.
///
/// `$argon2<d|i|id>$v=<dec>$m=<dec>,t=<dec>,p=<dec>$<b64-salt>$<b64-tag>`
pub fn encode(params: &Params, tag: &[u8]) -> Result<String> {
    if params.salt().is_empty() {
        return Err(Error::MissingSalt);
    }

    Ok(format!(
        "$argon2{}$v={}$m={},t={},p={}${}${}",
        params.variant().phc_suffix(),
        params.version().as_u32(),
        params.m_kb(),
        params.t_cost(),
        params.lanes(),
        STANDARD_NO_PAD.encode(params.salt()),
        STANDARD_NO_PAD.encode(tag),
    ))
}

struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str { &self.s[self.pos..] }

    fn expect(&mut self, lit: &str) -> Result<()> {
        if self.rest().starts_with(lit) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(Error::Malformed(self.pos))
        }
    }

    /// Consumes up to (not including) the next occurrence of `stop`, or to
    /// the end of the string if `stop` is `None`.
    fn take_until(&mut self, stop: Option<char>) -> &'a str {
        let rest = self.rest();
        let end = match stop {
            Some(c) => rest.find(c).unwrap_or(rest.len()),
            None => rest.len(),
        };
        let out = &rest[..end];
        self.pos += end;
        out
    }

    fn read_u32(&mut self) -> Result<u32> {
        let start = self.pos;
        let digits = self.take_until_non_digit();
        if digits.is_empty() {
            return Err(Error::Malformed(start));
        }
        digits.parse().map_err(|_| Error::Malformed(start))
    }

    fn take_until_non_digit(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let out = &rest[..end];
        self.pos += end;
        out
    }
}

fn b64_decode(s: &str, at: usize) -> Result<Vec<u8>> {
    STANDARD_NO_PAD.decode(s).map_err(|_| Error::Malformed(at))
}

/// Parses a PHC string into parameters (sans secret/ad) and the raw tag.
///
/// Never panics on untrusted input; every structural failure maps to
/// [`Error::Malformed`] or [`Error::InvalidVariant`].
pub fn decode(s: &str) -> Result<Decoded> {
    let mut c = Cursor { s, pos: 0 };

    c.expect("$argon2")?;
    let variant_pos = c.pos;
    let variant_str = c.take_until(Some('$'));
    let variant = Variant::from_phc_suffix(variant_str).ok_or(Error::InvalidVariant)?;
    let _ = variant_pos;
    c.expect("$")?;

    c.expect("v=")?;
    let v = c.read_u32()?;
    c.expect("$")?;
    let version = Version::from_decimal(v).ok_or(Error::Malformed(c.pos))?;

    c.expect("m=")?;
    let m_kb = c.read_u32()?;
    c.expect(",t=")?;
    let t = c.read_u32()?;
    c.expect(",p=")?;
    let p = c.read_u32()?;
    c.expect("$")?;

    let salt_pos = c.pos;
    let salt_str = c.take_until(Some('$'));
    let salt = b64_decode(salt_str, salt_pos)?;
    c.expect("$")?;

    let tag_pos = c.pos;
    let tag_str = c.take_until(None);
    if tag_str.is_empty() {
        return Err(Error::Malformed(tag_pos));
    }
    let tag = b64_decode(tag_str, tag_pos)?;

    let params = ParamsBuilder::new()
        .variant(variant)
        .version(version)
        .m_cost(m_kb)
        .t_cost(t)
        .lanes(p)
        .tag_len(tag.len().max(4))
        .salt(salt)
        .build()
        .map_err(|_| Error::Malformed(0))?;

    Ok(Decoded { params, tag })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::ParamsBuilder;

    fn base_params() -> Params {
        ParamsBuilder::new()
            .variant(Variant::Argon2id)
            .version(Version::V0x13)
            .m_cost(32)
            .t_cost(2)
            .lanes(1)
            .tag_len(32)
            .salt(b"0123456789abcdef".to_vec())
            .build()
            .unwrap()
    }

    #[test]
    fn encode_matches_grammar() {
        let params = base_params();
        let tag = vec![7u8; 32];
        let s = encode(&params, &tag).unwrap();
        assert!(s.starts_with("$argon2id$v=19$m=32,t=2,p=1$"));
        assert!(!s.contains('='));
    }

    #[test]
    fn round_trip_preserves_params_and_tag() {
        let params = base_params();
        let tag = vec![9u8; 32];
        let encoded = encode(&params, &tag).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.params.variant(), params.variant());
        assert_eq!(decoded.params.version(), params.version());
        assert_eq!(decoded.params.m_kb(), params.m_kb());
        assert_eq!(decoded.params.t_cost(), params.t_cost());
        assert_eq!(decoded.params.lanes(), params.lanes());
        assert_eq!(decoded.params.salt(), params.salt());
        assert_eq!(decoded.tag, tag);
    }

    #[test]
    fn decode_rejects_unknown_variant() {
        let s = "$argon2x$v=19$m=8,t=1,p=1$YWJjZGVmZ2g$AQID";
        assert_eq!(decode(s).unwrap_err(), Error::InvalidVariant);
    }

    #[test]
    fn decode_rejects_missing_version() {
        let s = "$argon2id$m=8,t=1,p=1$YWJjZGVmZ2g$AQID";
        assert!(matches!(decode(s), Err(Error::Malformed(_))));
    }

    #[test]
    fn decode_rejects_wrong_parameter_order() {
        let s = "$argon2id$v=19$m=8,p=1,t=1$YWJjZGVmZ2g$AQID";
        assert!(matches!(decode(s), Err(Error::Malformed(_))));
    }

    #[test]
    fn decode_rejects_empty_and_bare_dollar() {
        assert!(matches!(decode(""), Err(Error::Malformed(_))));
        assert!(matches!(decode("$"), Err(Error::Malformed(_))));
    }

    #[test]
    fn decode_never_panics_on_random_corruption() {
        let params = base_params();
        let tag = vec![5u8; 32];
        let encoded = encode(&params, &tag).unwrap();
        let bytes = encoded.into_bytes();
        for i in 0..bytes.len() {
            let mut corrupted = bytes.clone();
            corrupted[i] ^= 0xff;
            if let Ok(s) = String::from_utf8(corrupted) {
                let _ = decode(&s);
            }
        }
    }
}
