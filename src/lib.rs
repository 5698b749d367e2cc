//! A pure Rust implementation of Argon2 (RFC 9106): Argon2d, Argon2i, and
//! Argon2id, with PHC string encoding and constant-time verification.
//!
//! ```
//! use argon2kit::{ParamsBuilder, hash, verify};
//!
//! let params = ParamsBuilder::new()
//!     .salt(b"some long enough salt".to_vec())
//!     .build()
//!     .unwrap();
//! let tag = hash(&params, b"hunter2");
//! assert!(verify(&params, b"hunter2", &tag).unwrap());
//! ```

mod blake2b;
mod block;
mod engine;
mod error;
mod mixing;
mod params;
mod phc;
mod workers;

pub use error::{Error, Result};
pub use params::{Params, ParamsBuilder, Variant, Version};

use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Derives a tag of `params.tag_len()` bytes from `password` under `params`.
pub fn hash(params: &Params, password: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; params.tag_len()];
    engine::hash_into(params, password, &mut out);
    out
}

/// Like [`hash`], but writes directly into a caller-provided buffer whose
/// length must equal `params.tag_len()`.
pub fn hash_into(params: &Params, password: &[u8], out: &mut [u8]) -> Result<()> {
    if out.len() != params.tag_len() {
        return Err(Error::InvalidLength { got: out.len(), want: params.tag_len() });
    }
    engine::hash_into(params, password, out);
    Ok(())
}

/// Recomputes the tag for `password` under `params` and compares it against
/// `expected` in constant time.
pub fn verify(params: &Params, password: &[u8], expected: &[u8]) -> Result<bool> {
    if expected.len() != params.tag_len() {
        return Err(Error::InvalidLength { got: expected.len(), want: params.tag_len() });
    }
    let computed = hash(params, password);
    Ok(computed.ct_eq(expected).into())
}

/// Generates a cryptographically random salt of `len` bytes (minimum 8)
/// using the operating system's CSPRNG.
pub fn generate_salt(len: usize) -> Result<Vec<u8>> {
    if len < params::MIN_SALT_LEN {
        return Err(Error::SaltLenTooShort(len));
    }
    let mut salt = vec![0u8; len];
    OsRng.fill_bytes(&mut salt);
    Ok(salt)
}

/// Encodes `params` (which must carry a salt) and `tag` as a PHC string
///: `$argon2<d|i|id>$v=<dec>$m=<dec>,t=<dec>,p=<dec>$<salt>$<tag>`.
pub fn phc_encode(params: &Params, tag: &[u8]) -> Result<String> {
    phc::encode(params, tag)
}

/// Parses a PHC string back into [`Params`] (sans secret/associated data)
/// and its raw tag.
pub fn phc_decode(s: &str) -> Result<phc::Decoded> {
    phc::decode(s)
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        ParamsBuilder::new()
            .variant(Variant::Argon2id)
            .m_cost(32)
            .t_cost(2)
            .lanes(2)
            .tag_len(32)
            .salt(b"a reasonably long salt".to_vec())
            .build()
            .unwrap()
    }

    #[test]
    fn hash_then_verify_round_trips() {
        let params = params();
        let tag = hash(&params, b"correct horse battery staple");
        assert!(verify(&params, b"correct horse battery staple", &tag).unwrap());
        assert!(!verify(&params, b"wrong password", &tag).unwrap());
    }

    #[test]
    fn hash_into_rejects_wrong_length_buffer() {
        let params = params();
        let mut out = vec![0u8; params.tag_len() + 1];
        assert!(matches!(
            hash_into(&params, b"pw", &mut out),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn verify_rejects_wrong_length_tag() {
        let params = params();
        let short_tag = vec![0u8; params.tag_len() - 1];
        assert!(matches!(
            verify(&params, b"pw", &short_tag),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn phc_round_trip_matches_hash() {
        let params = params();
        let tag = hash(&params, b"pw");
        let encoded = phc_encode(&params, &tag).unwrap();
        let decoded = phc_decode(&encoded).unwrap();
        assert_eq!(decoded.tag, tag);
        assert!(verify(&decoded.params, b"pw", &decoded.tag).unwrap());
    }

    #[test]
    fn generate_salt_rejects_too_short_and_varies() {
        assert!(matches!(generate_salt(4), Err(Error::SaltLenTooShort(4))));
        let a = generate_salt(16).unwrap();
        let b = generate_salt(16).unwrap();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn different_variants_produce_different_tags() {
        let d = ParamsBuilder::new()
            .variant(Variant::Argon2d)
            .salt(b"a reasonably long salt".to_vec())
            .m_cost(32)
            .lanes(1)
            .build()
            .unwrap();
        let i = ParamsBuilder::new()
            .variant(Variant::Argon2i)
            .salt(b"a reasonably long salt".to_vec())
            .m_cost(32)
            .lanes(1)
            .build()
            .unwrap();
        assert_ne!(hash(&d, b"pw"), hash(&i, b"pw"));
    }
}
