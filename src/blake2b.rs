//! BLAKE2b-512 (`H`) and Argon2's variable-length extension (`H'`), per
//! RFC 9106 §3.2 and RFC 7693.

use blake2::Digest;

/// Output length of the unkeyed BLAKE2b primitive this crate builds on.
pub const B2_LEN: usize = 64;

/// `H(input) -> 64 bytes`: unkeyed BLAKE2b-512 of the concatenated inputs.
pub fn h(parts: &[&[u8]]) -> [u8; B2_LEN] {
    let mut hasher = blake2::Blake2b512::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// `H'(input, out_len) -> out_len bytes`: Argon2's variable-length hash
/// extension built on `H`.
///
/// For `out_len <= 64` this is simply `H(LE32(out_len) || input)` truncated.
/// For longer outputs, 32-byte halves of successive `H` applications are
/// emitted until the remainder fits in one final full hash.
pub fn h_prime(out: &mut [u8], parts: &[&[u8]]) {
    let len_le = (out.len() as u32).to_le_bytes();
    let mut preimage: Vec<&[u8]> = Vec::with_capacity(parts.len() + 1);
    preimage.push(&len_le);
    preimage.extend_from_slice(parts);

    if out.len() <= B2_LEN {
        let digest = h(&preimage);
        out.copy_from_slice(&digest[..out.len()]);
        return;
    }

    let mut v = h(&preimage);
    out[..32].copy_from_slice(&v[..32]);
    let mut written = 32;

    while out.len() - written > B2_LEN {
        v = h(&[&v]);
        out[written..written + 32].copy_from_slice(&v[..32]);
        written += 32;
    }

    let remaining = out.len() - written;
    v = h(&[&v]);
    out[written..written + remaining].copy_from_slice(&v[..remaining]);
}
