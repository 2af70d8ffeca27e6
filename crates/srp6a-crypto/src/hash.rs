//! Hash composition helpers.
//!
//! The hash function is a type parameter everywhere; these helpers fix the
//! byte-level composition convention: each operand contributes the raw bytes
//! of its fixed-width hex serialization, group elements padded to the
//! modulus width where the protocol calls for PAD().

use digest::Digest;

use crate::integer::SrpInteger;

/// H over the concatenation of `parts`. The digest becomes an integer with
/// width 2 × the hash output length.
pub(crate) fn hash<D: Digest>(parts: &[&[u8]]) -> SrpInteger {
    let mut d = D::new();
    for part in parts {
        d.update(part);
    }
    SrpInteger::from_bytes(&d.finalize())
}

/// Left-pad `bytes` with zeros to `length`. Longer inputs pass through
/// unchanged; padding never truncates.
pub(crate) fn pad(bytes: &[u8], length: usize) -> Vec<u8> {
    if bytes.len() >= length {
        bytes.to_vec()
    } else {
        let mut padded = vec![0u8; length - bytes.len()];
        padded.extend_from_slice(bytes);
        padded
    }
}
