//! SRP group parameters.
//!
//! A group is the pair (N, g): a large safe prime and a generator modulo N.
//! Groups are configuration data shared by both sides out of band; [`G_3072`]
//! is the RFC 5054 3072-bit group. The multiplier k = H(N || PAD(g)) depends
//! on the hash algorithm and is computed on demand.

use std::sync::LazyLock;

use digest::Digest;
use srp6a_core::error::IntegerError;

use crate::hash;
use crate::integer::SrpInteger;

/// RFC 5054 3072-bit prime N as hex string.
const RFC5054_N_3072: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E08",
    "8A67CC74020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B",
    "302B0A6DF25F14374FE1356D6D51C245E485B576625E7EC6F44C42E9",
    "A637ED6B0BFF5CB6F406B7EDEE386BFB5A899FA5AE9F24117C4B1FE6",
    "49286651ECE45B3DC2007CB8A163BF0598DA48361C55D39A69163FA8",
    "FD24CF5F83655D23DCA3AD961C62F356208552BB9ED529077096966D",
    "670C354E4ABC9804F1746C08CA18217C32905E462E36CE3BE39E772C",
    "180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D",
    "04507A33A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7D",
    "B3970F85A6E1E4C7ABF5AE8CDB0933D71E8C94E04A25619DCEE3D226",
    "1AD2EE6BF12FFA06D98A0864D87602733EC86A64521F2B18177B200C",
    "BBE117577A615D6C770988C0BAD946E208E24FA074E5AB3143DB5BFC",
    "E0FD108E4B82D120A93AD2CAFFFFFFFFFFFFFFFF"
);

/// The RFC 5054 3072-bit group, generator 5. Process-wide constant.
pub static G_3072: LazyLock<Group> =
    LazyLock::new(|| Group::from_hex(RFC5054_N_3072, "05").expect("Invalid RFC 5054 prime constant"));

/// Immutable group parameters (N, g).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// A large safe prime (N = 2q+1, where q is prime).
    pub n: SrpInteger,
    /// A generator modulo N.
    pub g: SrpInteger,
}

impl Group {
    /// Construct a group from hex strings. N's string length fixes the
    /// serialization width of every group element.
    pub fn from_hex(n_hex: &str, g_hex: &str) -> Result<Self, IntegerError> {
        Ok(Self {
            n: SrpInteger::from_hex(n_hex)?,
            g: SrpInteger::from_hex(g_hex)?,
        })
    }

    /// Byte length of the modulus serialization, the PAD() target for every
    /// protocol hash.
    pub fn padded_length(&self) -> usize {
        self.n.width().unwrap_or(0).div_ceil(2)
    }
}

/// Multiplier k = H(N || PAD(g)), both operands at the modulus width.
pub(crate) fn compute_k<D: Digest>(group: &Group) -> Result<SrpInteger, IntegerError> {
    let n_bytes = group.n.to_bytes()?;
    let g_bytes = group.g.to_bytes()?;
    Ok(hash::hash::<D>(&[
        &n_bytes,
        &hash::pad(&g_bytes, group.padded_length()),
    ]))
}
