//! Arbitrary-precision integers with fixed-width hex serialization.
//!
//! Every value that crosses the protocol boundary is a lowercase hex string
//! of a fixed width (the modulus width for group elements, twice the byte
//! length for salts and digests). [`SrpInteger`] pairs the numeric value with
//! that nominal width so serialization always round-trips padding exactly.
//! The representation is private: callers cannot bypass the width and
//! padding invariants.

use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use rand::rngs::OsRng;
use rand::RngCore;
use srp6a_core::error::IntegerError;

/// A signed arbitrary-precision integer with a nominal hex width.
///
/// Arithmetic is full-precision; intermediate values may go negative
/// (`B - k*g^x` does during client session derivation) and are normalized
/// back into range by [`modulo`](Self::modulo) and
/// [`mod_pow`](Self::mod_pow). Only non-negative values serialize.
#[derive(Clone)]
pub struct SrpInteger {
    value: BigInt,
    hex_length: Option<usize>,
}

impl SrpInteger {
    /// The width-less zero, used for degenerate-value checks.
    pub fn zero() -> Self {
        Self {
            value: BigInt::from(0u32),
            hex_length: None,
        }
    }

    /// Parse an unsigned hex string. The string's length becomes the
    /// nominal serialization width.
    pub fn from_hex(input: &str) -> Result<Self, IntegerError> {
        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IntegerError::MalformedHex(input.to_string()));
        }
        let value = BigInt::parse_bytes(input.as_bytes(), 16)
            .ok_or_else(|| IntegerError::MalformedHex(input.to_string()))?;
        Ok(Self {
            value,
            hex_length: Some(input.len()),
        })
    }

    /// Draw `byte_length` cryptographically secure random bytes and interpret
    /// them as a big-endian unsigned integer with width 2 × `byte_length`.
    pub fn random_integer(byte_length: usize) -> Self {
        let mut bytes = vec![0u8; byte_length];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(&bytes)
    }

    /// Big-endian unsigned bytes; width = 2 × `bytes.len()`.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: BigInt::from_bytes_be(Sign::Plus, bytes),
            hex_length: Some(bytes.len() * 2),
        }
    }

    /// Serialize to lowercase hex, left-zero-padded to the nominal width.
    ///
    /// Padding is never truncating: a value too wide for its nominal width
    /// serializes at its natural length instead. Fails on width-less or
    /// negative values.
    pub fn to_hex(&self) -> Result<String, IntegerError> {
        let width = self.hex_length.ok_or(IntegerError::UndefinedWidth)?;
        if self.value.sign() == Sign::Minus {
            return Err(IntegerError::NegativeSerialization);
        }
        let hex = self.value.to_str_radix(16);
        if hex.len() >= width {
            Ok(hex)
        } else {
            Ok(format!("{:0>width$}", hex, width = width))
        }
    }

    /// Big-endian bytes of the fixed-width serialization (odd widths round
    /// up to a whole byte). This is the form fed to the hash function.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, IntegerError> {
        let mut hex = self.to_hex()?;
        if hex.len() % 2 == 1 {
            hex.insert(0, '0');
        }
        hex::decode(&hex).map_err(|_| IntegerError::MalformedHex(hex))
    }

    pub(crate) fn width(&self) -> Option<usize> {
        self.hex_length
    }

    pub fn add(&self, val: &Self) -> Self {
        Self {
            value: &self.value + &val.value,
            hex_length: self.hex_length.or(val.hex_length),
        }
    }

    pub fn subtract(&self, val: &Self) -> Self {
        Self {
            value: &self.value - &val.value,
            hex_length: self.hex_length.or(val.hex_length),
        }
    }

    pub fn multiply(&self, val: &Self) -> Self {
        Self {
            value: &self.value * &val.value,
            hex_length: self.hex_length.or(val.hex_length),
        }
    }

    /// Remainder normalized into `[0, m)`, whatever the sign of `self`.
    /// The result takes the modulus's width.
    pub fn modulo(&self, m: &Self) -> Self {
        let mut r = &self.value % &m.value;
        if r.sign() == Sign::Minus {
            r += &m.value;
        }
        Self {
            value: r,
            hex_length: m.hex_length,
        }
    }

    /// Modular exponentiation via a Montgomery ladder.
    ///
    /// Each bit performs one multiply and one square regardless of its
    /// value, so the sequence of big-number operations does not depend on
    /// the exponent's bit pattern. (Allocation sizes inside the big-number
    /// library still vary; a fully constant-time implementation needs
    /// fixed-width limb arithmetic.)
    ///
    /// The base is normalized into `[0, modulus)` first, so negative bases
    /// are fine. The result is in `[0, modulus)` and takes the modulus's
    /// width. The modulus must be positive.
    pub fn mod_pow(&self, exponent: &Self, modulus: &Self) -> Self {
        let m = modulus
            .value
            .to_biguint()
            .unwrap_or_default();

        // base mod m, guaranteed non-negative
        let mut normalized = &self.value % &modulus.value;
        if normalized.sign() == Sign::Minus {
            normalized += &modulus.value;
        }
        let base = normalized.to_biguint().unwrap_or_default();

        // A negative exponent degenerates to the empty ladder.
        let exp_bytes = exponent
            .value
            .to_biguint()
            .unwrap_or_default()
            .to_bytes_be();

        let one = BigUint::from(1u32);
        let mut r0 = &one % &m;
        let mut r1 = base;
        for byte in exp_bytes {
            for shift in (0..8).rev() {
                if (byte >> shift) & 1 == 1 {
                    r0 = (&r0 * &r1) % &m;
                    r1 = (&r1 * &r1) % &m;
                } else {
                    r1 = (&r0 * &r1) % &m;
                    r0 = (&r0 * &r0) % &m;
                }
            }
        }

        Self {
            value: BigInt::from_biguint(Sign::Plus, r0),
            hex_length: modulus.hex_length,
        }
    }

    /// Bitwise exclusive-or. Defined for operands of equal bit length
    /// (hash digests); callers pad both sides to a common width first.
    pub fn xor(&self, val: &Self) -> Self {
        Self {
            value: &self.value ^ &val.value,
            hex_length: self.hex_length,
        }
    }
}

/// Equality is numeric; the nominal width is ignored.
impl PartialEq for SrpInteger {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SrpInteger {}

/// Shows a truncated hex preview, never the full value.
impl fmt::Debug for SrpInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.value.to_str_radix(16);
        if hex.len() > 16 {
            write!(f, "<SrpInteger {}...>", &hex[..16])
        } else {
            write!(f, "<SrpInteger {}>", hex)
        }
    }
}
