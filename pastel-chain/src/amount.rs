//! Fixed-point PSL amounts.
//!
//! All money in this workspace is an integer count of atomic units so that
//! fee arithmetic is exact; the node's JSON decimals are converted at the
//! serde boundary.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{PastelDeserialize, PastelSerialize, SerializationError};

/// Atomic units per PSL. Note the denominator is 10^5, not the 10^8 used by
/// most Bitcoin-family chains.
pub const COIN: i64 = 100_000;

/// The standard relay fee rate: 0.0001 PSL per kilobyte of transaction.
pub const FEE_PER_KB: Amount = Amount(10);

/// An amount of PSL, in atomic units.
///
/// On the wire this is the signed 8-byte little-endian output value field.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    any(test, feature = "proptest-impl"),
    derive(proptest_derive::Arbitrary)
)]
pub struct Amount(i64);

impl Amount {
    /// Zero PSL.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a count of atomic units.
    pub fn from_atomic(atomic: i64) -> Amount {
        Amount(atomic)
    }

    /// Convert a decimal PSL value (as received from the node's JSON) to the
    /// nearest atomic unit.
    pub fn from_psl(psl: f64) -> Amount {
        Amount((psl * COIN as f64).round() as i64)
    }

    /// The count of atomic units.
    pub fn atomic(&self) -> i64 {
        self.0
    }

    /// The decimal PSL value, for display and JSON only.
    pub fn to_psl(&self) -> f64 {
        self.0 as f64 / COIN as f64
    }

    /// The fee owed for a transaction of `size` bytes at [`FEE_PER_KB`],
    /// rounded up to the next atomic unit.
    pub fn fee_for_size(size: usize) -> Amount {
        let numerator = size as i64 * FEE_PER_KB.0;
        Amount((numerator + 999) / 1000)
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction. The result may be negative.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:05}",
            sign,
            abs / COIN as u64,
            abs % COIN as u64
        )
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Amount").field(&format_args!("{}", self)).finish()
    }
}

impl PastelSerialize for Amount {
    fn pastel_serialize<W: std::io::Write>(&self, target: W) -> Result<(), std::io::Error> {
        self.0.pastel_serialize(target)
    }
}

impl PastelDeserialize for Amount {
    fn pastel_deserialize<R: std::io::Read>(reader: R) -> Result<Amount, SerializationError> {
        Ok(Amount(i64::pastel_deserialize(reader)?))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_psl())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let psl = f64::deserialize(deserializer)?;
        if !psl.is_finite() {
            return Err(de::Error::custom("amount is not a finite number"));
        }
        Ok(Amount::from_psl(psl))
    }
}
