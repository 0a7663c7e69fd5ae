//! Transparent-related (Bitcoin-inherited) transaction pieces.

use serde::{Deserialize, Serialize};

use crate::{transaction, Amount};

pub mod script;
mod serialize;

pub use script::Script;

/// OutPoint
///
/// A particular transaction output reference.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Hash)]
#[cfg_attr(
    any(test, feature = "proptest-impl"),
    derive(proptest_derive::Arbitrary)
)]
pub struct OutPoint {
    /// References the transaction that contains the UTXO being spent.
    pub hash: transaction::Hash,

    /// Identifies which UTXO from that transaction is referenced; the
    /// first output is 0, etc.
    pub index: u32,
}

impl OutPoint {
    /// The serialized length of an outpoint.
    #[inline]
    pub const fn len() -> usize {
        36
    }
}

/// A transparent input to a transaction.
///
/// Inputs built here always reference a previous output: this workspace
/// never constructs coinbases. The unlock script stays empty during
/// assembly; the node fills it at signing time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    any(test, feature = "proptest-impl"),
    derive(proptest_derive::Arbitrary)
)]
pub struct Input {
    /// The previous output transaction reference.
    pub outpoint: OutPoint,
    /// The script that authorizes spending `outpoint`.
    pub unlock_script: Script,
    /// The sequence number for the input.
    pub sequence: u32,
}

impl Input {
    /// An unsigned spend of `outpoint` with the final sequence number.
    pub fn new(outpoint: OutPoint) -> Input {
        Input {
            outpoint,
            unlock_script: Script(Vec::new()),
            sequence: 0xFFFF_FFFF,
        }
    }

    /// Returns the serialized length (in bytes) of this input.
    pub fn len(&self) -> usize {
        OutPoint::len() + self.unlock_script.serialized_size() + 4
    }

    /// Whether the unlock script is still empty.
    pub fn is_empty(&self) -> bool {
        self.unlock_script.0.is_empty()
    }
}

/// A transparent output from a transaction.
///
/// UTXOs are indivisible, discrete units of value which can only be consumed
/// in their entirety, so every transaction built here returns the unspent
/// remainder of its inputs through a trailing change output.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Hash)]
#[cfg_attr(
    any(test, feature = "proptest-impl"),
    derive(proptest_derive::Arbitrary)
)]
pub struct Output {
    /// Transaction value; zero for data-carrying outputs.
    pub value: Amount,

    /// The lock script defines the conditions under which this output can be
    /// spent.
    pub lock_script: Script,
}

impl Output {
    /// Returns the serialized length (in bytes) of this output.
    pub fn len(&self) -> usize {
        8 + self.lock_script.serialized_size()
    }
}
