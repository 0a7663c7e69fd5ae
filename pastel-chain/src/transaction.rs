//! Transactions and transaction-related structures.

use serde::{Deserialize, Serialize};

use crate::{
    compactint::CompactInt, transparent, PastelDeserializeInto, PastelSerialize,
    SerializationError,
};

mod hash;
mod serialize;

pub use hash::Hash;

/// A transparent Pastel transaction.
///
/// Only the transparent fields inherited from Bitcoin are modeled: this
/// workspace never assembles shielded components, and the node accepts the
/// legacy layout for purely transparent spends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    any(test, feature = "proptest-impl"),
    derive(proptest_derive::Arbitrary)
)]
pub struct Transaction {
    /// The transaction version. Always 1 for transactions built here.
    pub version: i32,
    /// The transaction inputs, in selection order.
    pub inputs: Vec<transparent::Input>,
    /// The transaction outputs, in construction order. By convention the
    /// change output is last.
    pub outputs: Vec<transparent::Output>,
    /// The transaction lock time. Always 0 for transactions built here.
    pub locktime: u32,
}

impl Transaction {
    /// Build a version-1, locktime-0 transaction from inputs and outputs.
    pub fn new(
        inputs: Vec<transparent::Input>,
        outputs: Vec<transparent::Output>,
    ) -> Transaction {
        Transaction {
            version: 1,
            inputs,
            outputs,
            locktime: 0,
        }
    }

    /// Returns the serialized length (in bytes) of this transaction.
    pub fn len(&self) -> usize {
        let mut size = 4 + CompactInt::size(self.inputs.len());
        for input in self.inputs.iter() {
            size += input.len();
        }
        size += CompactInt::size(self.outputs.len());
        for output in self.outputs.iter() {
            size += output.len();
        }
        size + 4
    }

    /// Whether this transaction has no inputs and no outputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    /// Serialize to the hex form submitted to the node.
    pub fn to_hex(&self) -> Result<String, std::io::Error> {
        Ok(hex::encode(self.pastel_serialize_to_vec()?))
    }

    /// Parse a transaction from the hex form returned by the node.
    ///
    /// Rejects trailing bytes: a raw transaction is always a complete hex
    /// string, so leftovers mean the input was not a transaction.
    pub fn from_hex(hex_str: &str) -> Result<Transaction, SerializationError> {
        let data =
            hex::decode(hex_str).map_err(|_| SerializationError::Parse("invalid hex"))?;
        let mut cursor = std::io::Cursor::new(&data);
        let tx: Transaction = (&mut cursor).pastel_deserialize_into()?;
        if cursor.position() as usize != data.len() {
            return Err(SerializationError::Parse("trailing bytes after transaction"));
        }
        Ok(tx)
    }
}
