//! Contains impls of `PastelSerialize`, `PastelDeserialize` for
//! [`Transaction`], so that all of the transaction wire logic is in one
//! place.

use std::io;

use crate::serialization::{PastelDeserialize, PastelSerialize, SerializationError};
use crate::transparent;

use super::Transaction;

/// A sanity limit on the size of a deserialized transaction, to protect
/// against DOS from hostile length prefixes. Carrier transactions stay far
/// below this.
pub const MAX_TX_SIZE: u64 = 1_000_000;

impl PastelSerialize for Transaction {
    fn pastel_serialize<W: io::Write>(&self, mut target: W) -> Result<(), io::Error> {
        self.version.pastel_serialize(&mut target)?;
        self.inputs.pastel_serialize(&mut target)?;
        self.outputs.pastel_serialize(&mut target)?;
        self.locktime.pastel_serialize(&mut target)?;
        Ok(())
    }
}

impl PastelDeserialize for Transaction {
    fn pastel_deserialize<R: io::Read>(src: R) -> Result<Self, SerializationError> {
        let mut src = src.take(MAX_TX_SIZE);
        let version = i32::pastel_deserialize(&mut src)?;
        let inputs = <Vec<transparent::Input>>::pastel_deserialize(&mut src)?;
        let outputs = <Vec<transparent::Output>>::pastel_deserialize(&mut src)?;
        let locktime = u32::pastel_deserialize(&mut src)?;
        Ok(Transaction {
            version,
            inputs,
            outputs,
            locktime,
        })
    }
}
