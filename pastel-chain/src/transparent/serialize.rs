//! Wire impls for the transparent transaction pieces.

use std::io;

use crate::serialization::{PastelDeserialize, PastelSerialize, SerializationError};
use crate::{transaction, Amount};

use super::{Input, OutPoint, Output, Script};

impl PastelSerialize for OutPoint {
    fn pastel_serialize<W: io::Write>(&self, mut target: W) -> Result<(), io::Error> {
        self.hash.pastel_serialize(&mut target)?;
        self.index.pastel_serialize(&mut target)?;
        Ok(())
    }
}

impl PastelDeserialize for OutPoint {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        Ok(OutPoint {
            hash: transaction::Hash::pastel_deserialize(&mut reader)?,
            index: u32::pastel_deserialize(&mut reader)?,
        })
    }
}

impl PastelSerialize for Input {
    fn pastel_serialize<W: io::Write>(&self, mut target: W) -> Result<(), io::Error> {
        self.outpoint.pastel_serialize(&mut target)?;
        self.unlock_script.pastel_serialize(&mut target)?;
        self.sequence.pastel_serialize(&mut target)?;
        Ok(())
    }
}

impl PastelDeserialize for Input {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        Ok(Input {
            outpoint: OutPoint::pastel_deserialize(&mut reader)?,
            unlock_script: Script::pastel_deserialize(&mut reader)?,
            sequence: u32::pastel_deserialize(&mut reader)?,
        })
    }
}

impl PastelSerialize for Output {
    fn pastel_serialize<W: io::Write>(&self, mut target: W) -> Result<(), io::Error> {
        self.value.pastel_serialize(&mut target)?;
        self.lock_script.pastel_serialize(&mut target)?;
        Ok(())
    }
}

impl PastelDeserialize for Output {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        Ok(Output {
            value: Amount::pastel_deserialize(&mut reader)?,
            lock_script: Script::pastel_deserialize(&mut reader)?,
        })
    }
}
