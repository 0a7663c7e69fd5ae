//! Consensus-critical serialization.
//!
//! This module contains two traits: [`PastelSerialize`] and
//! [`PastelDeserialize`], analogs of the Serde `Serialize` and `Deserialize`
//! traits but intended for the byte-exact transaction wire format, plus
//! primitive impls for the integer widths and byte shapes that format uses.
//! Multi-byte integers are little-endian unless a type says otherwise.

mod deserialize;
mod error;

pub use deserialize::{PastelDeserialize, PastelDeserializeInto};
pub use error::SerializationError;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::compactint::CompactInt;

/// A type that can serialize itself into the Pastel wire format.
pub trait PastelSerialize {
    /// Write `self` to `target` in wire byte order.
    fn pastel_serialize<W: std::io::Write>(&self, target: W) -> Result<(), std::io::Error>;

    /// Serialize into a freshly allocated buffer.
    fn pastel_serialize_to_vec(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut data = Vec::new();
        self.pastel_serialize(&mut data)?;
        Ok(data)
    }
}

impl PastelSerialize for u16 {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        target.write_u16::<LittleEndian>(*self)
    }
}

impl PastelSerialize for u32 {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        target.write_u32::<LittleEndian>(*self)
    }
}

impl PastelSerialize for u64 {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        target.write_u64::<LittleEndian>(*self)
    }
}

impl PastelSerialize for i32 {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        target.write_i32::<LittleEndian>(*self)
    }
}

impl PastelSerialize for i64 {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        target.write_i64::<LittleEndian>(*self)
    }
}

impl PastelSerialize for [u8; 32] {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        target.write_all(self)
    }
}

/// Length-framed bytes: a [`CompactInt`] count followed by the raw bytes.
// Note: no `u8: PastelSerialize` impl exists, so this does not overlap with
// the generic `Vec<T>` impl below.
impl PastelSerialize for Vec<u8> {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        CompactInt::from(self.len()).pastel_serialize(&mut target)?;
        target.write_all(self)
    }
}

impl<T> PastelSerialize for Vec<T>
where
    T: PastelSerialize,
{
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        CompactInt::from(self.len()).pastel_serialize(&mut target)?;
        for item in self.iter() {
            item.pastel_serialize(&mut target)?;
        }
        Ok(())
    }
}
