use std::io;

use byteorder::{LittleEndian, ReadBytesExt};

use super::SerializationError;
use crate::compactint::CompactInt;

type Result<R> = std::result::Result<R, SerializationError>;

/// A type that can deserialize itself from the Pastel wire format.
pub trait PastelDeserialize {
    /// Read `Self` from `reader` in wire byte order.
    fn pastel_deserialize<R: io::Read>(reader: R) -> Result<Self>
    where
        Self: Sized;
}

/// Helper for deserializing more succinctly via type inference.
pub trait PastelDeserializeInto {
    /// Deserialize based on type inference.
    fn pastel_deserialize_into<T>(self) -> Result<T>
    where
        T: PastelDeserialize;
}

impl<R: io::Read> PastelDeserializeInto for R {
    fn pastel_deserialize_into<T>(self) -> Result<T>
    where
        T: PastelDeserialize,
    {
        T::pastel_deserialize(self)
    }
}

impl PastelDeserialize for u8 {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<u8> {
        Ok(reader.read_u8()?)
    }
}

impl PastelDeserialize for u16 {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<u16> {
        Ok(reader.read_u16::<LittleEndian>()?)
    }
}

impl PastelDeserialize for u32 {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<u32> {
        Ok(reader.read_u32::<LittleEndian>()?)
    }
}

impl PastelDeserialize for u64 {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<u64> {
        Ok(reader.read_u64::<LittleEndian>()?)
    }
}

impl PastelDeserialize for i32 {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<i32> {
        Ok(reader.read_i32::<LittleEndian>()?)
    }
}

impl PastelDeserialize for i64 {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<i64> {
        Ok(reader.read_i64::<LittleEndian>()?)
    }
}

impl PastelDeserialize for [u8; 32] {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<[u8; 32]> {
        let mut result = [0u8; 32];
        reader.read_exact(&mut result)?;
        Ok(result)
    }
}

impl<T> PastelDeserialize for Vec<T>
where
    T: PastelDeserialize,
{
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<Vec<T>> {
        let len = CompactInt::pastel_deserialize(&mut reader)?.value() as usize;
        // Limit preallocation since blind preallocation from a length prefix
        // is a DOS vulnerability.
        let blind_alloc_limit = 1024;
        let mut result: Vec<T> = Vec::with_capacity(std::cmp::min(len, blind_alloc_limit));
        for _ in 0..len {
            result.push(T::pastel_deserialize(&mut reader)?);
        }
        Ok(result)
    }
}
