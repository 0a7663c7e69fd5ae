//! The Bitcoin-inherited variable-width integer used for every length prefix
//! in the transaction format.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{PastelDeserialize, PastelSerialize, SerializationError};

/// A variable-width integer: one byte below `0xFD`, otherwise a marker byte
/// followed by a 2-, 4-, or 8-byte little-endian value.
///
/// Nothing in this workspace serializes counts above `0xFFFF`, but the full
/// encoding is kept so that foreign transactions always deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactInt(u64);

impl CompactInt {
    /// Wrap a length as a `CompactInt`.
    pub fn from(value: usize) -> CompactInt {
        CompactInt(value as u64)
    }

    /// The wrapped value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The encoded width, in bytes, of `value`.
    pub fn size(value: usize) -> usize {
        if value < 0xFD {
            1
        } else if value <= 0xFFFF {
            3
        } else if value <= 0xFFFF_FFFF {
            5
        } else {
            9
        }
    }
}

impl PastelSerialize for CompactInt {
    fn pastel_serialize<W: std::io::Write>(&self, mut target: W) -> Result<(), std::io::Error> {
        if self.0 < 0xFD {
            target.write_all(&[self.0 as u8])
        } else if self.0 <= 0xFFFF {
            target.write_all(&[0xFD])?;
            target.write_u16::<LittleEndian>(self.0 as u16)
        } else if self.0 <= 0xFFFF_FFFF {
            target.write_all(&[0xFE])?;
            target.write_u32::<LittleEndian>(self.0 as u32)
        } else {
            target.write_all(&[0xFF])?;
            target.write_u64::<LittleEndian>(self.0)
        }
    }
}

impl PastelDeserialize for CompactInt {
    fn pastel_deserialize<R: std::io::Read>(
        mut reader: R,
    ) -> Result<CompactInt, SerializationError> {
        let first = u8::pastel_deserialize(&mut reader)?;
        let value = match first {
            0xFD => u16::pastel_deserialize(&mut reader)? as u64,
            0xFE => u32::pastel_deserialize(&mut reader)? as u64,
            0xFF => u64::pastel_deserialize(&mut reader)?,
            direct => direct as u64,
        };
        Ok(CompactInt(value))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn encoded_widths() {
        pastel_test::init();

        for (value, expected) in [
            (0usize, vec![0x00]),
            (0xFC, vec![0xFC]),
            (0xFD, vec![0xFD, 0xFD, 0x00]),
            (0xFFFF, vec![0xFD, 0xFF, 0xFF]),
            (0x1_0000, vec![0xFE, 0x00, 0x00, 0x01, 0x00]),
        ] {
            let encoded = CompactInt::from(value)
                .pastel_serialize_to_vec()
                .expect("writing to a Vec never fails");
            assert_eq!(encoded, expected, "encoding of {}", value);
            assert_eq!(encoded.len(), CompactInt::size(value));
        }
    }

    proptest! {
        #[test]
        fn compactint_roundtrip(value in any::<u64>()) {
            pastel_test::init();

            let int = CompactInt(value);
            let mut bytes = Cursor::new(Vec::new());
            int.pastel_serialize(&mut bytes)?;

            bytes.set_position(0);
            let other = CompactInt::pastel_deserialize(&mut bytes)?;

            prop_assert_eq![int, other];
        }
    }
}
