//! Script construction and parsing for the two output shapes this workspace
//! emits: change outputs and zero-value data carriers.

use std::{fmt, io};
use std::io::Read as _;

use serde::{Deserialize, Serialize};

use crate::{
    compactint::CompactInt,
    serialization::{PastelDeserialize, PastelSerialize, SerializationError},
};

/// The script opcodes used by the carrier and change templates.
pub mod opcode {
    /// Push the next 1 byte as a length, then that many bytes.
    pub const OP_PUSHDATA1: u8 = 0x4C;
    /// Push the next 2 bytes (LE) as a length, then that many bytes.
    pub const OP_PUSHDATA2: u8 = 0x4D;
    /// Push the next 4 bytes (LE) as a length, then that many bytes.
    pub const OP_PUSHDATA4: u8 = 0x4E;
    /// Push the number 1.
    pub const OP_1: u8 = 0x51;
    /// Duplicate the top stack item.
    pub const OP_DUP: u8 = 0x76;
    /// Pop and verify equality.
    pub const OP_EQUALVERIFY: u8 = 0x88;
    /// RIPEMD160(SHA256(x)) of the top stack item.
    pub const OP_HASH160: u8 = 0xA9;
    /// Check a single signature.
    pub const OP_CHECKSIG: u8 = 0xAC;
    /// Check an m-of-n multisignature.
    pub const OP_CHECKMULTISIG: u8 = 0xAE;
}

/// The length of the pubkey-shaped filler slot in a carrier script.
pub const CARRIER_FILLER_LEN: usize = 33;

/// The length of the carrier template preceding the data push:
/// `OP_1 0x21 <33 filler bytes> OP_1 OP_CHECKMULTISIG`.
pub const CARRIER_TEMPLATE_LEN: usize = 37;

/// An encoding of a Pastel script.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Hash)]
#[cfg_attr(
    any(test, feature = "proptest-impl"),
    derive(proptest_derive::Arbitrary)
)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// The serialized length of this script including its length prefix.
    pub fn serialized_size(&self) -> usize {
        CompactInt::size(self.0.len()) + self.0.len()
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Script")
            .field(&hex::encode(&self.0))
            .finish()
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PastelSerialize for Script {
    fn pastel_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        CompactInt::from(self.0.len()).pastel_serialize(&mut writer)?;
        writer.write_all(&self.0[..])?;
        Ok(())
    }
}

impl PastelDeserialize for Script {
    fn pastel_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        let len = CompactInt::pastel_deserialize(&mut reader)?.value();
        let mut bytes = Vec::new();
        io::Read::take(reader, len).read_to_end(&mut bytes)?;
        if bytes.len() as u64 != len {
            return Err(SerializationError::Parse("script shorter than its length"));
        }
        Ok(Script(bytes))
    }
}

/// Frame `data` with the Bitcoin script push prefix for its length class.
pub fn pushdata(data: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(data.len() + 5);
    match data.len() {
        len if len < 76 => framed.push(len as u8),
        len if len < 256 => {
            framed.push(opcode::OP_PUSHDATA1);
            framed.push(len as u8);
        }
        len if len < 65536 => {
            framed.push(opcode::OP_PUSHDATA2);
            framed.extend_from_slice(&(len as u16).to_le_bytes());
        }
        len => {
            framed.push(opcode::OP_PUSHDATA4);
            framed.extend_from_slice(&(len as u32).to_le_bytes());
        }
    }
    framed.extend_from_slice(data);
    framed
}

/// Parse one pushdata element at the start of `bytes`.
///
/// Returns the pushed body and the total number of bytes consumed including
/// the prefix.
pub fn parse_pushdata(bytes: &[u8]) -> Result<(&[u8], usize), SerializationError> {
    let (len, prefix) = match bytes.first() {
        None => return Err(SerializationError::Parse("empty pushdata")),
        Some(&direct) if direct < 76 => (direct as usize, 1),
        Some(&opcode::OP_PUSHDATA1) => match bytes.get(1) {
            Some(&len) => (len as usize, 2),
            None => return Err(SerializationError::Parse("truncated pushdata prefix")),
        },
        Some(&opcode::OP_PUSHDATA2) => match bytes.get(1..3) {
            Some(len) => (u16::from_le_bytes([len[0], len[1]]) as usize, 3),
            None => return Err(SerializationError::Parse("truncated pushdata prefix")),
        },
        Some(&opcode::OP_PUSHDATA4) => match bytes.get(1..5) {
            Some(len) => (
                u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize,
                5,
            ),
            None => return Err(SerializationError::Parse("truncated pushdata prefix")),
        },
        Some(_) => return Err(SerializationError::Parse("not a pushdata opcode")),
    };
    match bytes.get(prefix..prefix + len) {
        Some(body) => Ok((body, prefix + len)),
        None => Err(SerializationError::Parse("pushdata body shorter than prefix")),
    }
}

/// The standard pay-to-public-key-hash lock script.
///
/// The hash field is pushed verbatim with its length prefix. Carrier change
/// outputs feed this a 32-byte SHA3-256 of the change address string, which
/// commits to the address but is not a HASH160 the wallet can redeem.
pub fn p2pkh(pubkey_hash: &[u8]) -> Script {
    let mut script = Vec::with_capacity(pubkey_hash.len() + 5);
    script.push(opcode::OP_DUP);
    script.push(opcode::OP_HASH160);
    script.push(pubkey_hash.len() as u8);
    script.extend_from_slice(pubkey_hash);
    script.push(opcode::OP_EQUALVERIFY);
    script.push(opcode::OP_CHECKSIG);
    Script(script)
}

/// The zero-value data carrier script: a 1-of-1 pseudo-multisig over a
/// random pubkey-shaped filler, followed by the data as one push element.
///
/// `OP_1 0x21 <filler> OP_1 OP_CHECKMULTISIG pushdata(body)`
pub fn data_carrier(filler: &[u8; CARRIER_FILLER_LEN], body: &[u8]) -> Script {
    let mut script = Vec::with_capacity(CARRIER_TEMPLATE_LEN + body.len() + 5);
    script.push(opcode::OP_1);
    script.push(CARRIER_FILLER_LEN as u8);
    script.extend_from_slice(filler);
    script.push(opcode::OP_1);
    script.push(opcode::OP_CHECKMULTISIG);
    script.extend_from_slice(&pushdata(body));
    Script(script)
}

/// Extract the data body from a carrier script, or `None` if `script` is not
/// a carrier.
///
/// Recognition checks the full template: the `OP_1 0x21` head, the `OP_1
/// OP_CHECKMULTISIG` tail of the multisig portion, and a well-formed push
/// element that spans exactly the rest of the script.
pub fn parse_data_carrier(script: &Script) -> Option<&[u8]> {
    let bytes = &script.0;
    if bytes.len() <= CARRIER_TEMPLATE_LEN {
        return None;
    }
    if bytes[0] != opcode::OP_1
        || bytes[1] != CARRIER_FILLER_LEN as u8
        || bytes[CARRIER_TEMPLATE_LEN - 2] != opcode::OP_1
        || bytes[CARRIER_TEMPLATE_LEN - 1] != opcode::OP_CHECKMULTISIG
    {
        return None;
    }
    let (body, consumed) = parse_pushdata(&bytes[CARRIER_TEMPLATE_LEN..]).ok()?;
    if consumed != bytes.len() - CARRIER_TEMPLATE_LEN {
        return None;
    }
    Some(body)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;

    use super::*;

    fn filler() -> [u8; CARRIER_FILLER_LEN] {
        [0x5A; CARRIER_FILLER_LEN]
    }

    #[test]
    fn pushdata_length_classes() {
        pastel_test::init();

        for (len, prefix) in [
            (0usize, 1usize),
            (75, 1),
            (76, 2),
            (255, 2),
            (256, 3),
            (65535, 3),
            (65536, 5),
        ] {
            let data = vec![0xCD; len];
            let framed = pushdata(&data);
            assert_eq!(framed.len(), len + prefix, "prefix width for {}", len);

            let (body, consumed) = parse_pushdata(&framed).expect("framed data should parse");
            assert_eq!(body, &data[..]);
            assert_eq!(consumed, framed.len());
        }
    }

    #[test]
    fn pushdata_rejects_truncation() {
        pastel_test::init();

        assert!(parse_pushdata(&[]).is_err());
        assert!(parse_pushdata(&[5, 1, 2]).is_err());
        assert!(parse_pushdata(&[opcode::OP_PUSHDATA2, 0xFF]).is_err());
        assert!(parse_pushdata(&[opcode::OP_PUSHDATA1, 200, 0]).is_err());
    }

    #[test]
    fn carrier_template_bytes() {
        pastel_test::init();

        let script = data_carrier(&filler(), b"ticket");
        assert_eq!(&script.0[..2], &[opcode::OP_1, 0x21]);
        assert_eq!(
            &script.0[CARRIER_TEMPLATE_LEN - 2..CARRIER_TEMPLATE_LEN],
            &[opcode::OP_1, opcode::OP_CHECKMULTISIG]
        );
        // single-byte push prefix for a six byte body
        assert_eq!(script.0[CARRIER_TEMPLATE_LEN], 6);
        assert_eq!(script.0.len(), CARRIER_TEMPLATE_LEN + 1 + 6);
    }

    #[test]
    fn carrier_rejects_foreign_scripts() {
        pastel_test::init();

        assert_eq!(parse_data_carrier(&p2pkh(&[0x11; 20])), None);
        assert_eq!(parse_data_carrier(&Script(Vec::new())), None);

        // valid template, truncated push body
        let mut script = data_carrier(&filler(), &[0xEE; 300]);
        script.0.truncate(script.0.len() - 1);
        assert_eq!(parse_data_carrier(&script), None);

        // trailing garbage after the push element
        let mut script = data_carrier(&filler(), b"x");
        script.0.push(0x00);
        assert_eq!(parse_data_carrier(&script), None);
    }

    #[test]
    fn p2pkh_layout() {
        pastel_test::init();

        let script = p2pkh(&[0x22; 32]);
        assert_eq!(script.0.len(), 37);
        assert_eq!(script.0[0], opcode::OP_DUP);
        assert_eq!(script.0[1], opcode::OP_HASH160);
        assert_eq!(script.0[2], 32);
        assert_eq!(script.0[35], opcode::OP_EQUALVERIFY);
        assert_eq!(script.0[36], opcode::OP_CHECKSIG);
    }

    proptest! {
        #[test]
        fn script_roundtrip(script in any::<Script>()) {
            pastel_test::init();

            let mut bytes = Cursor::new(Vec::new());
            script.pastel_serialize(&mut bytes)?;

            bytes.set_position(0);
            let other_script = Script::pastel_deserialize(&mut bytes)?;

            prop_assert_eq![script, other_script];
        }

        #[test]
        fn carrier_roundtrip(body in proptest::collection::vec(any::<u8>(), 0..4096)) {
            pastel_test::init();

            let script = data_carrier(&filler(), &body);
            let parsed = parse_data_carrier(&script).expect("carrier should parse");
            prop_assert_eq!(parsed, &body[..]);
        }
    }
}
