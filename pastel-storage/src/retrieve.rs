//! The retrieve path: carrier extraction, index resolution, reassembly.

use futures::future;
use tracing::{error, info, warn};

use pastel_chain::{
    transaction,
    transparent::{script, Script},
};
use pastel_rpc::WalletRpc;

use crate::{frame, Error, TicketStorage};

/// The length of one hex txid inside an index record body.
const TXID_HEX_LEN: usize = 64;

impl<R: WalletRpc> TicketStorage<R> {
    /// Retrieve the payload stored under `txid`.
    ///
    /// Returns `Ok(None)` when the transaction has no carrier output or when
    /// the reassembled frame fails hash verification; node conversation
    /// failures propagate as errors.
    pub async fn retrieve(
        &self,
        txid: &transaction::Hash,
    ) -> Result<Option<Vec<u8>>, Error> {
        let Some(body) = self.carrier_body(txid).await? else {
            warn!(%txid, "transaction has no carrier output");
            return Ok(None);
        };

        // An index record is a whole number of hex txids, at least two of
        // them; anything else is a frame stored in a single transaction. A
        // frame cannot be mistaken for an index: its digests are raw bytes,
        // which never all land in the hex alphabet.
        let frame = match parse_index_record(&body) {
            Some(chunk_ids) => {
                info!(chunks = chunk_ids.len(), "resolving index record");
                match self.reassemble(&chunk_ids).await? {
                    Some(frame) => frame,
                    None => return Ok(None),
                }
            }
            None => body,
        };

        match frame::parse(&frame) {
            Ok(payload) => {
                info!(len = payload.len(), "data retrieved from the blockchain");
                Ok(Some(payload))
            }
            Err(err) => {
                error!(%err, %txid, "retrieved frame failed verification");
                Ok(None)
            }
        }
    }

    /// The body of the first carrier output of `txid`, if any.
    async fn carrier_body(
        &self,
        txid: &transaction::Hash,
    ) -> Result<Option<Vec<u8>>, Error> {
        let raw = self.rpc.get_raw_transaction(txid).await?;
        let decoded = self.rpc.decode_raw_transaction(&raw).await?;
        for vout in decoded.vout {
            let Ok(bytes) = hex::decode(&vout.script_pub_key.hex) else {
                // not parseable as a script; fall through to the next output
                continue;
            };
            let lock_script = Script(bytes);
            if let Some(body) = script::parse_data_carrier(&lock_script) {
                return Ok(Some(body.to_vec()));
            }
        }
        Ok(None)
    }

    /// Fetch every chunk, restore index order, and concatenate the slices.
    ///
    /// Chunk fetches run concurrently under the retrieval gate; arrival
    /// order does not matter because each body carries its own index.
    async fn reassemble(
        &self,
        chunk_ids: &[transaction::Hash],
    ) -> Result<Option<Vec<u8>>, Error> {
        let fetches = chunk_ids.iter().map(|id| self.retrieve_chunk(id));
        let bodies = future::try_join_all(fetches).await?;

        let mut parts = Vec::with_capacity(bodies.len());
        for (id, body) in chunk_ids.iter().zip(bodies) {
            match body {
                Some(part) if part.len() >= 2 => parts.push(part),
                _ => {
                    warn!(txid = %id, "chunk transaction is missing its carrier body");
                    return Ok(None);
                }
            }
        }
        parts.sort_by_key(|part| u16::from_be_bytes([part[0], part[1]]));

        let mut frame = Vec::with_capacity(parts.iter().map(|p| p.len() - 2).sum());
        for part in &parts {
            frame.extend_from_slice(&part[2..]);
        }
        Ok(Some(frame))
    }

    /// The carrier body of one chunk transaction, gated so that wide index
    /// records cannot flood the node.
    async fn retrieve_chunk(
        &self,
        txid: &transaction::Hash,
    ) -> Result<Option<Vec<u8>>, Error> {
        let _gate = self
            .retrieval_gate
            .acquire()
            .await
            .expect("retrieval gate is never closed");
        self.carrier_body(txid).await
    }
}

/// Interpret `body` as a concatenation of 64-character hex txids, if its
/// shape allows it.
fn parse_index_record(body: &[u8]) -> Option<Vec<transaction::Hash>> {
    if body.len() < 2 * TXID_HEX_LEN || body.len() % TXID_HEX_LEN != 0 {
        return None;
    }
    body.chunks(TXID_HEX_LEN)
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|hex_id| hex_id.parse().ok())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_records_need_whole_txids() {
        pastel_test::init();

        let id = "11".repeat(32);
        let two_ids: Vec<u8> = format!("{}{}", id, id).into_bytes();
        let parsed = parse_index_record(&two_ids).expect("two txids should parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].to_string(), id);

        // one txid alone is a frame-sized body, not an index
        assert!(parse_index_record(id.as_bytes()).is_none());
        // a ragged length is not an index
        assert!(parse_index_record(&two_ids[..100]).is_none());
        // non-hex content of the right shape is not an index
        let mut corrupt = two_ids.clone();
        corrupt[3] = b'z';
        assert!(parse_index_record(&corrupt).is_none());
        // raw digest bytes are not an index
        assert!(parse_index_record(&[0xAB; 2 * TXID_HEX_LEN]).is_none());
    }
}
