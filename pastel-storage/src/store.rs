//! The store path: frame, chunk, submit, index.

use tracing::{error, info};

use pastel_chain::transaction;
use pastel_rpc::WalletRpc;

use crate::{frame, Error, TicketStorage};

impl<R: WalletRpc> TicketStorage<R> {
    /// Store `payload` on chain and return the transaction id that retrieves
    /// it.
    ///
    /// The payload is framed (compressed and double-hashed), split into
    /// chunks, and each chunk broadcast as its own carrier transaction, in
    /// index order, one at a time so that concurrent selections cannot spend
    /// the same outputs. When more than one chunk exists, a final index
    /// transaction records the chunk ids and becomes the handle; a lone
    /// chunk is its own handle.
    ///
    /// Returns `Ok(None)` when the wallet cannot fund or sign the operation;
    /// chunks already broadcast stay on chain, orphaned. There is no
    /// rollback.
    pub async fn store(&self, payload: &[u8]) -> Result<Option<transaction::Hash>, Error> {
        // release anything a previous operation left locked
        self.rpc.unlock_all_unspent().await?;

        let frame = frame::build(payload)?;
        let chunks = frame::split(&frame);
        info!(
            frame_len = frame.len(),
            chunks = chunks.len(),
            "storing payload"
        );

        if let [only] = chunks.as_slice() {
            // a single transaction holds the whole frame; no index record
            return self.submit_carrier(only).await;
        }

        let mut txids = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let body = frame::chunk_body(index as u16, chunk);
            match self.submit_carrier(&body).await? {
                Some(txid) => txids.push(txid),
                None => {
                    error!(index, "chunk submission failed, aborting the store");
                    return Ok(None);
                }
            }
        }
        info!(?txids, "data chunks stored");

        let index_body: Vec<u8> = txids
            .iter()
            .flat_map(|txid| txid.to_string().into_bytes())
            .collect();
        let handle = self.submit_carrier(&index_body).await?;
        if let Some(txid) = &handle {
            info!(%txid, "index transaction stored, payload is retrievable");
        }
        Ok(handle)
    }
}
