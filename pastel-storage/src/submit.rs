//! Assembly, signing, and broadcast of one carrier transaction.

use rand::RngCore;
use tracing::{error, info};

use pastel_chain::{
    transaction::{self, Transaction},
    transparent::{script, Input, OutPoint, Output},
    Amount,
};
use pastel_rpc::WalletRpc;

use crate::select::select_unspent;
use crate::{frame, Error, TicketStorage};

/// Bytes added on top of the body when estimating the fee that input
/// selection must cover: signed inputs and the change output are not part of
/// the body, and the recomputed fee must never exceed the selected total.
const SIZE_ALLOWANCE: usize = 2048;

impl<R: WalletRpc> TicketStorage<R> {
    /// Build, sign, and broadcast one transaction whose data output carries
    /// `body`. Returns the new transaction id, or `None` when the wallet
    /// cannot fund or sign it.
    pub(crate) async fn submit_carrier(
        &self,
        body: &[u8],
    ) -> Result<Option<transaction::Hash>, Error> {
        let _task = self
            .storage_gate
            .acquire()
            .await
            .expect("storage gate is never closed");

        let mut filler = [0u8; script::CARRIER_FILLER_LEN];
        rand::thread_rng().fill_bytes(&mut filler);
        let carrier = script::data_carrier(&filler, body);

        let target = Amount::fee_for_size(body.len() + SIZE_ALLOWANCE);
        let Some(selection) = select_unspent(&self.rpc, target, &self.config).await? else {
            error!(body_len = body.len(), "insufficient funds to store the data");
            return Ok(None);
        };

        // The change script commits to the SHA3-256 of the address string.
        // That is not a HASH160, so the wallet cannot redeem it; the chain's
        // existing records use this exact form and it is preserved here.
        let change_address = self.rpc.get_new_address().await?;
        let change_script = script::p2pkh(&frame::sha3_256(change_address.as_bytes()));

        let inputs = selection
            .inputs
            .iter()
            .map(|utxo| {
                Input::new(OutPoint {
                    hash: utxo.txid,
                    index: utxo.vout,
                })
            })
            .collect();
        let outputs = vec![
            Output {
                value: Amount::ZERO,
                lock_script: carrier,
            },
            // change is last, and starts at the full selected total; the
            // real fee comes out of it after the first signing pass
            Output {
                value: selection.total,
                lock_script: change_script,
            },
        ];
        let mut tx = Transaction::new(inputs, outputs);

        let signed = self.rpc.sign_raw_transaction(&tx.to_hex()?).await?;
        if !signed.errors.is_empty() {
            error!(errors = ?signed.errors, "error occurred while signing transaction");
            return Ok(None);
        }
        if !signed.complete {
            error!("failed to sign all transaction inputs");
            return Ok(None);
        }

        let fee = Amount::fee_for_size(signed.hex.len() / 2);
        let change = selection
            .total
            .checked_sub(fee)
            .ok_or(Error::AmountRange)?;
        if change < Amount::ZERO {
            error!(%fee, total = %selection.total, "fee exceeds the selected inputs");
            return Ok(None);
        }
        let change_index = tx.outputs.len() - 1;
        tx.outputs[change_index].value = change;

        let resigned = self.rpc.sign_raw_transaction(&tx.to_hex()?).await?;
        if !resigned.complete {
            error!("second signing pass did not complete");
            return Ok(None);
        }

        let broadcast = {
            let _gate = self
                .broadcast_gate
                .acquire()
                .await
                .expect("broadcast gate is never closed");
            self.rpc.send_raw_transaction(&resigned.hex).await
        };
        match broadcast {
            Ok(txid) => {
                info!(%txid, %fee, "carrier transaction accepted");
                Ok(Some(txid))
            }
            // -25: missing inputs, -26: insufficient funds/fee; both mean
            // "not this attempt", not a broken conversation
            Err(err) if matches!(err.rpc_code(), Some(-25) | Some(-26)) => {
                error!(%err, "node rejected the broadcast");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
