//! An in-process node wallet backed by an in-memory chain.
//!
//! The mock really parses submitted transactions: broadcasts consume the
//! referenced outputs (unknown inputs are rejected with the node's −25), and
//! retrieval decodes whatever raw bytes were stored, so the store/retrieve
//! paths are exercised end to end without a node.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha3::{Digest, Sha3_256};

use pastel_chain::{
    transaction::{self, Transaction},
    transparent::{script, Script},
    Amount,
};
use pastel_rpc::{
    types::{AddressInfo, DecodedTransaction, DecodedVout, ScriptPubKey, SignedTransaction, Unspent},
    Error, WalletRpc,
};

/// The dummy scriptSig the mock signer installs per input, sized like a real
/// p2pkh unlock so that fee-from-signed-size is realistic.
const FAKE_SIG_LEN: usize = 107;

#[derive(Default)]
struct State {
    unspent: Vec<Unspent>,
    txs: HashMap<String, String>,
    broadcast_order: Vec<transaction::Hash>,
    address_counter: u64,
    fail_broadcast: Option<i64>,
}

pub struct MockNode {
    state: Mutex<State>,
}

impl MockNode {
    /// A wallet holding `outputs` spendable outputs of `each_psl` PSL.
    pub fn with_balance(outputs: usize, each_psl: f64) -> MockNode {
        let unspent = (0..outputs)
            .map(|i| Unspent {
                txid: transaction::Hash([(i + 1) as u8; 32]),
                vout: 0,
                address: format!("PtSeed{}", i),
                amount: Amount::from_psl(each_psl),
                confirmations: (i + 1) as i64,
                spendable: true,
                generated: false,
            })
            .collect();
        MockNode {
            state: Mutex::new(State {
                unspent,
                ..State::default()
            }),
        }
    }

    /// Replace the seeded outputs wholesale.
    pub fn set_unspent(&self, unspent: Vec<Unspent>) {
        self.state.lock().expect("mock lock").unspent = unspent;
    }

    /// Make every subsequent broadcast fail with the given node code.
    pub fn fail_broadcast_with(&self, code: i64) {
        self.state.lock().expect("mock lock").fail_broadcast = Some(code);
    }

    /// How many transactions have been accepted.
    pub fn tx_count(&self) -> usize {
        self.state.lock().expect("mock lock").txs.len()
    }

    /// Accepted transaction ids, in broadcast order.
    pub fn broadcast_order(&self) -> Vec<transaction::Hash> {
        self.state.lock().expect("mock lock").broadcast_order.clone()
    }

    /// The carrier body of an accepted transaction.
    pub fn carrier_body(&self, txid: &transaction::Hash) -> Option<Vec<u8>> {
        let state = self.state.lock().expect("mock lock");
        let hex_form = state.txs.get(&txid.to_string())?;
        let tx = Transaction::from_hex(hex_form).expect("stored transactions parse");
        tx.outputs
            .iter()
            .find_map(|output| script::parse_data_carrier(&output.lock_script))
            .map(<[u8]>::to_vec)
    }

    /// Flip one byte inside the carrier body of an accepted transaction,
    /// simulating on-chain mutation.
    pub fn corrupt_carrier(&self, txid: &transaction::Hash) {
        let mut state = self.state.lock().expect("mock lock");
        let key = txid.to_string();
        let hex_form = state.txs.get(&key).expect("transaction to corrupt exists");
        let mut tx = Transaction::from_hex(hex_form).expect("stored transactions parse");
        let output = tx
            .outputs
            .iter_mut()
            .find(|output| script::parse_data_carrier(&output.lock_script).is_some())
            .expect("transaction has a carrier output");
        let last = output.lock_script.0.len() - 1;
        output.lock_script.0[last] ^= 0x01;
        let corrupted = tx.to_hex().expect("corrupted transaction serializes");
        state.txs.insert(key, corrupted);
    }
}

#[async_trait]
impl WalletRpc for MockNode {
    async fn list_unspent(&self) -> Result<Vec<Unspent>, Error> {
        Ok(self.state.lock().expect("mock lock").unspent.clone())
    }

    async fn validate_address(&self, address: &str) -> Result<AddressInfo, Error> {
        Ok(AddressInfo {
            ismine: address.starts_with("Pt"),
        })
    }

    async fn get_new_address(&self) -> Result<String, Error> {
        let mut state = self.state.lock().expect("mock lock");
        state.address_counter += 1;
        Ok(format!("PtChange{}", state.address_counter))
    }

    async fn unlock_all_unspent(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, Error> {
        let mut tx = Transaction::from_hex(hex).map_err(|_| Error::Rpc {
            code: -22,
            message: "TX decode failed".into(),
        })?;
        for input in &mut tx.inputs {
            input.unlock_script = Script(vec![0x00; FAKE_SIG_LEN]);
        }
        Ok(SignedTransaction {
            hex: tx.to_hex().expect("signed transaction serializes"),
            complete: true,
            errors: Vec::new(),
        })
    }

    async fn send_raw_transaction(&self, hex: &str) -> Result<transaction::Hash, Error> {
        let mut state = self.state.lock().expect("mock lock");
        if let Some(code) = state.fail_broadcast {
            return Err(Error::Rpc {
                code,
                message: "injected broadcast failure".into(),
            });
        }
        let tx = Transaction::from_hex(hex).map_err(|_| Error::Rpc {
            code: -22,
            message: "TX decode failed".into(),
        })?;

        // consume the spent outputs; unknown references are the node's -25
        for input in &tx.inputs {
            let position = state.unspent.iter().position(|utxo| {
                utxo.txid == input.outpoint.hash && utxo.vout == input.outpoint.index
            });
            match position {
                Some(position) => {
                    state.unspent.remove(position);
                }
                None => {
                    return Err(Error::Rpc {
                        code: -25,
                        message: "Missing inputs".into(),
                    })
                }
            }
        }

        let raw = hex::decode(hex).expect("hex round-trips");
        let txid = transaction::Hash(Sha3_256::digest(&raw).into());
        state.txs.insert(txid.to_string(), hex.to_string());
        state.broadcast_order.push(txid);
        Ok(txid)
    }

    async fn get_raw_transaction(&self, txid: &transaction::Hash) -> Result<String, Error> {
        self.state
            .lock()
            .expect("mock lock")
            .txs
            .get(&txid.to_string())
            .cloned()
            .ok_or_else(|| Error::Rpc {
                code: -5,
                message: "No information available about transaction".into(),
            })
    }

    async fn decode_raw_transaction(&self, hex: &str) -> Result<DecodedTransaction, Error> {
        let tx = Transaction::from_hex(hex).map_err(|_| Error::Rpc {
            code: -22,
            message: "TX decode failed".into(),
        })?;
        Ok(DecodedTransaction {
            vout: tx
                .outputs
                .iter()
                .map(|output| DecodedVout {
                    script_pub_key: ScriptPubKey {
                        hex: hex::encode(&output.lock_script.0),
                    },
                })
                .collect(),
        })
    }
}
