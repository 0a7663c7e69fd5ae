//! Typed bindings for the wallet methods this workspace consumes.

use async_trait::async_trait;
use serde_json::json;

use pastel_chain::transaction;

use crate::types::{AddressInfo, DecodedTransaction, SignedTransaction, Unspent};
use crate::{Client, Error};

/// The node wallet surface used by the storage engine.
///
/// One method per consumed RPC, so that callers can run against an
/// in-process implementation in tests. [`Client`] implements this over
/// [`Client::call`]; `call` itself stays available for methods without a
/// binding.
#[async_trait]
pub trait WalletRpc: Send + Sync {
    /// The wallet's unspent outputs.
    async fn list_unspent(&self) -> Result<Vec<Unspent>, Error>;

    /// Address ownership information.
    async fn validate_address(&self, address: &str) -> Result<AddressInfo, Error>;

    /// A fresh receiving address from the wallet.
    async fn get_new_address(&self) -> Result<String, Error>;

    /// Release every output lock held by previous operations.
    async fn unlock_all_unspent(&self) -> Result<(), Error>;

    /// Ask the wallet to sign a raw transaction.
    async fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, Error>;

    /// Broadcast a signed raw transaction, returning its id.
    async fn send_raw_transaction(&self, hex: &str) -> Result<transaction::Hash, Error>;

    /// The raw hex of a transaction known to the node.
    async fn get_raw_transaction(&self, txid: &transaction::Hash) -> Result<String, Error>;

    /// Decode a raw transaction into its JSON form.
    async fn decode_raw_transaction(&self, hex: &str) -> Result<DecodedTransaction, Error>;
}

#[async_trait]
impl WalletRpc for Client {
    async fn list_unspent(&self) -> Result<Vec<Unspent>, Error> {
        self.call_as("listunspent", vec![]).await
    }

    async fn validate_address(&self, address: &str) -> Result<AddressInfo, Error> {
        self.call_as("validateaddress", vec![json!(address)]).await
    }

    async fn get_new_address(&self) -> Result<String, Error> {
        self.call_as("getnewaddress", vec![]).await
    }

    async fn unlock_all_unspent(&self) -> Result<(), Error> {
        // unlock=true with an empty outpoint list releases everything
        let unlocked: bool = self
            .call_as("lockunspent", vec![json!(true), json!([])])
            .await?;
        if !unlocked {
            return Err(Error::BadValue("lockunspent refused to unlock"));
        }
        Ok(())
    }

    async fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, Error> {
        self.call_as("signrawtransaction", vec![json!(hex)]).await
    }

    async fn send_raw_transaction(&self, hex: &str) -> Result<transaction::Hash, Error> {
        let txid: String = self
            .call_as("sendrawtransaction", vec![json!(hex)])
            .await?;
        txid.parse()
            .map_err(|_| Error::BadValue("sendrawtransaction returned a malformed txid"))
    }

    async fn get_raw_transaction(&self, txid: &transaction::Hash) -> Result<String, Error> {
        self.call_as("getrawtransaction", vec![json!(txid.to_string())])
            .await
    }

    async fn decode_raw_transaction(&self, hex: &str) -> Result<DecodedTransaction, Error> {
        self.call_as("decoderawtransaction", vec![json!(hex)]).await
    }
}
