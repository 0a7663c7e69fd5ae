//! Response shapes for the wallet methods this workspace consumes.
//!
//! Only the fields the callers rely on are modeled; everything else in the
//! node's responses is ignored.

use serde::Deserialize;
use serde_json::Value;

use pastel_chain::{transaction, Amount};

/// One entry from `listunspent`.
#[derive(Debug, Clone, Deserialize)]
pub struct Unspent {
    /// The transaction containing this output.
    pub txid: transaction::Hash,
    /// The output index within that transaction.
    pub vout: u32,
    /// The address holding the output.
    pub address: String,
    /// The output value.
    pub amount: Amount,
    /// Depth in the chain; 0 for unconfirmed.
    pub confirmations: i64,
    /// Whether the wallet can sign a spend of this output.
    pub spendable: bool,
    /// Whether this output is a coinbase reward.
    #[serde(default)]
    pub generated: bool,
}

/// The slice of `validateaddress` the selector relies on.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInfo {
    /// Whether the wallet holds the private key for the address.
    #[serde(default)]
    pub ismine: bool,
}

/// The result of `signrawtransaction`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedTransaction {
    /// The transaction with signatures filled in, as hex.
    pub hex: String,
    /// Whether every input was signed.
    pub complete: bool,
    /// Per-input signing errors, when any occurred.
    #[serde(default)]
    pub errors: Vec<Value>,
}

/// The slice of `decoderawtransaction` the retriever relies on.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodedTransaction {
    /// The decoded outputs, in order.
    pub vout: Vec<DecodedVout>,
}

/// One decoded output.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodedVout {
    /// The output's script.
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

/// The script of a decoded output.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPubKey {
    /// The raw script bytes as hex.
    pub hex: String,
}
