//! Storing arbitrary payloads inside Pastel transactions.
//!
//! A payload is compressed, framed with its own hashes, chopped into chunks,
//! and each chunk embedded in the output script of a fresh transaction as a
//! zero-value pseudo-multisig carrier. An index transaction records the
//! chunk transaction ids; its id is the only handle a caller must keep.
//! Retrieval walks the index back to the chunks, reassembles the frame, and
//! refuses to return anything whose embedded hashes do not match.

use tokio::sync::Semaphore;

use pastel_rpc::WalletRpc;

mod error;
mod frame;
mod retrieve;
mod select;
mod store;
mod submit;

pub use error::Error;
pub use frame::{MAX_CHUNK, MAX_PAYLOAD};

/// Tunables for a [`TicketStorage`].
#[derive(Debug, Clone)]
pub struct Config {
    /// How many chunk submissions may be in flight at once.
    pub max_storage_tasks: usize,
    /// How many chunk retrievals may be in flight at once.
    pub max_retrieval_tasks: usize,
    /// How many broadcasts may be in flight at once.
    pub max_broadcasts: usize,
    /// Outputs held by this address are never spent.
    pub burn_address: String,
    /// How many eligible outputs the selector inspects before stopping;
    /// bounds the `validateaddress` cost of a selection pass.
    pub review_limit: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_storage_tasks: 20,
            max_retrieval_tasks: 20,
            max_broadcasts: 5,
            burn_address: "44oUgmZSL997veFEQDq569wv5tsT6KXf9QY7".to_string(),
            review_limit: 100,
        }
    }
}

/// The storage engine: a node wallet connection plus the concurrency gates
/// that bound work against it.
pub struct TicketStorage<R> {
    rpc: R,
    config: Config,
    storage_gate: Semaphore,
    retrieval_gate: Semaphore,
    broadcast_gate: Semaphore,
}

impl<R: WalletRpc> TicketStorage<R> {
    /// An engine over `rpc` with default tunables.
    pub fn new(rpc: R) -> TicketStorage<R> {
        TicketStorage::with_config(rpc, Config::default())
    }

    /// An engine over `rpc` with explicit tunables.
    pub fn with_config(rpc: R, config: Config) -> TicketStorage<R> {
        let storage_gate = Semaphore::new(config.max_storage_tasks);
        let retrieval_gate = Semaphore::new(config.max_retrieval_tasks);
        let broadcast_gate = Semaphore::new(config.max_broadcasts);
        TicketStorage {
            rpc,
            config,
            storage_gate,
            retrieval_gate,
            broadcast_gate,
        }
    }

    /// The wallet connection, for callers that need other node methods.
    pub fn rpc(&self) -> &R {
        &self.rpc
    }
}
