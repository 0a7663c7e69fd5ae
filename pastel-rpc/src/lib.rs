//! Asynchronous JSON-RPC 1.1 client for a Pastel node's wallet interface.
//!
//! The [`Client`] owns the transport concerns: Basic authentication, request
//! ids, a bound on in-flight calls, retries with full-jitter backoff, and a
//! circuit breaker with an adaptive cooldown. The [`WalletRpc`] trait fronts
//! the node methods this workspace consumes so that callers can be tested
//! against an in-process implementation.

mod breaker;
mod client;
pub mod config;
mod error;
pub mod types;
mod wallet;

pub use client::{Builder, Client};
pub use config::Config;
pub use error::Error;
pub use wallet::WalletRpc;
