use thiserror::Error;

use pastel_chain::SerializationError;

/// A storage engine error.
///
/// Conditions the caller can reasonably expect during normal operation
/// (insufficient funds, incomplete signing, hash mismatches on retrieval)
/// are not errors: the operations return `Ok(None)` for those and log the
/// cause. This type covers faults that should propagate.
#[derive(Error, Debug)]
pub enum Error {
    /// The payload cannot be framed: its length does not fit the 2-byte
    /// length field.
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// The node conversation failed.
    #[error(transparent)]
    Rpc(#[from] pastel_rpc::Error),

    /// A transaction could not be serialized or parsed.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Compression or serialization io failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wallet amounts summed outside the representable range.
    #[error("amount arithmetic overflowed")]
    AmountRange,
}
