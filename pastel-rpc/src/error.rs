use thiserror::Error;

/// An RPC client error.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP request could not be sent or its response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a non-null `error` object, or with no `result`
    /// (surfaced as code −343).
    #[error("node error {code}: {message}")]
    Rpc {
        /// The node's numeric error code.
        code: i64,
        /// The node's error message.
        message: String,
    },

    /// The pre-call health probe returned a non-200 status.
    #[error("health probe returned status {0}")]
    Unhealthy(u16),

    /// Every attempt failed; `last` is the final attempt's error.
    #[error("{attempts} attempts failed, last: {last}")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: usize,
        /// The rendered error of the last attempt.
        last: String,
    },

    /// A result arrived but did not have the shape the binding expected.
    #[error("unexpected response shape: {0}")]
    BadResponse(#[from] serde_json::Error),

    /// The node returned a value the binding could not interpret, e.g. a
    /// malformed txid string.
    #[error("invalid value in response: {0}")]
    BadValue(&'static str),

    /// Reading the node configuration failed.
    #[error("config error: {0}")]
    Config(String),

    /// An io error while reading the node configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The node error code, when this is a node-reported error.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Error::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}
