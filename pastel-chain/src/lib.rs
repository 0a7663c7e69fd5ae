//! Core data structures and byte-exact serialization for Pastel transparent
//! transactions.
//!
//! Everything that ends up on the wire goes through the [`PastelSerialize`]
//! and [`PastelDeserialize`] traits so that the byte layout lives in one
//! place. A single misplaced length prefix or byte-order mixup makes a
//! transaction unrelayable, so these impls are covered by round-trip tests.

mod amount;
mod compactint;
mod serialization;

pub mod transaction;
pub mod transparent;

pub use amount::{Amount, COIN, FEE_PER_KB};
pub use compactint::CompactInt;
pub use serialization::{
    PastelDeserialize, PastelDeserializeInto, PastelSerialize, SerializationError,
};
