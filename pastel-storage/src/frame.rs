//! Payload framing: compression, hash gating, and chunk layout.
//!
//! The frame is the exact byte sequence spread across carrier outputs:
//!
//! ```text
//! uncompressed length (2B BE) ‖ sha3(payload) ‖ sha3(compressed) ‖ compressed
//! ```
//!
//! Chunks are frame slices prefixed with a 2-byte big-endian index so that
//! retrieval can reassemble them in any arrival order.

use std::io::{self, Write};

use sha3::{Digest, Sha3_256};
use thiserror::Error;

use crate::Error;

/// The largest frame slice embedded in a single carrier transaction.
pub const MAX_CHUNK: usize = 3000;

/// The largest storable payload: the frame's length field is two bytes.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Bytes of frame header before the compressed body: the length field plus
/// two 32-byte digests.
pub(crate) const FRAME_HEADER: usize = 2 + 32 + 32;

const COMPRESSION_LEVEL: i32 = 22;

/// SHA3-256 of `data`. Never SHA-256: the embedded digests and every
/// on-chain consumer use the Keccak family.
pub(crate) fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Compress `data` with the frame flags retrieval relies on: the content
/// size and checksum are both written into the zstd frame.
pub(crate) fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = zstd::stream::Encoder::new(Vec::new(), COMPRESSION_LEVEL)?;
    encoder.include_contentsize(true)?;
    encoder.include_checksum(true)?;
    encoder.set_pledged_src_size(Some(data.len() as u64))?;
    encoder.write_all(data)?;
    encoder.finish()
}

/// Decompress one zstd frame.
pub(crate) fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    zstd::stream::decode_all(data)
}

/// Why a frame failed verification.
#[derive(Error, Debug)]
pub(crate) enum FrameError {
    #[error("frame of {0} bytes is shorter than its header")]
    TooShort(usize),
    #[error("compressed data hash verification failed")]
    CompressedHashMismatch,
    #[error("uncompressed data hash verification failed")]
    PayloadHashMismatch,
    #[error("decompression failed: {0}")]
    Decompress(#[from] io::Error),
}

/// Frame `payload` for storage.
pub(crate) fn build(payload: &[u8]) -> Result<Vec<u8>, Error> {
    if payload.len() > MAX_PAYLOAD {
        return Err(Error::PayloadTooLarge(payload.len()));
    }
    let compressed = compress(payload)?;
    let mut frame = Vec::with_capacity(FRAME_HEADER + compressed.len());
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(&sha3_256(payload));
    frame.extend_from_slice(&sha3_256(&compressed));
    frame.extend_from_slice(&compressed);
    Ok(frame)
}

/// Verify and unpack a frame, returning the original payload.
///
/// Both embedded digests must match; the declared length is informational
/// and not enforced.
pub(crate) fn parse(frame: &[u8]) -> Result<Vec<u8>, FrameError> {
    if frame.len() < FRAME_HEADER {
        return Err(FrameError::TooShort(frame.len()));
    }
    let payload_hash = &frame[2..34];
    let compressed_hash = &frame[34..66];
    let compressed = &frame[66..];

    if sha3_256(compressed) != compressed_hash[..] {
        return Err(FrameError::CompressedHashMismatch);
    }
    let payload = decompress(compressed)?;
    if sha3_256(&payload) != payload_hash[..] {
        return Err(FrameError::PayloadHashMismatch);
    }
    Ok(payload)
}

/// Split a frame into near-equal slices no larger than [`MAX_CHUNK`].
///
/// The slice count is fixed first, then the frame is divided evenly across
/// it, so the last slice is at most one byte shorter than the rest.
pub(crate) fn split(frame: &[u8]) -> Vec<&[u8]> {
    let num_chunks = frame.len().div_ceil(MAX_CHUNK).max(1);
    let chunk_size = frame.len().div_ceil(num_chunks).max(1);
    frame.chunks(chunk_size).collect()
}

/// A chunk body: the 0-based chunk index in 2-byte big-endian form, then
/// the frame slice.
pub(crate) fn chunk_body(index: u16, slice: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(2 + slice.len());
    body.extend_from_slice(&index.to_be_bytes());
    body.extend_from_slice(slice);
    body
}
