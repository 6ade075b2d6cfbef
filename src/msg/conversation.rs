//! Conversation-index synthesis for email threading (MS-OXOMSG 2.2.1.3)
//!
//! A conversation index is a 22-byte header block followed by one 5-byte
//! response block per reply. The header carries the top 40 bits of the
//! originating FILETIME and a random GUID; each response block encodes
//! the time elapsed since the header plus one random byte.
//!
//! Some writers fill the response block entirely with random bytes, and
//! most readers tolerate that, but strict validators do not. This module
//! always encodes the real time delta.

use crate::msg::error::MsgError;
use crate::msg::property::filetime_ticks;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Length of the conversation-index header block
pub const HEADER_LEN: usize = 22;

/// Length of one response block
pub const RESPONSE_BLOCK_LEN: usize = 5;

/// Synthesize a new conversation index for the root of a thread
///
/// The GUID is random; use [`new_index_with_guid`] when reproducible
/// output is required.
pub fn new_index(now: DateTime<Utc>) -> Vec<u8> {
    let mut guid = [0u8; 16];
    rand::rng().fill(&mut guid[..]);
    new_index_with_guid(now, guid)
}

/// Synthesize a new conversation index with a caller-supplied GUID
pub fn new_index_with_guid(now: DateTime<Utc>, guid: [u8; 16]) -> Vec<u8> {
    let mut index = Vec::with_capacity(HEADER_LEN);
    index.push(0x01);
    index.extend_from_slice(&header_time_bytes(filetime_ticks(now)));
    index.extend_from_slice(&guid);
    index
}

/// Extend a parent conversation index with a response block for a reply
///
/// The trailing random byte is drawn from the thread RNG; use
/// [`reply_index_with_random`] for reproducible output.
pub fn reply_index(parent: &[u8], now: DateTime<Utc>) -> Result<Vec<u8>, MsgError> {
    reply_index_with_random(parent, now, rand::rng().random())
}

/// Extend a parent conversation index with a response block, using a
/// caller-supplied random byte
///
/// Fails with [`MsgError::InvalidInput`] when the parent is not a
/// 22-byte header followed by whole 5-byte response blocks.
pub fn reply_index_with_random(
    parent: &[u8],
    now: DateTime<Utc>,
    random: u8,
) -> Result<Vec<u8>, MsgError> {
    if parent.len() < HEADER_LEN || (parent.len() - HEADER_LEN) % RESPONSE_BLOCK_LEN != 0 {
        return Err(MsgError::InvalidInput(format!(
            "malformed conversation index of {} bytes",
            parent.len()
        )));
    }

    // Reconstruct the header instant from its top-40-bit form
    let mut time_bytes = [0u8; 8];
    time_bytes[3..8].copy_from_slice(&parent[1..6]);
    let header_ticks = u64::from_be_bytes(time_bytes);

    let diff = filetime_ticks(now).saturating_sub(header_ticks);

    // 1-bit delta code, 31-bit shifted delta, big-endian. Code 0 shifts
    // by 18 bits; when the difference no longer fits, code 1 shifts by 23.
    let block: u32 = if diff & 0xFFFE_0000_0000_0000 == 0 {
        ((diff >> 18) as u32) & 0x7FFF_FFFF
    } else {
        (((diff >> 23) as u32) & 0x7FFF_FFFF) | 0x8000_0000
    };

    let mut index = Vec::with_capacity(parent.len() + RESPONSE_BLOCK_LEN);
    index.extend_from_slice(parent);
    index.extend_from_slice(&block.to_be_bytes());
    index.push(random);
    Ok(index)
}

/// The top 40 bits of a FILETIME, big-endian, as stored in the header block
fn header_time_bytes(ticks: u64) -> [u8; 5] {
    let shifted = (ticks >> 24).to_be_bytes();
    [shifted[3], shifted[4], shifted[5], shifted[6], shifted[7]]
}
