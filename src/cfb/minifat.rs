//! Ministream packing and MiniFAT serialization
//!
//! Streams under the 4096-byte cutoff are appended to a single growing
//! buffer, each one padded out to whole 64-byte mini sectors. Because
//! appends never interleave, a stream's mini chain is just a run of
//! consecutive mini sectors; the builder remembers only how many mini
//! sectors each append occupied and derives the MiniFAT from those
//! extent lengths at serialization time. The buffer itself becomes the
//! ministream, an ordinary FAT-chained stream anchored at the root
//! directory entry.

use super::consts::*;

/// Ministream builder and MiniFAT serializer
#[derive(Debug, Default)]
pub struct MiniStreamBuilder {
    /// Concatenated small-stream data, mini-sector padded
    data: Vec<u8>,
    /// Mini sectors occupied by each appended stream, in append order
    extents: Vec<u32>,
}

impl MiniStreamBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a small stream to the ministream
    ///
    /// Returns the stream's first mini sector, or `ENDOFCHAIN` when the
    /// stream is empty.
    pub fn append(&mut self, stream: &[u8]) -> u32 {
        if stream.is_empty() {
            return ENDOFCHAIN;
        }

        let first = self.mini_sector_count();
        self.data.extend_from_slice(stream);
        // Pad the tail so the next stream starts on its own mini sector
        let tail = self.data.len() % MINI_SECTOR_SIZE;
        if tail != 0 {
            self.data.resize(self.data.len() + MINI_SECTOR_SIZE - tail, 0);
        }
        self.extents.push(self.mini_sector_count() - first);
        first
    }

    /// The ministream contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Ministream length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether anything has been appended
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mini sectors used so far
    pub fn mini_sector_count(&self) -> u32 {
        (self.data.len() / MINI_SECTOR_SIZE) as u32
    }

    /// Serialize the MiniFAT: one little-endian u32 per mini sector,
    /// padded with `FREESECT` to whole 512-byte sectors
    ///
    /// Empty when nothing has been appended.
    pub fn minifat_bytes(&self) -> Vec<u8> {
        if self.data.is_empty() {
            return Vec::new();
        }

        let mut bytes = Vec::new();
        let mut sector = 0u32;
        for &extent in &self.extents {
            for _ in 1..extent {
                sector += 1;
                bytes.extend_from_slice(&sector.to_le_bytes());
            }
            bytes.extend_from_slice(&ENDOFCHAIN.to_le_bytes());
            sector += 1;
        }

        let table_len = bytes.len().div_ceil(SECTOR_SIZE) * SECTOR_SIZE;
        bytes.resize(table_len, 0xFF);
        bytes
    }
}
