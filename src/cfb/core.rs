//! Core CFB writer implementation
//!
//! Streams and storages are accumulated in memory and serialized in one
//! pass when `write_to` is called. Nothing reaches the sink until the
//! whole file has been laid out, so a failed write never leaves a
//! half-valid compound file behind.
//!
//! # Sector Layout
//!
//! Sector ids are assigned in the order the sectors are written:
//!
//! 1. DIFAT sectors (only when more than 109 FAT sectors are needed)
//! 2. FAT sectors
//! 3. MiniFAT sectors
//! 4. Directory sectors
//! 5. Ministream sectors (small-stream data)
//! 6. Large-stream data, in stream insertion order
//!
//! Because the layout is fixed, the file is written strictly sequentially
//! and identical input always produces identical bytes.
//!
//! # Example
//!
//! ```rust
//! use longan::cfb::CfbWriter;
//!
//! let mut writer = CfbWriter::new();
//! writer.create_stream(&["MyStream"], b"Hello, World!")?;
//!
//! writer.create_storage(&["MyStorage"])?;
//! writer.create_stream(&["MyStorage", "Nested"], b"Nested content")?;
//!
//! let mut buffer = Vec::new();
//! writer.write_to(&mut buffer)?;
//! # Ok::<(), longan::cfb::CfbError>(())
//! ```

use super::consts::*;
use super::difat;
use super::directory::DirectoryBuilder;
use super::fat::{SectorAllocator, FAT_ENTRIES_PER_SECTOR};
use super::header::HeaderBuilder;
use super::minifat::MiniStreamBuilder;
use std::collections::HashSet;
use std::io::{self, Write};

/// Error type for CFB writing
#[derive(Debug)]
pub enum CfbError {
    /// The underlying sink rejected a write
    Io(io::Error),
    /// A stream or storage name is not representable in a directory entry
    InvalidName(String),
    /// The file would exceed the 2 GiB version 3 addressing limit
    CapacityExceeded,
}

impl From<io::Error> for CfbError {
    fn from(err: io::Error) -> Self {
        CfbError::Io(err)
    }
}

impl std::fmt::Display for CfbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CfbError::Io(e) => write!(f, "I/O error: {}", e),
            CfbError::InvalidName(s) => write!(f, "Invalid entry name: {}", s),
            CfbError::CapacityExceeded => {
                write!(f, "File exceeds the 2 GiB compound file limit")
            },
        }
    }
}

impl std::error::Error for CfbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CfbError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Compound file writer
///
/// Accumulates a logical tree of storages and streams, then serializes it
/// as an MS-CFB version 3 file.
pub struct CfbWriter {
    /// Stream data in insertion order (path, data)
    streams: Vec<(Vec<String>, Vec<u8>)>,
    /// Storage paths in declaration order
    storages: Vec<Vec<String>>,
}

impl CfbWriter {
    /// Create a new empty writer
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
            storages: Vec::new(),
        }
    }

    /// Create a stream at the given path
    ///
    /// Parent storages are created implicitly. If a stream already exists
    /// at this path it is overwritten.
    pub fn create_stream(&mut self, path: &[&str], data: &[u8]) -> Result<(), CfbError> {
        let owned = Self::validate_path(path)?;

        if let Some(pos) = self.streams.iter().position(|(p, _)| p == &owned) {
            self.streams[pos].1 = data.to_vec();
        } else {
            self.streams.push((owned, data.to_vec()));
        }

        Ok(())
    }

    /// Declare a storage at the given path
    ///
    /// Declaring an existing storage is a no-op, so callers can declare
    /// freely before populating.
    pub fn create_storage(&mut self, path: &[&str]) -> Result<(), CfbError> {
        let owned = Self::validate_path(path)?;

        if !self.storages.contains(&owned) {
            self.storages.push(owned);
        }

        Ok(())
    }

    /// Validate a path and convert it to owned components
    fn validate_path(path: &[&str]) -> Result<Vec<String>, CfbError> {
        if path.is_empty() {
            return Err(CfbError::InvalidName("empty path".to_string()));
        }

        for component in path {
            if component.is_empty() {
                return Err(CfbError::InvalidName("empty name component".to_string()));
            }
            if component.encode_utf16().count() > 31 {
                return Err(CfbError::InvalidName(format!(
                    "name longer than 31 UTF-16 units: {}",
                    component
                )));
            }
            if component.contains(['/', '\\', ':', '!']) {
                return Err(CfbError::InvalidName(format!(
                    "name contains a reserved character: {}",
                    component
                )));
            }
        }

        Ok(path.iter().map(|s| s.to_string()).collect())
    }

    /// Number of directory entries the current tree needs (including the
    /// root and storages created implicitly by stream paths)
    fn count_directory_entries(&self) -> usize {
        let mut storage_paths: HashSet<Vec<String>> = HashSet::new();
        for path in &self.storages {
            for i in 1..=path.len() {
                storage_paths.insert(path[..i].to_vec());
            }
        }
        for (path, _) in &self.streams {
            for i in 1..path.len() {
                storage_paths.insert(path[..i].to_vec());
            }
        }
        1 + storage_paths.len() + self.streams.len()
    }

    /// Serialize the compound file to a sink
    ///
    /// The complete file is laid out in memory first; the sink only sees
    /// whole sectors.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), CfbError> {
        // Pack small streams into the ministream, in insertion order.
        // Large streams keep their data; each records its place in line.
        let mut mini = MiniStreamBuilder::new();
        enum Placement {
            Mini(u32),
            Large(usize),
        }
        let mut placements: Vec<Placement> = Vec::with_capacity(self.streams.len());
        let mut large_sizes: Vec<usize> = Vec::new();

        for (_, data) in &self.streams {
            if data.len() < MINI_STREAM_CUTOFF {
                placements.push(Placement::Mini(mini.append(data)));
            } else {
                placements.push(Placement::Large(large_sizes.len()));
                large_sizes.push(data.len());
            }
        }

        // Sector counts for everything except the FAT itself
        let minifat_table = mini.minifat_bytes();
        let num_minifat_sectors = (minifat_table.len() / SECTOR_SIZE) as u32;
        let num_ministream_sectors = mini.len().div_ceil(SECTOR_SIZE) as u32;
        let dir_len = self.count_directory_entries() * DIRENTRY_SIZE;
        let num_dir_sectors = dir_len.div_ceil(SECTOR_SIZE) as u32;
        let num_large_sectors: u32 = large_sizes
            .iter()
            .map(|len| len.div_ceil(SECTOR_SIZE) as u32)
            .sum();

        let num_other = num_minifat_sectors + num_dir_sectors + num_ministream_sectors
            + num_large_sectors;

        // The FAT describes every sector including itself and the DIFAT,
        // so start from the payload requirement and grow the FAT until
        // its table covers the whole file
        let entries_per_fat = FAT_ENTRIES_PER_SECTOR as u32;
        let mut num_fat = num_other.div_ceil(entries_per_fat);
        let mut num_difat = difat::difat_sector_count(num_fat);
        while num_other + num_fat + num_difat > num_fat * entries_per_fat {
            num_fat += 1;
            num_difat = difat::difat_sector_count(num_fat);
        }

        let total_sectors = (num_other + num_fat + num_difat) as u64;
        if (total_sectors + 1) * SECTOR_SIZE as u64 > MAX_FILE_SIZE {
            return Err(CfbError::CapacityExceeded);
        }

        // Reserve sector ids in write order
        let mut alloc = SectorAllocator::new();
        let difat_start = alloc.reserve_marked(num_difat, DIFSECT);
        let fat_start = alloc.reserve_marked(num_fat, FATSECT);
        let minifat_start = alloc.reserve_chain(minifat_table.len());
        let dir_start = alloc.reserve_chain(dir_len);
        let ministream_start = alloc.reserve_chain(mini.len());

        let mut large_starts: Vec<u32> = Vec::with_capacity(large_sizes.len());
        for &len in &large_sizes {
            large_starts.push(alloc.reserve_chain(len));
        }

        debug_assert_eq!(alloc.sector_count() as u64, total_sectors);

        // Build the directory: declared storages first, then streams in
        // insertion order (parents created on demand)
        let mut directory = DirectoryBuilder::new(ministream_start, mini.len() as u64);
        for storage_path in &self.storages {
            directory.add_storage_path(storage_path);
        }
        for ((path, data), placement) in self.streams.iter().zip(&placements) {
            let start = match placement {
                Placement::Mini(start) => *start,
                Placement::Large(i) => large_starts[*i],
            };
            directory.add_stream_path(path, start, data.len() as u64);
        }
        let dir_stream = directory.generate_directory_stream();
        debug_assert_eq!(dir_stream.len(), dir_len);

        // Header
        let mut header_builder = HeaderBuilder::new();
        header_builder.set_first_dir_sector(dir_start);
        header_builder.set_minifat(minifat_start, num_minifat_sectors);
        header_builder.set_fat(fat_start, num_fat);
        if num_difat > 0 {
            header_builder.set_difat(difat_start, num_difat);
        }

        // Emit everything in layout order
        writer.write_all(&header_builder.generate())?;
        writer.write_all(&difat::difat_bytes(fat_start, num_fat, difat_start))?;
        writer.write_all(&alloc.fat_bytes())?;
        writer.write_all(&minifat_table)?;

        write_padded(writer, &dir_stream)?;
        write_padded(writer, mini.data())?;

        for ((_, data), placement) in self.streams.iter().zip(&placements) {
            if matches!(placement, Placement::Large(_)) {
                write_padded(writer, data)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Serialize the compound file to a path
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), CfbError> {
        let file = std::fs::File::create(path)?;
        let mut buffered = io::BufWriter::new(file);
        self.write_to(&mut buffered)?;
        buffered.flush()?;
        Ok(())
    }
}

impl Default for CfbWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a byte slice padded with zeros to the next sector boundary
fn write_padded<W: Write>(writer: &mut W, data: &[u8]) -> Result<(), CfbError> {
    if data.is_empty() {
        return Ok(());
    }
    writer.write_all(data)?;
    let remainder = data.len() % SECTOR_SIZE;
    if remainder != 0 {
        let pad = vec![0u8; SECTOR_SIZE - remainder];
        writer.write_all(&pad)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize(writer: &CfbWriter) -> Vec<u8> {
        let mut buffer = Vec::new();
        writer.write_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_empty_file_shape() {
        let writer = CfbWriter::new();
        let data = serialize(&writer);

        assert_eq!(&data[0..8], MAGIC);
        assert_eq!(data.len() % SECTOR_SIZE, 0);
        // Header + 1 FAT sector + 1 directory sector
        assert_eq!(data.len(), 3 * SECTOR_SIZE);
    }

    #[test]
    fn test_small_stream_goes_to_ministream() {
        let mut writer = CfbWriter::new();
        writer.create_stream(&["Small"], b"hello").unwrap();
        let data = serialize(&writer);

        // MiniFAT sector count in the header
        let num_minifat = u32::from_le_bytes(data[64..68].try_into().unwrap());
        assert_eq!(num_minifat, 1);
    }

    #[test]
    fn test_large_stream_skips_ministream() {
        let mut writer = CfbWriter::new();
        writer.create_stream(&["Large"], &vec![0xAB; 5000]).unwrap();
        let data = serialize(&writer);

        let num_minifat = u32::from_le_bytes(data[64..68].try_into().unwrap());
        assert_eq!(num_minifat, 0);
        // First MiniFAT sector is ENDOFCHAIN
        assert_eq!(&data[60..64], &ENDOFCHAIN.to_le_bytes());
    }

    #[test]
    fn test_sequential_layout_is_deterministic() {
        let mut writer = CfbWriter::new();
        writer.create_storage(&["Storage"]).unwrap();
        writer.create_stream(&["Storage", "A"], b"aaa").unwrap();
        writer.create_stream(&["B"], &vec![1u8; 6000]).unwrap();

        assert_eq!(serialize(&writer), serialize(&writer));
    }

    #[test]
    fn test_stream_overwrite() {
        let mut writer = CfbWriter::new();
        writer.create_stream(&["S"], b"first").unwrap();
        writer.create_stream(&["S"], b"second").unwrap();
        assert_eq!(writer.streams.len(), 1);
        assert_eq!(writer.streams[0].1, b"second");
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut writer = CfbWriter::new();
        assert!(matches!(
            writer.create_stream(&[], b""),
            Err(CfbError::InvalidName(_))
        ));
        assert!(matches!(
            writer.create_stream(&["with/slash"], b""),
            Err(CfbError::InvalidName(_))
        ));
        let long = "x".repeat(32);
        assert!(matches!(
            writer.create_storage(&[long.as_str()]),
            Err(CfbError::InvalidName(_))
        ));
    }

    #[test]
    fn test_directory_entry_count() {
        let mut writer = CfbWriter::new();
        writer.create_storage(&["S"]).unwrap();
        writer.create_stream(&["S", "a"], b"1").unwrap();
        writer.create_stream(&["S", "b"], b"2").unwrap();
        writer.create_stream(&["top"], b"3").unwrap();

        // Root + S + 3 streams
        assert_eq!(writer.count_directory_entries(), 5);
    }

    #[test]
    fn test_implicit_parent_storages_counted() {
        let mut writer = CfbWriter::new();
        writer.create_stream(&["A", "B", "leaf"], b"x").unwrap();

        // Root + A + A/B + stream
        assert_eq!(writer.count_directory_entries(), 4);
    }

    #[test]
    fn test_fat_covers_itself() {
        // Enough data that the FAT needs several sectors of its own
        let mut writer = CfbWriter::new();
        writer
            .create_stream(&["Big"], &vec![7u8; 300 * SECTOR_SIZE])
            .unwrap();
        let data = serialize(&writer);

        let num_fat = u32::from_le_bytes(data[44..48].try_into().unwrap());
        let total_sectors = (data.len() / SECTOR_SIZE - 1) as u32;
        assert!(num_fat * FAT_ENTRIES_PER_SECTOR as u32 >= total_sectors);
        assert!((num_fat - 1) * (FAT_ENTRIES_PER_SECTOR as u32) < total_sectors);
    }
}
