/// Magic bytes at the beginning of every compound file
pub const MAGIC: &[u8; 8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Sector size for a version 3 compound file (512 bytes)
pub const SECTOR_SIZE: usize = 512;

/// Mini sector size (64 bytes)
pub const MINI_SECTOR_SIZE: usize = 64;

/// Streams smaller than this are stored in the ministream
pub const MINI_STREAM_CUTOFF: usize = 4096;

/// Size of a directory entry in bytes
pub const DIRENTRY_SIZE: usize = 128;

/// FAT sector ids the 512-byte header can hold before a DIFAT is needed
pub const HEADER_DIFAT_ENTRIES: usize = 109;

/// Largest file a version 3 compound file can address (32-bit sector ids)
pub const MAX_FILE_SIZE: u64 = 0x8000_0000;

// Sector IDs (from AAF specifications)
/// Maximum regular sector ID
pub const MAXREGSECT: u32 = 0xFFFFFFFA; // -6
/// Denotes a DIFAT sector in a FAT
pub const DIFSECT: u32 = 0xFFFFFFFC; // -4
/// Denotes a FAT sector in a FAT
pub const FATSECT: u32 = 0xFFFFFFFD; // -3
/// End of a virtual stream chain
pub const ENDOFCHAIN: u32 = 0xFFFFFFFE; // -2
/// Unallocated sector
pub const FREESECT: u32 = 0xFFFFFFFF; // -1

// Directory Entry IDs (from AAF specifications)
/// Maximum directory entry ID
pub const MAXREGSID: u32 = 0xFFFFFFFA; // -6
/// Unallocated directory entry
pub const NOSTREAM: u32 = 0xFFFFFFFF; // -1

// Object types in storage (from AAF specifications)
/// Empty directory entry
pub const STGTY_EMPTY: u8 = 0;
/// Element is a storage object
pub const STGTY_STORAGE: u8 = 1;
/// Element is a stream object
pub const STGTY_STREAM: u8 = 2;
/// Element is a root storage
pub const STGTY_ROOT: u8 = 5;

/// Red-black tree color red
pub const COLOR_RED: u8 = 0;
/// Red-black tree color black
pub const COLOR_BLACK: u8 = 1;
