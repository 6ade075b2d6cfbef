//! Minimal CFB reader used by the integration tests to validate emitted
//! files. It walks the FAT, directory, and ministream just far enough to
//! resolve a stream by path; it is not a product reading capability.

const SECTOR_SIZE: usize = 512;
const MINI_SECTOR_SIZE: usize = 64;
const MINI_STREAM_CUTOFF: u64 = 4096;
const ENDOFCHAIN: u32 = 0xFFFFFFFE;
const FREESECT: u32 = 0xFFFFFFFF;
const NOSTREAM: u32 = 0xFFFFFFFF;

/// A parsed directory entry
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub entry_type: u8,
    pub color: u8,
    pub left: u32,
    pub right: u32,
    pub child: u32,
    pub start: u32,
    pub size: u64,
}

/// A parsed compound file
pub struct Cfb {
    data: Vec<u8>,
    fat: Vec<u32>,
    minifat: Vec<u32>,
    pub entries: Vec<Entry>,
    ministream: Vec<u8>,
}

fn u16_at(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(data[offset..offset + 2].try_into().unwrap())
}

fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn u64_at(data: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(data[offset..offset + 8].try_into().unwrap())
}

impl Cfb {
    pub fn parse(data: Vec<u8>) -> Self {
        assert_eq!(
            &data[0..8],
            b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1",
            "bad signature"
        );
        assert_eq!(u16_at(&data, 30), 9, "sector shift must be 9");
        assert_eq!(data.len() % SECTOR_SIZE, 0, "file not sector aligned");

        let num_fat = u32_at(&data, 44) as usize;
        let dir_start = u32_at(&data, 48);
        let minifat_start = u32_at(&data, 60);
        let difat_start = u32_at(&data, 68);

        // FAT sector ids: 109 slots in the header, the rest in DIFAT sectors
        let mut fat_sector_ids = Vec::new();
        for i in 0..109 {
            let id = u32_at(&data, 76 + i * 4);
            if id != FREESECT {
                fat_sector_ids.push(id);
            }
        }
        let mut difat_sector = difat_start;
        while difat_sector != ENDOFCHAIN && difat_sector != FREESECT {
            let sector = Self::sector(&data, difat_sector);
            for i in 0..(SECTOR_SIZE / 4 - 1) {
                let id = u32_at(sector, i * 4);
                if id != FREESECT {
                    fat_sector_ids.push(id);
                }
            }
            difat_sector = u32_at(sector, SECTOR_SIZE - 4);
        }
        assert_eq!(fat_sector_ids.len(), num_fat, "FAT sector count mismatch");

        let mut fat = Vec::with_capacity(num_fat * SECTOR_SIZE / 4);
        for &id in &fat_sector_ids {
            let sector = Self::sector(&data, id);
            for i in 0..(SECTOR_SIZE / 4) {
                fat.push(u32_at(sector, i * 4));
            }
        }

        // Directory
        let dir_data = Self::read_fat_chain(&data, &fat, dir_start, u64::MAX);
        let mut entries = Vec::new();
        for chunk in dir_data.chunks_exact(128) {
            let name_len = u16_at(chunk, 64) as usize;
            let name = if name_len >= 2 {
                let units: Vec<u16> = chunk[..name_len - 2]
                    .chunks_exact(2)
                    .map(|b| u16::from_le_bytes([b[0], b[1]]))
                    .collect();
                String::from_utf16(&units).unwrap()
            } else {
                String::new()
            };
            entries.push(Entry {
                name,
                entry_type: chunk[66],
                color: chunk[67],
                left: u32_at(chunk, 68),
                right: u32_at(chunk, 72),
                child: u32_at(chunk, 76),
                start: u32_at(chunk, 116),
                size: u64_at(chunk, 120),
            });
        }

        // Ministream and MiniFAT
        let ministream = if entries[0].size > 0 {
            Self::read_fat_chain(&data, &fat, entries[0].start, entries[0].size)
        } else {
            Vec::new()
        };
        let minifat = if minifat_start != ENDOFCHAIN {
            Self::read_fat_chain(&data, &fat, minifat_start, u64::MAX)
                .chunks_exact(4)
                .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            data,
            fat,
            minifat,
            entries,
            ministream,
        }
    }

    fn sector(data: &[u8], id: u32) -> &[u8] {
        let offset = (id as usize + 1) * SECTOR_SIZE;
        &data[offset..offset + SECTOR_SIZE]
    }

    fn read_fat_chain(data: &[u8], fat: &[u32], start: u32, size: u64) -> Vec<u8> {
        let mut out = Vec::new();
        let mut current = start;
        let mut guard = 0;
        while current != ENDOFCHAIN {
            assert!(guard < fat.len() + 1, "FAT chain loop");
            guard += 1;
            out.extend_from_slice(Self::sector(data, current));
            current = fat[current as usize];
        }
        if size != u64::MAX {
            out.truncate(size as usize);
        }
        out
    }

    /// Indices of all children of a storage entry, gathered by walking
    /// the sibling tree
    pub fn children(&self, parent: usize) -> Vec<usize> {
        let mut result = Vec::new();
        let mut stack = vec![self.entries[parent].child];
        while let Some(id) = stack.pop() {
            if id == NOSTREAM {
                continue;
            }
            let entry = &self.entries[id as usize];
            result.push(id as usize);
            stack.push(entry.left);
            stack.push(entry.right);
        }
        result.sort();
        result
    }

    /// Resolve a path to a directory entry index
    pub fn find(&self, path: &[&str]) -> Option<usize> {
        let mut current = 0usize;
        for component in path {
            current = *self
                .children(current)
                .iter()
                .find(|&&id| self.entries[id].name == *component)?;
        }
        Some(current)
    }

    /// Whether the mini chain of this stream is where its data lives
    pub fn is_mini(&self, index: usize) -> bool {
        let entry = &self.entries[index];
        entry.entry_type == 2 && entry.size < MINI_STREAM_CUTOFF
    }

    /// Read a stream's bytes by directory entry index
    pub fn read_stream(&self, index: usize) -> Vec<u8> {
        let entry = &self.entries[index];
        assert_eq!(entry.entry_type, 2, "not a stream: {}", entry.name);
        if entry.size == 0 {
            return Vec::new();
        }

        if self.is_mini(index) {
            let mut out = Vec::new();
            let mut current = entry.start;
            while current != ENDOFCHAIN {
                let offset = current as usize * MINI_SECTOR_SIZE;
                out.extend_from_slice(&self.ministream[offset..offset + MINI_SECTOR_SIZE]);
                current = self.minifat[current as usize];
            }
            out.truncate(entry.size as usize);
            out
        } else {
            Self::read_fat_chain(&self.data, &self.fat, entry.start, entry.size)
        }
    }

    /// Read a stream's bytes by path
    pub fn stream(&self, path: &[&str]) -> Option<Vec<u8>> {
        self.find(path).map(|index| self.read_stream(index))
    }
}

/// Decode a NUL-terminated UTF-16LE property stream body to a string
pub fn decode_unicode_stream(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16(&units).unwrap()
}

/// One parsed 16-byte property table entry
#[derive(Debug, Clone, Copy)]
pub struct PropertyEntry {
    pub tag: u32,
    pub flags: u32,
    pub value: [u8; 8],
}

impl PropertyEntry {
    /// The 8-byte field interpreted as a variable-length size declaration
    pub fn declared_size(&self) -> u32 {
        u32::from_le_bytes(self.value[0..4].try_into().unwrap())
    }
}

/// Parse a `__properties_version1.0` stream body, skipping the header of
/// the given length
pub fn parse_property_table(table: &[u8], header_len: usize) -> Vec<PropertyEntry> {
    table[header_len..]
        .chunks_exact(16)
        .map(|chunk| PropertyEntry {
            tag: u32_at(chunk, 0),
            flags: u32_at(chunk, 4),
            value: chunk[8..16].try_into().unwrap(),
        })
        .collect()
}
