//! Directory tree generation
//!
//! Builds the compound file directory from streams and storages and
//! serializes it as 128-byte entries.
//!
//! # Sibling Ordering
//!
//! MS-CFB organizes the children of a storage as a red-black tree keyed by
//! (UTF-16 name length, then case-insensitive code-unit order). A correct
//! red-black shape is subtle, and readers do not actually require one: this
//! implementation emits a single left-leaning chain instead. The parent's
//! child pointer references the last entry in sort order and every entry's
//! left sibling points to its predecessor, which is a legal degenerate
//! binary search tree. All nodes are colored black.

use super::consts::*;
use std::collections::HashMap;

/// A single directory entry under construction
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Entry name (at most 31 UTF-16 code units)
    pub name: String,
    /// Entry type (`STGTY_ROOT`, `STGTY_STORAGE`, `STGTY_STREAM`)
    pub entry_type: u8,
    /// Starting sector (FAT sector, or mini sector for small streams)
    pub start_sector: u32,
    /// Stream size in bytes (ministream size for the root)
    pub size: u64,
    /// Left sibling id
    pub sid_left: u32,
    /// Right sibling id
    pub sid_right: u32,
    /// Child id (storages only)
    pub sid_child: u32,
}

impl DirectoryEntry {
    /// Create the root storage entry
    pub fn root(start_sector: u32, size: u64) -> Self {
        Self {
            name: "Root Entry".to_string(),
            entry_type: STGTY_ROOT,
            start_sector,
            size,
            sid_left: NOSTREAM,
            sid_right: NOSTREAM,
            sid_child: NOSTREAM,
        }
    }

    /// Create a stream entry
    pub fn stream(name: String, start_sector: u32, size: u64) -> Self {
        Self {
            name,
            entry_type: STGTY_STREAM,
            start_sector,
            size,
            sid_left: NOSTREAM,
            sid_right: NOSTREAM,
            sid_child: NOSTREAM,
        }
    }

    /// Create a storage entry
    pub fn storage(name: String) -> Self {
        Self {
            name,
            entry_type: STGTY_STORAGE,
            start_sector: 0,
            size: 0,
            sid_left: NOSTREAM,
            sid_right: NOSTREAM,
            sid_child: NOSTREAM,
        }
    }

    /// Serialize this entry to its 128-byte on-disk form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; DIRENTRY_SIZE];

        // Name as UTF-16LE, NUL-terminated, in a 64-byte field
        let utf16: Vec<u16> = self.name.encode_utf16().collect();
        let name_len = utf16.len().min(31);

        for (i, &ch) in utf16.iter().take(name_len).enumerate() {
            let bytes = ch.to_le_bytes();
            data[i * 2] = bytes[0];
            data[i * 2 + 1] = bytes[1];
        }

        // Name length in bytes, including the terminator
        let name_len_bytes = ((name_len + 1) * 2) as u16;
        data[64..66].copy_from_slice(&name_len_bytes.to_le_bytes());

        // Entry type
        data[66] = self.entry_type;

        // Node color
        data[67] = COLOR_BLACK;

        // Sibling and child ids
        data[68..72].copy_from_slice(&self.sid_left.to_le_bytes());
        data[72..76].copy_from_slice(&self.sid_right.to_le_bytes());
        data[76..80].copy_from_slice(&self.sid_child.to_le_bytes());

        // CLSID (16 bytes, zero), state flags (4 bytes, zero),
        // creation/modification times (16 bytes, zero)
        // data[80..116] already zeros

        // Starting sector
        data[116..120].copy_from_slice(&self.start_sector.to_le_bytes());

        // Stream size (8 bytes)
        data[120..128].copy_from_slice(&self.size.to_le_bytes());

        data
    }
}

/// Compare two entry names per MS-CFB: shorter UTF-16 names first, then
/// case-insensitive code-unit order
fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    let a16: Vec<u16> = a.to_uppercase().encode_utf16().collect();
    let b16: Vec<u16> = b.to_uppercase().encode_utf16().collect();
    let alen = a.encode_utf16().count();
    let blen = b.encode_utf16().count();
    alen.cmp(&blen).then_with(|| a16.cmp(&b16))
}

/// Directory tree builder
///
/// Entries are stored in creation order; ids are their indices. Child
/// lists are linked into sibling chains when the directory stream is
/// generated.
pub struct DirectoryBuilder {
    /// Directory entries; index is the entry id
    entries: Vec<DirectoryEntry>,
    /// Map from storage path to entry id
    path_to_sid: HashMap<Vec<String>, u32>,
    /// Children ids per parent id, in creation order
    children: HashMap<u32, Vec<u32>>,
}

impl DirectoryBuilder {
    /// Create a new directory builder with the root entry
    ///
    /// `ministream_start` and `ministream_size` describe the ministream,
    /// which is anchored at the root entry.
    pub fn new(ministream_start: u32, ministream_size: u64) -> Self {
        let root = DirectoryEntry::root(ministream_start, ministream_size);
        let mut path_to_sid = HashMap::new();
        path_to_sid.insert(Vec::new(), 0);
        let mut children = HashMap::new();
        children.insert(0, Vec::new());
        Self {
            entries: vec![root],
            path_to_sid,
            children,
        }
    }

    /// Ensure a storage path exists, creating missing storages
    ///
    /// Returns the id of the storage at the given path.
    pub fn add_storage_path(&mut self, path: &[String]) -> u32 {
        let mut current_path: Vec<String> = Vec::new();
        let mut parent_sid = 0u32;

        for component in path {
            current_path.push(component.clone());
            if let Some(&sid) = self.path_to_sid.get(&current_path) {
                parent_sid = sid;
                continue;
            }

            let sid = self.entries.len() as u32;
            self.entries.push(DirectoryEntry::storage(component.clone()));
            self.path_to_sid.insert(current_path.clone(), sid);

            self.children.entry(parent_sid).or_default().push(sid);
            self.children.entry(sid).or_default();

            parent_sid = sid;
        }

        parent_sid
    }

    /// Add a stream at the given full path, creating parent storages as
    /// needed
    pub fn add_stream_path(&mut self, full_path: &[String], start_sector: u32, size: u64) -> u32 {
        debug_assert!(!full_path.is_empty(), "stream path must not be empty");
        let parent_sid = if full_path.len() > 1 {
            self.add_storage_path(&full_path[..full_path.len() - 1])
        } else {
            0
        };

        let name = full_path.last().unwrap().clone();
        let sid = self.entries.len() as u32;
        self.entries
            .push(DirectoryEntry::stream(name, start_sector, size));
        self.children.entry(parent_sid).or_default().push(sid);
        sid
    }

    /// Number of directory entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Generate the directory stream: all entries serialized in id order,
    /// with sibling chains linked
    pub fn generate_directory_stream(&mut self) -> Vec<u8> {
        let storage_sids: Vec<u32> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(sid, e)| {
                (e.entry_type == STGTY_ROOT || e.entry_type == STGTY_STORAGE).then_some(sid as u32)
            })
            .collect();

        for parent_sid in storage_sids {
            let children = self.children.get(&parent_sid).cloned().unwrap_or_default();
            Self::link_children(parent_sid, &children, &mut self.entries);
        }

        let mut data = Vec::with_capacity(self.entries.len() * DIRENTRY_SIZE);
        for entry in &self.entries {
            data.extend_from_slice(&entry.to_bytes());
        }
        data
    }

    /// Link a parent's children as a left-leaning chain in sort order
    fn link_children(parent_sid: u32, child_sids: &[u32], entries: &mut [DirectoryEntry]) {
        if child_sids.is_empty() {
            entries[parent_sid as usize].sid_child = NOSTREAM;
            return;
        }

        let mut sorted: Vec<u32> = child_sids.to_vec();
        sorted.sort_by(|&a, &b| {
            compare_names(&entries[a as usize].name, &entries[b as usize].name)
        });

        // The chain hangs from the last entry: child -> left -> left -> ...
        entries[parent_sid as usize].sid_child = *sorted.last().unwrap();
        for (j, &sid) in sorted.iter().enumerate() {
            let entry = &mut entries[sid as usize];
            entry.sid_left = if j > 0 { sorted[j - 1] } else { NOSTREAM };
            entry.sid_right = NOSTREAM;
        }
    }
}
