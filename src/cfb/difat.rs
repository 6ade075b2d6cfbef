//! DIFAT serialization
//!
//! The header locates the first 109 FAT sectors; anything beyond that is
//! listed in DIFAT sectors, 127 ids per 512-byte sector plus a trailing
//! pointer to the next DIFAT sector. This writer allocates the FAT as
//! one contiguous run, so the DIFAT is derived from the run bounds alone
//! - no id list needs to be carried around.

use super::consts::*;

/// FAT sector ids per DIFAT sector (the last u32 is the next pointer)
const IDS_PER_DIFAT_SECTOR: u32 = (SECTOR_SIZE / 4 - 1) as u32;

/// Number of DIFAT sectors needed to describe `num_fat_sectors` FAT
/// sectors (zero while they still fit in the header)
pub fn difat_sector_count(num_fat_sectors: u32) -> u32 {
    num_fat_sectors
        .saturating_sub(HEADER_DIFAT_ENTRIES as u32)
        .div_ceil(IDS_PER_DIFAT_SECTOR)
}

/// Serialize the DIFAT sectors for a FAT run starting at `fat_start`
///
/// `difat_start` is where the DIFAT run itself lives; the chain pointers
/// simply count up through it. Returns an empty vector when no DIFAT is
/// needed.
pub fn difat_bytes(fat_start: u32, num_fat_sectors: u32, difat_start: u32) -> Vec<u8> {
    let num_difat = difat_sector_count(num_fat_sectors);
    if num_difat == 0 {
        return Vec::new();
    }

    let mut bytes = Vec::with_capacity(num_difat as usize * SECTOR_SIZE);
    let mut id = fat_start + HEADER_DIFAT_ENTRIES as u32;
    let end = fat_start + num_fat_sectors;

    for sector in 0..num_difat {
        for _ in 0..IDS_PER_DIFAT_SECTOR {
            if id < end {
                bytes.extend_from_slice(&id.to_le_bytes());
                id += 1;
            } else {
                bytes.extend_from_slice(&FREESECT.to_le_bytes());
            }
        }
        let next = if sector + 1 < num_difat {
            difat_start + sector + 1
        } else {
            ENDOFCHAIN
        };
        bytes.extend_from_slice(&next.to_le_bytes());
    }

    bytes
}
