//! CFB header generation
//!
//! Generates the 512-byte header with the magic signature, version
//! information, and the FAT/MiniFAT/DIFAT/directory locations. The FAT
//! is a single contiguous run in this writer, so the header's 109 DIFAT
//! slots are filled by counting up from the run start.

use super::consts::*;

/// CFB header builder (version 3, 512-byte sectors)
pub struct HeaderBuilder {
    /// First sector of the directory stream
    first_dir_sector: u32,
    /// First sector of the MiniFAT
    first_minifat_sector: u32,
    /// Number of MiniFAT sectors
    num_minifat_sectors: u32,
    /// First sector of the DIFAT
    first_difat_sector: u32,
    /// Number of DIFAT sectors
    num_difat_sectors: u32,
    /// First sector of the FAT run
    fat_start: u32,
    /// Number of FAT sectors
    num_fat_sectors: u32,
}

impl HeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            first_dir_sector: ENDOFCHAIN,
            first_minifat_sector: ENDOFCHAIN,
            num_minifat_sectors: 0,
            first_difat_sector: ENDOFCHAIN,
            num_difat_sectors: 0,
            fat_start: 0,
            num_fat_sectors: 0,
        }
    }

    /// Set the first directory sector
    pub fn set_first_dir_sector(&mut self, sector: u32) {
        self.first_dir_sector = sector;
    }

    /// Set MiniFAT location and count
    pub fn set_minifat(&mut self, first_sector: u32, num_sectors: u32) {
        self.first_minifat_sector = first_sector;
        self.num_minifat_sectors = num_sectors;
    }

    /// Set DIFAT location and count
    pub fn set_difat(&mut self, first_sector: u32, num_sectors: u32) {
        self.first_difat_sector = first_sector;
        self.num_difat_sectors = num_sectors;
    }

    /// Record the FAT run
    pub fn set_fat(&mut self, fat_start: u32, num_sectors: u32) {
        self.fat_start = fat_start;
        self.num_fat_sectors = num_sectors;
    }

    /// Generate the 512-byte header block
    pub fn generate(&self) -> Vec<u8> {
        let mut header = vec![0u8; SECTOR_SIZE];

        // Magic bytes (8 bytes)
        header[0..8].copy_from_slice(MAGIC);

        // CLSID (16 bytes, all zeros)
        // header[8..24] already zeros

        // Minor version (2 bytes) - 0x003E
        header[24..26].copy_from_slice(&0x003Eu16.to_le_bytes());

        // Major version (2 bytes) - 3 for 512-byte sectors
        header[26..28].copy_from_slice(&3u16.to_le_bytes());

        // Byte order (2 bytes) - 0xFFFE for little-endian
        header[28..30].copy_from_slice(&0xFFFEu16.to_le_bytes());

        // Sector shift (2 bytes) - 2^9 = 512
        header[30..32].copy_from_slice(&9u16.to_le_bytes());

        // Mini sector shift (2 bytes) - 2^6 = 64
        header[32..34].copy_from_slice(&6u16.to_le_bytes());

        // Reserved (6 bytes)
        // header[34..40] already zeros

        // Number of directory sectors (4 bytes) - must be 0 in version 3
        // header[40..44] already zeros

        // Number of FAT sectors (4 bytes)
        header[44..48].copy_from_slice(&self.num_fat_sectors.to_le_bytes());

        // First directory sector (4 bytes)
        header[48..52].copy_from_slice(&self.first_dir_sector.to_le_bytes());

        // Transaction signature (4 bytes) - 0
        // header[52..56] already zeros

        // Mini stream cutoff size (4 bytes) - 4096
        header[56..60].copy_from_slice(&(MINI_STREAM_CUTOFF as u32).to_le_bytes());

        // First MiniFAT sector (4 bytes)
        header[60..64].copy_from_slice(&self.first_minifat_sector.to_le_bytes());

        // Number of MiniFAT sectors (4 bytes)
        header[64..68].copy_from_slice(&self.num_minifat_sectors.to_le_bytes());

        // First DIFAT sector (4 bytes)
        header[68..72].copy_from_slice(&self.first_difat_sector.to_le_bytes());

        // Number of DIFAT sectors (4 bytes)
        header[72..76].copy_from_slice(&self.num_difat_sectors.to_le_bytes());

        // 109 FAT sector slots (436 bytes): the run's first ids, then
        // FREESECT for the unused remainder
        let in_header = self.num_fat_sectors.min(HEADER_DIFAT_ENTRIES as u32);
        for i in 0..HEADER_DIFAT_ENTRIES as u32 {
            let offset = 76 + i as usize * 4;
            let value = if i < in_header {
                self.fat_start + i
            } else {
                FREESECT
            };
            header[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }

        header
    }
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_generation() {
        let mut builder = HeaderBuilder::new();
        builder.set_first_dir_sector(10);
        builder.set_fat(1, 3);

        let header = builder.generate();

        assert_eq!(header.len(), 512);
        assert_eq!(&header[0..8], MAGIC);
        assert_eq!(&header[28..30], &0xFFFEu16.to_le_bytes());
        assert_eq!(&header[48..52], &10u32.to_le_bytes());
        assert_eq!(&header[44..48], &3u32.to_le_bytes());

        // FAT run ids counted up from the start
        assert_eq!(&header[76..80], &1u32.to_le_bytes());
        assert_eq!(&header[80..84], &2u32.to_le_bytes());
        assert_eq!(&header[84..88], &3u32.to_le_bytes());
        assert_eq!(&header[88..92], &FREESECT.to_le_bytes());
    }

    #[test]
    fn test_version_3_fields() {
        let header = HeaderBuilder::new().generate();

        // Major version 3, sector shift 9, mini sector shift 6
        assert_eq!(&header[26..28], &3u16.to_le_bytes());
        assert_eq!(&header[30..32], &9u16.to_le_bytes());
        assert_eq!(&header[32..34], &6u16.to_le_bytes());

        // Directory sector count stays zero in version 3
        assert_eq!(&header[40..44], &[0, 0, 0, 0]);

        // Mini stream cutoff 4096
        assert_eq!(&header[56..60], &4096u32.to_le_bytes());
    }

    #[test]
    fn test_fat_run_capped_at_header_slots() {
        let mut builder = HeaderBuilder::new();
        builder.set_fat(0, 150);
        let header = builder.generate();

        // All 109 slots used, ids 0..108
        assert_eq!(&header[76..80], &0u32.to_le_bytes());
        assert_eq!(&header[508..512], &108u32.to_le_bytes());
    }
}
