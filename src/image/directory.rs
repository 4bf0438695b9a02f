/// Directory entries and directory chain serialization

use crate::buffer::Buffer;
use crate::error::{DiskError, Result};
use crate::format::constants::{
    BLOCK_SIZE, DIRECTORY_END_SECTOR, DIRECTORY_ENTRIES_PER_BLOCK, NAME_PADDING, NAME_SIZE,
};
use crate::format::FileType;
use crate::image::DiskImage;

/// One directory listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// File name, at most 16 bytes, already character-mapped
    pub name: Vec<u8>,
    /// File type tag
    pub file_type: FileType,
    /// First track of the file's chain (0 for DEL placeholders)
    pub track: u8,
    /// First sector of the file's chain
    pub sector: u8,
    /// Number of blocks the file occupies
    pub blocks: u16,
}

impl DirectoryEntry {
    /// Create a new directory entry
    pub fn new(name: &[u8], file_type: FileType, track: u8, sector: u8, blocks: u16) -> Self {
        Self {
            name: name.to_vec(),
            file_type,
            track,
            sector,
            blocks,
        }
    }

    /// Serialize this entry as a 32-byte directory record.
    ///
    /// The two leading bytes carry the directory chain pointer; it is
    /// only meaningful in the first record of a block and stays zero
    /// everywhere else.
    pub(crate) fn encode(&self, buffer: &mut Buffer, chain_track: u8, chain_sector: u8) {
        buffer.add_byte(chain_track);
        buffer.add_byte(chain_sector);
        buffer.add_byte(self.file_type.type_byte());
        buffer.add_byte(self.track);
        buffer.add_byte(self.sector);
        buffer.add_data(&self.name.to_ascii_uppercase(), NAME_SIZE, NAME_PADDING);
        buffer.add_zeros(9);
        buffer.add_word(self.blocks);
    }
}

impl DiskImage {
    /// Fixed first directory block for the selected layout.
    ///
    /// The flat geometry keeps sectors 0 to 2 of its directory track
    /// for the header and free-space records, so its directory starts
    /// at sector 3; the zoned geometries start at sector 1.
    pub(crate) fn first_directory_block(&self) -> (u8, u8) {
        let track = self.layout.directory_tracks[0];
        if self.layout.track_count() > 70 {
            (track, 3)
        } else {
            (track, 1)
        }
    }

    /// Pick the directory block following (track, sector): the
    /// directory interleave stride within the declared directory
    /// tracks, taken in their listed order.
    pub(crate) fn find_next_directory_block(&self, track: u8, sector: u8) -> Option<(u8, u8)> {
        let start_track = track;
        let directory_tracks = &self.layout.directory_tracks;
        let index = directory_tracks
            .iter()
            .position(|&candidate| candidate == track)?;
        for &candidate in &directory_tracks[index..] {
            let exclude = if candidate == start_track {
                Some(sector)
            } else {
                None
            };
            let start = sector as usize + self.layout.directory_interleave;
            if let Some(next) = self.tracks[candidate as usize - 1].next_free(start, exclude) {
                return Some((candidate, next));
            }
        }
        None
    }

    /// Serialize the directory listing into chained blocks on the
    /// directory track(s), eight entries per block.
    pub(crate) fn encode_directory(&mut self) -> Result<()> {
        let entries = std::mem::take(&mut self.directory);
        // An empty directory still gets one terminated block
        let mut blocks: Vec<&[DirectoryEntry]> =
            entries.chunks(DIRECTORY_ENTRIES_PER_BLOCK).collect();
        if blocks.is_empty() {
            blocks.push(&[]);
        }

        let (mut track, mut sector) = self.first_directory_block();
        for &block in &blocks[..blocks.len() - 1] {
            let (next_track, next_sector) = self
                .find_next_directory_block(track, sector)
                .ok_or(DiskError::DirectoryFull)?;
            self.encode_directory_block(track, sector, block, next_track, next_sector)?;
            (track, sector) = (next_track, next_sector);
        }
        let last = blocks[blocks.len() - 1];
        self.encode_directory_block(track, sector, last, 0, DIRECTORY_END_SECTOR)
    }

    fn encode_directory_block(
        &mut self,
        track: u8,
        sector: u8,
        entries: &[DirectoryEntry],
        next_track: u8,
        next_sector: u8,
    ) -> Result<()> {
        let mut buffer = Buffer::new();
        match entries.split_first() {
            Some((first, rest)) => {
                first.encode(&mut buffer, next_track, next_sector);
                for entry in rest {
                    entry.encode(&mut buffer, 0, 0);
                }
            }
            None => {
                buffer.add_byte(next_track);
                buffer.add_byte(next_sector);
            }
        }
        buffer.pad_to(BLOCK_SIZE);
        self.add_block(track, sector, buffer.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DiskFormat;

    fn d64() -> DiskImage {
        DiskImage::new(DiskFormat::D64, b"TEST", b"01").unwrap()
    }

    #[test]
    fn test_entry_encoding() {
        let entry = DirectoryEntry::new(b"HELLO", FileType::Prg, 17, 0, 3);
        let mut buffer = Buffer::new();

        entry.encode(&mut buffer, 0, DIRECTORY_END_SECTOR);

        let mut expected = vec![0x00, 0xFF, 0x82, 17, 0];
        expected.extend_from_slice(b"HELLO");
        expected.extend_from_slice(&[NAME_PADDING; 11]);
        expected.extend_from_slice(&[0; 9]);
        expected.extend_from_slice(&[3, 0]);
        assert_eq!(buffer.as_bytes(), expected.as_slice());
        assert_eq!(buffer.len(), 32);
    }

    #[test]
    fn test_entry_name_upper_cased() {
        let entry = DirectoryEntry::new(b"hello", FileType::Seq, 0, 0, 0);
        let mut buffer = Buffer::new();

        entry.encode(&mut buffer, 0, 0);

        assert_eq!(&buffer.as_bytes()[5..10], b"HELLO");
        assert_eq!(buffer.as_bytes()[2], 0x81);
    }

    #[test]
    fn test_first_directory_block() {
        assert_eq!(d64().first_directory_block(), (18, 1));

        let image = DiskImage::new(DiskFormat::D71, b"", b"").unwrap();
        assert_eq!(image.first_directory_block(), (18, 1));

        let image = DiskImage::new(DiskFormat::D81, b"", b"").unwrap();
        assert_eq!(image.first_directory_block(), (40, 3));
    }

    #[test]
    fn test_find_next_directory_block_interleave() {
        let image = d64();
        assert_eq!(image.find_next_directory_block(18, 1), Some((18, 4)));
        assert_eq!(image.find_next_directory_block(18, 4), Some((18, 7)));
    }

    #[test]
    fn test_find_next_directory_block_stays_on_directory_tracks() {
        let mut image = d64();
        // Occupy every directory track sector except the origin
        for sector in (0..19).filter(|&sector| sector != 4) {
            image.add_block(18, sector, &[1u8; BLOCK_SIZE]).unwrap();
        }
        assert_eq!(image.find_next_directory_block(18, 4), None);
    }

    #[test]
    fn test_find_next_directory_block_crosses_to_second_track() {
        let mut image = DiskImage::new(DiskFormat::D71, b"", b"").unwrap();
        for sector in (0..19).filter(|&sector| sector != 4) {
            image.add_block(18, sector, &[1u8; BLOCK_SIZE]).unwrap();
        }
        // Track 18 exhausted; the scan restarts on track 53
        assert_eq!(image.find_next_directory_block(18, 4), Some((53, 7)));
    }

    #[test]
    fn test_encode_directory_single_block() {
        let mut image = d64();
        image.add_del(b"ONLY").unwrap();

        image.encode_directory().unwrap();

        let block = image.track(18).unwrap().read(1).unwrap().unwrap();
        assert_eq!(&block[..2], &[0, DIRECTORY_END_SECTOR]);
        assert_eq!(block[2], 0x80);
        assert_eq!(&block[5..9], b"ONLY");
        // Remaining entry slots stay zeroed
        assert!(block[32..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_encode_directory_empty() {
        let mut image = d64();

        image.encode_directory().unwrap();

        let block = image.track(18).unwrap().read(1).unwrap().unwrap();
        assert_eq!(&block[..2], &[0, DIRECTORY_END_SECTOR]);
        assert!(block[2..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_encode_directory_chains_blocks() {
        let mut image = d64();
        for index in 0..9 {
            image.add_del(format!("FILE {index}").as_bytes()).unwrap();
        }

        image.encode_directory().unwrap();

        // First block carries eight entries and points at the next
        let block = image.track(18).unwrap().read(1).unwrap().unwrap();
        assert_eq!(&block[..2], &[18, 4]);
        assert_eq!(&block[5..11], b"FILE 0");
        assert_eq!(&block[7 * 32 + 5..7 * 32 + 11], b"FILE 7");

        // Second block holds the ninth entry and the terminator
        let block = image.track(18).unwrap().read(4).unwrap().unwrap();
        assert_eq!(&block[..2], &[0, DIRECTORY_END_SECTOR]);
        assert_eq!(&block[5..11], b"FILE 8");
    }

    #[test]
    fn test_encode_directory_preserves_insertion_order() {
        let mut image = d64();
        image.add_del(b"ZEBRA").unwrap();
        image.add_del(b"APPLE").unwrap();

        image.encode_directory().unwrap();

        let block = image.track(18).unwrap().read(1).unwrap().unwrap();
        assert_eq!(&block[5..10], b"ZEBRA");
        assert_eq!(&block[32 + 5..32 + 10], b"APPLE");
    }

    #[test]
    fn test_directory_full() {
        let mut image = d64();
        // Track 18 offers 18 blocks of 8 entries once the free-space
        // sector is reserved
        image.reserve_bam_blocks().unwrap();
        for index in 0..145 {
            image.add_del(format!("{index}").as_bytes()).unwrap();
        }

        let result = image.encode_directory();
        assert!(matches!(result, Err(DiskError::DirectoryFull)));
    }
}
