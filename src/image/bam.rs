/// Free-space map serialization

use crate::buffer::Buffer;
use crate::error::Result;
use crate::format::constants::{BLOCK_SIZE, DIRECTORY_END_SECTOR, NAME_PADDING, NAME_SIZE};
use crate::image::DiskImage;

/// Bitmask width for the zoned geometries (21-bit track capacity)
const ZONED_MASK_WIDTH: usize = 3;
/// Bitmask width for the flat geometry (40-bit track capacity)
const FLAT_MASK_WIDTH: usize = 5;
/// Tracks covered by one free-space record run on zoned geometries
const ZONED_SIDE_TRACKS: usize = 35;
/// Tracks covered by one side record on the flat geometry
const FLAT_SIDE_TRACKS: usize = 40;
/// Offset of the second-side free counts in the zoned header sector
const SECOND_SIDE_COUNT_OFFSET: usize = 0xDD;
/// Name and id field filler, two padding bytes at once
const FILLER_WORD: u16 = 0xA0A0;
/// Fixed I/O byte in flat side records, preserved from the reference
/// format
const FLAT_IO_BYTE: u8 = 0xC0;
/// Fixed auto-boot flag in flat side records
const FLAT_AUTO_BOOT: u8 = 0;
/// Flat side records hold their per-track entries from this offset
const FLAT_RECORD_OFFSET: usize = 0x10;

impl DiskImage {
    /// Reserve the sectors that will hold the free-space map.
    ///
    /// Runs before the directory pass so that no chain can claim them
    /// and the encoded records count them as used.
    pub(crate) fn reserve_bam_blocks(&mut self) -> Result<()> {
        let placeholder = [0u8; BLOCK_SIZE];
        for (track, sector) in self.bam_blocks() {
            self.add_block(track, sector, &placeholder)?;
        }
        Ok(())
    }

    /// Serialize the free-space map into the sectors reserved by
    /// `reserve_bam_blocks`. Runs after the directory pass.
    pub(crate) fn encode_bam(&mut self) -> Result<()> {
        let bam_track = self.layout.directory_tracks[0];
        let zoned = self.layout.track_count() <= 70;
        let (directory_track, directory_sector) = self.first_directory_block();

        let mut buffer = Buffer::new();
        buffer.add_byte(directory_track);
        buffer.add_byte(directory_sector);
        buffer.add_byte(self.layout.dos_version());
        buffer.add_byte(self.layout.is_double_sided() as u8);
        if zoned {
            for track in self.tracks.iter().take(ZONED_SIDE_TRACKS) {
                track.encode_bam(&mut buffer, ZONED_MASK_WIDTH);
            }
        }
        buffer.add_data(&self.name, NAME_SIZE, NAME_PADDING);
        buffer.add_word(FILLER_WORD);
        buffer.add_bytes(&self.id);
        buffer.add_word(FILLER_WORD);
        if zoned {
            buffer.add_word(FILLER_WORD);
        }
        if self.layout.is_double_sided() {
            buffer.pad_to(SECOND_SIDE_COUNT_OFFSET);
            for track in self.tracks.iter().skip(ZONED_SIDE_TRACKS) {
                buffer.add_byte(track.free_count() as u8);
            }
        }
        buffer.pad_to(BLOCK_SIZE);
        self.track_mut(bam_track)?.write(0, buffer.as_bytes())?;

        if self.layout.is_double_sided() {
            // Second side: free-space records for tracks 36 to 70 on
            // the second directory track
            buffer.clear();
            for track in self.tracks.iter().skip(ZONED_SIDE_TRACKS) {
                track.encode_bam(&mut buffer, ZONED_MASK_WIDTH);
            }
            buffer.pad_to(BLOCK_SIZE);
            let second_track = self.layout.directory_tracks[1];
            self.track_mut(second_track)?.write(0, buffer.as_bytes())?;
        } else if !zoned {
            self.encode_flat_side_records(bam_track)?;
        }
        Ok(())
    }

    /// The flat geometry stores two independent side records in
    /// sectors 1 and 2 of the directory track, 40 tracks each.
    fn encode_flat_side_records(&mut self, bam_track: u8) -> Result<()> {
        let version = self.layout.dos_version();
        let mut buffer = Buffer::new();
        for side in 0..2u8 {
            buffer.clear();
            if side == 0 {
                buffer.add_byte(bam_track);
                buffer.add_byte(2);
            } else {
                buffer.add_byte(0);
                buffer.add_byte(DIRECTORY_END_SECTOR);
            }
            buffer.add_byte(version);
            buffer.add_byte(version ^ 0xFF);
            buffer.add_bytes(&self.id[..2]);
            buffer.add_byte(FLAT_IO_BYTE);
            buffer.add_byte(FLAT_AUTO_BOOT);
            buffer.pad_to(FLAT_RECORD_OFFSET);
            let first = side as usize * FLAT_SIDE_TRACKS;
            for track in &self.tracks[first..first + FLAT_SIDE_TRACKS] {
                track.encode_bam(&mut buffer, FLAT_MASK_WIDTH);
            }
            self.track_mut(bam_track)?.write(side + 1, buffer.as_bytes())?;
        }
        Ok(())
    }

    fn bam_blocks(&self) -> Vec<(u8, u8)> {
        let first = self.layout.directory_tracks[0];
        if self.layout.track_count() > 70 {
            vec![(first, 0), (first, 1), (first, 2)]
        } else if self.layout.is_double_sided() {
            vec![(first, 0), (self.layout.directory_tracks[1], 0)]
        } else {
            vec![(first, 0)]
        }
    }
}
