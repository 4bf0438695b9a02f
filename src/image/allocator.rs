/// Block allocation and file chaining

use crate::buffer::Buffer;
use crate::error::{DiskError, Result};
use crate::format::constants::BLOCK_DATA_SIZE;
use crate::image::DiskImage;

impl DiskImage {
    /// Pick the start block for a new chain: searching outward in
    /// increasing distance from the directory track, lower track
    /// numbers first, taking the first free sector found.
    pub(crate) fn find_first_block(&self) -> Option<(u8, u8)> {
        let directory_track = self.layout.directory_tracks[0] as i32;
        let last = self.tracks.len() as i32;
        let mut distance = 1;
        while directory_track - distance >= 1 || directory_track + distance <= last {
            if directory_track - distance >= 1 {
                let track = (directory_track - distance) as u8;
                if let Some(sector) = self.tracks[track as usize - 1].first_free() {
                    return Some((track, sector));
                }
            }
            if directory_track + distance <= last {
                let track = (directory_track + distance) as u8;
                if let Some(sector) = self.tracks[track as usize - 1].first_free() {
                    return Some((track, sector));
                }
            }
            distance += 1;
        }
        None
    }

    /// Pick the block following (track, sector) in a chain: the data
    /// interleave stride on the same track first, then adjacent tracks
    /// moving away from the directory track, reversing direction once
    /// at the end of the range.
    pub(crate) fn find_next_block(&self, track: u8, sector: u8) -> Option<(u8, u8)> {
        let directory_track = self.layout.directory_tracks[0];
        let last = self.tracks.len() as i32;
        let start_track = track;
        let mut direction: i32 = if track < directory_track { -1 } else { 1 };
        let mut reversed = false;
        let mut current = track as i32;

        loop {
            let candidate = &self.tracks[current as usize - 1];
            // The originating sector is only excluded on its own track
            let exclude = if current as u8 == start_track {
                Some(sector)
            } else {
                None
            };
            if let Some(next) =
                candidate.next_free(sector as usize + self.layout.interleave, exclude)
            {
                return Some((current as u8, next));
            }
            current += direction;
            if current < 1 || current > last {
                if reversed {
                    return None;
                }
                reversed = true;
                direction = -direction;
                current = directory_track as i32 + direction;
                if current < 1 || current > last {
                    return None;
                }
            }
        }
    }

    /// Chain a payload through the grid in 254-byte chunks.
    ///
    /// Each non-terminal block leads with the next block's position;
    /// the terminal block leads with (0, used-byte-count + 1). Returns
    /// the start position and the number of blocks written.
    pub(crate) fn add_file_data(&mut self, data: &[u8]) -> Result<(u8, u8, usize)> {
        // A zero-byte payload still occupies one terminal block
        let mut chunks: Vec<&[u8]> = data.chunks(BLOCK_DATA_SIZE).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }

        let (start_track, start_sector) = self.find_first_block().ok_or(DiskError::DiskFull)?;
        let (mut track, mut sector) = (start_track, start_sector);

        for &chunk in &chunks[..chunks.len() - 1] {
            let (next_track, next_sector) = self
                .find_next_block(track, sector)
                .ok_or(DiskError::DiskFull)?;
            let block = Self::chain_block(next_track, next_sector, chunk);
            self.add_block(track, sector, block.as_bytes())?;
            (track, sector) = (next_track, next_sector);
        }

        let last = chunks[chunks.len() - 1];
        let block = Self::chain_block(0, last.len() as u8 + 1, last);
        self.add_block(track, sector, block.as_bytes())?;

        Ok((start_track, start_sector, chunks.len()))
    }

    fn chain_block(track: u8, sector: u8, data: &[u8]) -> Buffer {
        let mut buffer = Buffer::new();
        buffer.add_byte(track);
        buffer.add_byte(sector);
        buffer.add_data(data, BLOCK_DATA_SIZE, 0);
        buffer
    }
}
