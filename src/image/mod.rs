/// Disk image data structures

/// Block allocation and file chaining
mod allocator;
/// Free-space map serialization
mod bam;
/// Directory entries and directory chain serialization
pub mod directory;
/// Track and sector slot state
pub mod track;

pub use directory::DirectoryEntry;
pub use track::{Slot, Track};

use crate::error::{DiskError, Result};
use crate::format::constants::{BLOCK_SIZE, ID_SIZE, NAME_SIZE};
use crate::format::{DiskFormat, FileType, Layout};
use std::io::Write;
use std::path::Path;

/// An in-progress disk image: the track/sector grid, the directory
/// listing and the disk identity.
///
/// Content is added incrementally through immediate allocate-and-write
/// calls; `output` consumes the image, encodes the directory and
/// free-space metadata and serializes the grid. A failed call can
/// leave earlier chunks allocated, so callers discard the image on any
/// error instead of retrying.
#[derive(Debug, Clone)]
pub struct DiskImage {
    /// Selected disk format
    format: DiskFormat,
    /// Geometry for the selected format
    layout: Layout,
    /// Tracks numbered 1..=N, stored at index number - 1
    tracks: Vec<Track>,
    /// Directory entries in insertion order
    directory: Vec<DirectoryEntry>,
    /// Disk name, at most 16 bytes
    name: Vec<u8>,
    /// Disk id, 3 to 5 bytes after normalization
    id: Vec<u8>,
}

impl DiskImage {
    /// Create a new empty image for the given format
    pub fn new(format: DiskFormat, name: &[u8], id: &[u8]) -> Result<Self> {
        let layout = format.layout();
        let mut tracks = Vec::with_capacity(layout.track_count() as usize);
        let mut number = 1u8;
        for zone in &layout.zones {
            for _ in 0..zone.tracks {
                tracks.push(Track::new(number, zone.sectors));
                number += 1;
            }
        }

        let mut image = Self {
            format,
            layout,
            tracks,
            directory: Vec::new(),
            name: Vec::new(),
            id: Vec::new(),
        };
        image.set_name(name, id)?;
        Ok(image)
    }

    /// Create a new empty image looking the format up by key
    pub fn create(key: &str, name: &[u8], id: &[u8]) -> Result<Self> {
        Self::new(DiskFormat::from_key(key)?, name, id)
    }

    /// Set the disk name and id
    ///
    /// An id of up to 2 bytes is space-padded to 3 bytes and suffixed
    /// with the layout's 2-character DOS type code.
    pub fn set_name(&mut self, name: &[u8], id: &[u8]) -> Result<()> {
        if name.len() > NAME_SIZE {
            return Err(DiskError::name_too_long(name, NAME_SIZE));
        }
        if id.len() > ID_SIZE {
            return Err(DiskError::id_too_long(id, ID_SIZE));
        }
        self.name = name.to_vec();
        self.id = if id.len() <= 2 {
            let mut full = id.to_vec();
            full.resize(3, b' ');
            full.extend_from_slice(self.layout.dos_type.as_bytes());
            full
        } else {
            id.to_vec()
        };
        Ok(())
    }

    /// Add a file: chains its data through the grid and appends a
    /// directory entry of the given type
    pub fn add_file(&mut self, name: &[u8], data: &[u8], file_type: FileType) -> Result<()> {
        if name.len() > NAME_SIZE {
            return Err(DiskError::file_name_too_long(name, NAME_SIZE));
        }
        let (track, sector, blocks) = self.add_file_data(data)?;
        self.directory.push(DirectoryEntry::new(
            name,
            file_type,
            track,
            sector,
            blocks as u16,
        ));
        Ok(())
    }

    /// Add a DEL directory entry reserving a catalog slot with no data
    pub fn add_del(&mut self, name: &[u8]) -> Result<()> {
        if name.len() > NAME_SIZE {
            return Err(DiskError::file_name_too_long(name, NAME_SIZE));
        }
        self.directory
            .push(DirectoryEntry::new(name, FileType::Del, 0, 0, 0));
        Ok(())
    }

    /// Place a block at an exact position, bypassing the allocator
    ///
    /// Used for boot blocks; must precede any `add_file` call that
    /// could claim the same sector.
    pub fn add_block(&mut self, track: u8, sector: u8, data: &[u8]) -> Result<()> {
        let target = self.track_mut(track)?;
        if !target.is_free(sector)? {
            return Err(DiskError::BlockInUse { track, sector });
        }
        target.write(sector, data)
    }

    /// Read a file back by following its chain from the directory
    /// entry to the terminal block
    pub fn read_file(&self, name: &[u8]) -> Result<Vec<u8>> {
        let entry = self
            .directory
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| DiskError::file_not_found(name))?;

        let mut data = Vec::new();
        let (mut track, mut sector) = (entry.track, entry.sector);
        while track != 0 {
            let block = self
                .track(track)?
                .read(sector)?
                .ok_or(DiskError::InvalidSector { track, sector })?;
            let next_track = block[0];
            let next_sector = block[1];
            if next_track == 0 {
                // Terminal marker holds used-byte-count + 1
                let end = (next_sector as usize + 1).clamp(2, BLOCK_SIZE);
                data.extend_from_slice(&block[2..end]);
            } else {
                data.extend_from_slice(&block[2..]);
            }
            track = next_track;
            sector = next_sector;
        }
        Ok(data)
    }

    /// Finalize the image: encode the directory chain and the
    /// free-space map, then serialize tracks 1..=N in order with free
    /// slots zero-filled.
    ///
    /// Consumes the image; the metadata passes run exactly once. The
    /// free-space sectors are reserved before the directory pass so
    /// that no chain can claim them.
    pub fn output<W: Write>(mut self, sink: &mut W) -> Result<()> {
        self.reserve_bam_blocks()?;
        self.encode_directory()?;
        self.encode_bam()?;
        for track in &self.tracks {
            track.output(sink)?;
        }
        Ok(())
    }

    /// Finalize the image and write it to a file
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        crate::io::write_image(self, path)
    }

    /// Get the disk format
    pub fn format(&self) -> DiskFormat {
        self.format
    }

    /// Get the geometry layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the disk name
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Get the normalized disk id
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Get the directory entries in insertion order
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Get a track by its 1-based number
    pub fn track(&self, number: u8) -> Result<&Track> {
        let max = self.tracks.len() as u8;
        if number == 0 || number > max {
            return Err(DiskError::InvalidTrack { track: number, max });
        }
        Ok(&self.tracks[number as usize - 1])
    }

    /// Number of tracks on this image
    pub fn track_count(&self) -> u8 {
        self.tracks.len() as u8
    }

    /// Number of sectors on this image
    pub fn sector_count(&self) -> usize {
        self.tracks.iter().map(Track::len).sum()
    }

    /// Number of free sectors across the whole grid
    pub fn free_block_count(&self) -> usize {
        self.tracks.iter().map(Track::free_count).sum()
    }

    /// Whether the selected layout is double-sided
    pub fn is_double_sided(&self) -> bool {
        self.layout.is_double_sided()
    }

    fn track_mut(&mut self, number: u8) -> Result<&mut Track> {
        let max = self.tracks.len() as u8;
        if number == 0 || number > max {
            return Err(DiskError::InvalidTrack { track: number, max });
        }
        Ok(&mut self.tracks[number as usize - 1])
    }
}
