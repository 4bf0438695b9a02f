/// Disk geometry layouts and presets

use crate::format::constants::BLOCK_SIZE;

/// A speed zone: a contiguous run of tracks sharing one sector count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    /// Number of tracks in this zone
    pub tracks: u8,
    /// Sectors per track within this zone
    pub sectors: u8,
}

impl Zone {
    /// Create a new zone
    pub fn new(tracks: u8, sectors: u8) -> Self {
        Self { tracks, sectors }
    }
}

/// Disk geometry: speed zones, directory placement and interleave policy
///
/// Layouts are immutable and only obtained through the preset
/// constructors; track numbering is 1-based and contiguous across
/// zones, with a double-sided disk represented as its zone list
/// repeated for the second side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Speed zones from track 1 outward
    pub zones: Vec<Zone>,
    /// Directory track numbers (one or two entries)
    pub directory_tracks: Vec<u8>,
    /// Two-character DOS type code
    pub dos_type: &'static str,
    /// Sector stride when chaining file data
    pub interleave: usize,
    /// Sector stride when chaining directory blocks
    pub directory_interleave: usize,
}

impl Layout {
    /// 35-track single-sided layout (1541): four speed zones,
    /// directory on track 18
    pub fn d64() -> Self {
        Self {
            zones: vec![
                Zone::new(17, 21),
                Zone::new(7, 19),
                Zone::new(6, 18),
                Zone::new(5, 17),
            ],
            directory_tracks: vec![18],
            dos_type: "2a",
            interleave: 10,
            directory_interleave: 3,
        }
    }

    /// 70-track double-sided layout (1571): the 1541 zones repeated
    /// for the second side, directory on tracks 18 and 53
    pub fn d71() -> Self {
        Self {
            zones: vec![
                Zone::new(17, 21),
                Zone::new(7, 19),
                Zone::new(6, 18),
                Zone::new(5, 17),
                Zone::new(17, 21),
                Zone::new(7, 19),
                Zone::new(6, 18),
                Zone::new(5, 17),
            ],
            directory_tracks: vec![18, 53],
            dos_type: "2a",
            interleave: 6,
            directory_interleave: 3,
        }
    }

    /// 80-track flat layout (1581): one zone of 40-sector tracks,
    /// directory on track 40
    pub fn d81() -> Self {
        Self {
            zones: vec![Zone::new(80, 40)],
            directory_tracks: vec![40],
            dos_type: "3d",
            interleave: 1,
            directory_interleave: 1,
        }
    }

    /// Total number of tracks across all zones
    pub fn track_count(&self) -> u8 {
        self.zones.iter().map(|zone| zone.tracks).sum()
    }

    /// Total number of sectors across all zones
    pub fn sector_count(&self) -> usize {
        self.zones
            .iter()
            .map(|zone| zone.tracks as usize * zone.sectors as usize)
            .sum()
    }

    /// Size of a serialized image in bytes
    pub fn image_size(&self) -> usize {
        self.sector_count() * BLOCK_SIZE
    }

    /// Sectors on the given 1-based track number, if it exists
    pub fn sectors_in_track(&self, track: u8) -> Option<u8> {
        if track == 0 {
            return None;
        }
        let mut remaining = track;
        for zone in &self.zones {
            if remaining <= zone.tracks {
                return Some(zone.sectors);
            }
            remaining -= zone.tracks;
        }
        None
    }

    /// Whether this layout spreads its zone list over two disk sides
    pub fn is_double_sided(&self) -> bool {
        self.track_count() == 70
    }

    /// DOS version byte: the last character of the DOS type code,
    /// upper-cased
    pub fn dos_version(&self) -> u8 {
        self.dos_type.as_bytes()[self.dos_type.len() - 1].to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d64_geometry() {
        let layout = Layout::d64();
        assert_eq!(layout.track_count(), 35);
        assert_eq!(layout.sector_count(), 683);
        assert_eq!(layout.image_size(), 174_848);
        assert_eq!(layout.directory_tracks, vec![18]);
        assert_eq!(layout.interleave, 10);
        assert_eq!(layout.directory_interleave, 3);
        assert!(!layout.is_double_sided());
    }

    #[test]
    fn test_d71_geometry() {
        let layout = Layout::d71();
        assert_eq!(layout.track_count(), 70);
        assert_eq!(layout.sector_count(), 1366);
        assert_eq!(layout.image_size(), 349_696);
        assert_eq!(layout.directory_tracks, vec![18, 53]);
        assert!(layout.is_double_sided());
    }

    #[test]
    fn test_d81_geometry() {
        let layout = Layout::d81();
        assert_eq!(layout.track_count(), 80);
        assert_eq!(layout.sector_count(), 3200);
        assert_eq!(layout.image_size(), 819_200);
        assert_eq!(layout.directory_tracks, vec![40]);
        assert_eq!(layout.interleave, 1);
        assert_eq!(layout.directory_interleave, 1);
        assert!(!layout.is_double_sided());
    }

    #[test]
    fn test_sectors_in_track() {
        let layout = Layout::d64();
        assert_eq!(layout.sectors_in_track(1), Some(21));
        assert_eq!(layout.sectors_in_track(17), Some(21));
        assert_eq!(layout.sectors_in_track(18), Some(19));
        assert_eq!(layout.sectors_in_track(25), Some(18));
        assert_eq!(layout.sectors_in_track(31), Some(17));
        assert_eq!(layout.sectors_in_track(35), Some(17));
        assert_eq!(layout.sectors_in_track(0), None);
        assert_eq!(layout.sectors_in_track(36), None);

        let layout = Layout::d71();
        assert_eq!(layout.sectors_in_track(36), Some(21));
        assert_eq!(layout.sectors_in_track(53), Some(19));
        assert_eq!(layout.sectors_in_track(70), Some(17));
    }

    #[test]
    fn test_dos_version() {
        assert_eq!(Layout::d64().dos_version(), b'A');
        assert_eq!(Layout::d71().dos_version(), b'A');
        assert_eq!(Layout::d81().dos_version(), b'D');
    }
}
