/// Disk format catalog and file types

/// Block and directory geometry constants
pub mod constants;
/// Geometry layouts and presets
pub mod layout;

pub use constants::*;
pub use layout::{Layout, Zone};

use crate::error::{DiskError, Result};

/// Supported disk image formats
///
/// The catalog is closed: a format is selected by key once and carries
/// a validated `Layout`, there is no ad-hoc geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskFormat {
    /// 35-track single-sided image (1541)
    D64,
    /// 70-track double-sided image (1571)
    D71,
    /// 80-track flat image (1581)
    D81,
}

impl DiskFormat {
    /// Look up a format by its key (the image file extension,
    /// lower-case, without the dot)
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "d64" => Ok(DiskFormat::D64),
            "d71" => Ok(DiskFormat::D71),
            "d81" => Ok(DiskFormat::D81),
            _ => Err(DiskError::UnknownFormat(key.to_string())),
        }
    }

    /// Get the format key
    pub fn key(&self) -> &'static str {
        match self {
            DiskFormat::D64 => "d64",
            DiskFormat::D71 => "d71",
            DiskFormat::D81 => "d81",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            DiskFormat::D64 => "1541 disk image",
            DiskFormat::D71 => "1571 disk image",
            DiskFormat::D81 => "1581 disk image",
        }
    }

    /// Get the geometry layout for this format
    pub fn layout(&self) -> Layout {
        match self {
            DiskFormat::D64 => Layout::d64(),
            DiskFormat::D71 => Layout::d71(),
            DiskFormat::D81 => Layout::d81(),
        }
    }
}

/// CBM DOS file types as stored in directory entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Deleted file placeholder
    Del,
    /// Sequential file
    Seq,
    /// Program file
    Prg,
    /// User file
    Usr,
}

impl FileType {
    /// Look up a file type by its key
    pub fn from_key(key: &str) -> Result<Self> {
        match key {
            "del" => Ok(FileType::Del),
            "seq" => Ok(FileType::Seq),
            "prg" => Ok(FileType::Prg),
            "usr" => Ok(FileType::Usr),
            _ => Err(DiskError::UnknownFileType(key.to_string())),
        }
    }

    /// Get the file type key
    pub fn key(&self) -> &'static str {
        match self {
            FileType::Del => "del",
            FileType::Seq => "seq",
            FileType::Prg => "prg",
            FileType::Usr => "usr",
        }
    }

    /// Directory entry type byte (closed-file bit included)
    pub fn type_byte(&self) -> u8 {
        match self {
            FileType::Del => 0x80,
            FileType::Seq => 0x81,
            FileType::Prg => 0x82,
            FileType::Usr => 0x84,
        }
    }
}

impl Default for FileType {
    fn default() -> Self {
        FileType::Prg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lookup() {
        assert_eq!(DiskFormat::from_key("d64").unwrap(), DiskFormat::D64);
        assert_eq!(DiskFormat::from_key("d71").unwrap(), DiskFormat::D71);
        assert_eq!(DiskFormat::from_key("d81").unwrap(), DiskFormat::D81);

        let result = DiskFormat::from_key("dsk");
        assert!(matches!(result, Err(DiskError::UnknownFormat(_))));
    }

    #[test]
    fn test_format_keys_round_trip() {
        for format in [DiskFormat::D64, DiskFormat::D71, DiskFormat::D81] {
            assert_eq!(DiskFormat::from_key(format.key()).unwrap(), format);
        }
    }

    #[test]
    fn test_format_layouts() {
        assert_eq!(DiskFormat::D64.layout().track_count(), 35);
        assert_eq!(DiskFormat::D71.layout().track_count(), 70);
        assert_eq!(DiskFormat::D81.layout().track_count(), 80);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(DiskFormat::D64.name(), "1541 disk image");
        assert_eq!(DiskFormat::D71.name(), "1571 disk image");
        assert_eq!(DiskFormat::D81.name(), "1581 disk image");
    }

    #[test]
    fn test_file_type_bytes() {
        assert_eq!(FileType::Del.type_byte(), 0x80);
        assert_eq!(FileType::Seq.type_byte(), 0x81);
        assert_eq!(FileType::Prg.type_byte(), 0x82);
        assert_eq!(FileType::Usr.type_byte(), 0x84);
    }

    #[test]
    fn test_file_type_lookup() {
        assert_eq!(FileType::from_key("prg").unwrap(), FileType::Prg);
        assert_eq!(FileType::from_key("rel").unwrap_err().to_string(),
            "Unknown file type 'rel'");
        assert_eq!(FileType::default(), FileType::Prg);
        assert_eq!(FileType::Usr.key(), "usr");
    }
}
