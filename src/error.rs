use thiserror::Error;

/// Result type alias for disk image operations
pub type Result<T> = std::result::Result<T, DiskError>;

/// Errors that can occur when building disk images
#[derive(Debug, Error)]
pub enum DiskError {
    /// I/O error occurred while writing an image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown disk format key
    #[error("Unknown disk format '{0}'")]
    UnknownFormat(String),

    /// Unknown file type key
    #[error("Unknown file type '{0}'")]
    UnknownFileType(String),

    /// Disk name exceeds 16 bytes
    #[error("Disk name '{name}' is too long (max: {max})")]
    NameTooLong {
        /// The offending name
        name: String,
        /// Maximum allowed length in bytes
        max: usize,
    },

    /// Disk id exceeds 5 bytes
    #[error("Disk id '{id}' is too long (max: {max})")]
    IdTooLong {
        /// The offending id
        id: String,
        /// Maximum allowed length in bytes
        max: usize,
    },

    /// File name exceeds 16 bytes
    #[error("File name '{name}' is too long (max: {max})")]
    FileNameTooLong {
        /// The offending name
        name: String,
        /// Maximum allowed length in bytes
        max: usize,
    },

    /// Invalid track number specified
    #[error("Invalid track {track} (max: {max})")]
    InvalidTrack {
        /// Track number
        track: u8,
        /// Highest valid track number
        max: u8,
    },

    /// Invalid sector number specified
    #[error("Invalid sector {sector} on track {track}")]
    InvalidSector {
        /// Track number
        track: u8,
        /// Sector number
        sector: u8,
    },

    /// Block payload is not exactly one block long
    #[error("Invalid block length {length} (expected: {expected})")]
    InvalidBlockSize {
        /// Supplied payload length
        length: usize,
        /// Required payload length
        expected: usize,
    },

    /// Block already holds data
    #[error("Block {track},{sector} already used")]
    BlockInUse {
        /// Track number
        track: u8,
        /// Sector number
        sector: u8,
    },

    /// Disk is full, no free block for the next chunk
    #[error("Disk full: no free block available")]
    DiskFull,

    /// Directory tracks cannot hold another directory block
    #[error("Directory full: no free directory block available")]
    DirectoryFull,

    /// File not found in the directory
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl DiskError {
    /// Create a name-too-long error from raw name bytes
    pub fn name_too_long(name: &[u8], max: usize) -> Self {
        DiskError::NameTooLong {
            name: String::from_utf8_lossy(name).into_owned(),
            max,
        }
    }

    /// Create an id-too-long error from raw id bytes
    pub fn id_too_long(id: &[u8], max: usize) -> Self {
        DiskError::IdTooLong {
            id: String::from_utf8_lossy(id).into_owned(),
            max,
        }
    }

    /// Create a file-name-too-long error from raw name bytes
    pub fn file_name_too_long(name: &[u8], max: usize) -> Self {
        DiskError::FileNameTooLong {
            name: String::from_utf8_lossy(name).into_owned(),
            max,
        }
    }

    /// Create a file-not-found error from raw name bytes
    pub fn file_not_found(name: &[u8]) -> Self {
        DiskError::FileNotFound(String::from_utf8_lossy(name).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiskError::InvalidTrack { track: 36, max: 35 };
        assert_eq!(err.to_string(), "Invalid track 36 (max: 35)");

        let err = DiskError::BlockInUse {
            track: 18,
            sector: 0,
        };
        assert_eq!(err.to_string(), "Block 18,0 already used");
    }

    #[test]
    fn test_name_errors() {
        let err = DiskError::name_too_long(b"SEVENTEEN CHARS !", 16);
        assert_eq!(
            err.to_string(),
            "Disk name 'SEVENTEEN CHARS !' is too long (max: 16)"
        );

        let err = DiskError::file_not_found(b"MISSING");
        assert_eq!(err.to_string(), "File not found: MISSING");
    }

    #[test]
    fn test_unknown_format() {
        let err = DiskError::UnknownFormat("d42".to_string());
        assert_eq!(err.to_string(), "Unknown disk format 'd42'");
    }
}
