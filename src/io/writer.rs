/// Disk image file writer

use crate::error::Result;
use crate::image::DiskImage;
use std::fs::File;
use std::path::Path;

/// Finalize a disk image and write it to a file
///
/// Consumes the image; the finalize passes run exactly once.
pub fn write_image<P: AsRef<Path>>(image: DiskImage, path: P) -> Result<()> {
    let mut file = File::create(path)?;
    image.output(&mut file)
}
