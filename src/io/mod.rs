/// I/O operations for writing disk image files

/// Image file writer
pub mod writer;

pub use writer::write_image;
