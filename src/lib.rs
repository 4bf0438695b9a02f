/*!
# cbmimage

A Rust library for building Commodore disk image files (D64/D71/D81)
with byte-exact CBM DOS metadata.

## Features

- Build 1541 (D64), 1571 (D71) and 1581 (D81) images from named byte
  payloads
- Zoned track/sector grid with interleaved block chaining
- CBM DOS directory and BAM encoding matching the legacy on-disk
  formats
- Idiomatic Rust API with comprehensive error handling

## Quick Start

```rust,no_run
use cbmimage::{DiskImage, FileType};

// Create a new D64 image
let mut image = DiskImage::create("d64", b"DEMO", b"01")?;

// Add a program file; the payload is chained through the grid
let program = vec![0x01, 0x08, 0x0B, 0x08, 0x0A, 0x00, 0x9E];
image.add_file(b"HELLO", &program, FileType::Prg)?;

// Read it back by following the chain
let data = image.read_file(b"HELLO")?;
assert_eq!(data, program);

// Finalize and write the image
image.save("demo.d64")?;
# Ok::<(), cbmimage::DiskError>(())
```

## Modules

- `format`: disk format catalog, geometry layouts and file types
- `image`: core image data structures (DiskImage, Track, DirectoryEntry)
- `buffer`: append-only block serialization buffer
- `io`: writing finished images to files
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Append-only block serialization buffer
pub mod buffer;
/// Error types and Result alias
pub mod error;
/// Disk format catalog, geometry layouts and file types
pub mod format;
/// Core image data structures (DiskImage, Track, DirectoryEntry)
pub mod image;
/// I/O operations for writing disk image files
pub mod io;

// Re-export common types
pub use buffer::Buffer;
pub use error::{DiskError, Result};
pub use format::{DiskFormat, FileType, Layout, Zone};
pub use image::{DirectoryEntry, DiskImage, Slot, Track};
