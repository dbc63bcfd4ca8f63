//! Program assets.
//!
//! Programs are read from an [`AssetLoader`] made by an
//! [`AssetLoaderFactory`] for a place in the world. Reading is bounded:
//! [`read_line`] never asks for more than a chunk of bytes at once.

use carlo_foundation::Result;

/// Default number of bytes [`read_line`] asks for per read.
pub const DEFAULT_READ_CHUNK: usize = 256;

/// Where in the world an asset lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coordinates {
    /// World number.
    pub world: u32,
    /// East-west position.
    pub x: i32,
    /// North-south position.
    pub y: i32,
}

impl Coordinates {
    /// Creates coordinates.
    #[must_use]
    pub const fn new(world: u32, x: i32, y: i32) -> Self {
        Self { world, x, y }
    }
}

/// Random-access reader for one named asset.
pub trait AssetLoader {
    /// Opens the asset for reading.
    ///
    /// # Errors
    /// Returns an error if the asset does not exist or cannot be opened.
    fn open(&mut self) -> Result<()>;

    /// Reads up to `buf.len()` bytes starting at `offset`. Returns the
    /// number of bytes read.
    ///
    /// # Errors
    /// Returns an error if the asset is not open or the read fails.
    fn read(&mut self, buf: &mut [u8], offset: usize) -> Result<usize>;

    /// Returns the asset's size in bytes, or zero if it is not open.
    fn size(&self) -> usize;

    /// Closes the asset.
    ///
    /// # Errors
    /// Returns an error if closing fails.
    fn close(&mut self) -> Result<()>;

    /// Deletes the asset from its store.
    ///
    /// # Errors
    /// Returns an error if the asset cannot be deleted.
    fn erase(&mut self) -> Result<()>;
}

/// Makes loaders for named assets.
pub trait AssetLoaderFactory {
    /// Returns a loader for asset `name` at `coordinates`. The loader is not
    /// opened.
    fn make_loader<'a>(&'a self, coordinates: &Coordinates, name: &str)
    -> Box<dyn AssetLoader + 'a>;
}

/// Reads one line starting at `offset`, advancing `offset` past it and its
/// newline.
///
/// Reads go through `buf`, so no single read asks for more than its
/// length. The newline is not included. Invalid UTF-8 is replaced rather
/// than rejected. Returns `None` at end of input (an empty last line counts
/// as end of input) or when a read fails or returns nothing.
pub fn read_line(loader: &mut dyn AssetLoader, offset: &mut usize, buf: &mut [u8]) -> Option<String> {
    let size = loader.size();
    let mut line = Vec::new();
    let mut newline = false;

    while !newline && *offset < size && !buf.is_empty() {
        let want = buf.len().min(size - *offset);
        let read = match loader.read(&mut buf[..want], *offset) {
            Ok(0) => {
                tracing::debug!(offset = *offset, "asset read returned nothing");
                return None;
            }
            Ok(read) => read.min(want),
            Err(error) => {
                tracing::debug!(%error, offset = *offset, "asset read failed");
                return None;
            }
        };

        let chunk = &buf[..read];
        match chunk.iter().position(|&byte| byte == b'\n') {
            Some(end) => {
                line.extend_from_slice(&chunk[..end]);
                *offset += end + 1;
                newline = true;
            }
            None => {
                line.extend_from_slice(chunk);
                *offset += read;
            }
        }
    }

    if line.is_empty() && *offset >= size {
        return None;
    }
    Some(String::from_utf8_lossy(&line).into_owned())
}
