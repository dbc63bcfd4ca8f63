//! Asset loaders for program sources.
//!
//! - [`MemoryAssets`] keeps sources in a map, for tests and scratch programs
//! - [`DirectoryAssets`] reads `<root>/<name>.<extension>` files
//!
//! Both ignore coordinates: asset names are unique per store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use carlo_engine::{AssetLoader, AssetLoaderFactory, Coordinates};
use carlo_foundation::{Error, Result};

/// File extension of program sources in a [`DirectoryAssets`] store.
pub const PROGRAM_EXTENSION: &str = "carlo";

// =============================================================================
// In-memory assets
// =============================================================================

/// Program sources held in memory.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    sources: RefCell<HashMap<String, String>>,
}

impl MemoryAssets {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a source.
    #[must_use]
    pub fn with(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    /// Adds or replaces a source.
    pub fn insert(&self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.borrow_mut().insert(name.into(), source.into());
    }

    /// Returns true if a source called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.borrow().contains_key(name)
    }
}

struct SourceLoader<'a> {
    assets: &'a MemoryAssets,
    name: String,
    data: Option<Vec<u8>>,
}

impl AssetLoader for SourceLoader<'_> {
    fn open(&mut self) -> Result<()> {
        let sources = self.assets.sources.borrow();
        let source = sources
            .get(&self.name)
            .ok_or_else(|| Error::asset_not_found(&self.name))?;
        self.data = Some(source.as_bytes().to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], offset: usize) -> Result<usize> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| Error::io(format!("asset '{}' is not open", self.name)))?;
        if offset >= data.len() {
            return Ok(0);
        }
        let end = (offset + buf.len()).min(data.len());
        buf[..end - offset].copy_from_slice(&data[offset..end]);
        Ok(end - offset)
    }

    fn size(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    fn close(&mut self) -> Result<()> {
        self.data = None;
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        self.data = None;
        self.assets
            .sources
            .borrow_mut()
            .remove(&self.name)
            .map(|_| ())
            .ok_or_else(|| Error::asset_not_found(&self.name))
    }
}

impl AssetLoaderFactory for MemoryAssets {
    fn make_loader<'a>(&'a self, _coordinates: &Coordinates, name: &str) -> Box<dyn AssetLoader + 'a> {
        Box::new(SourceLoader {
            assets: self,
            name: name.to_string(),
            data: None,
        })
    }
}

// =============================================================================
// Directory assets
// =============================================================================

/// Program sources stored as files in one directory.
#[derive(Clone, Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
    extension: String,
}

impl DirectoryAssets {
    /// Creates a store over `root` using the default extension.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: PROGRAM_EXTENSION.to_string(),
        }
    }

    /// Builder method to set the file extension (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the directory sources are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file that holds asset `name`.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{}", self.extension))
    }

    /// Writes the source of asset `name`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an I/O error if the directory or file cannot be written.
    pub fn store(&self, name: &str, source: &str) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            Error::io(format!(
                "failed to create directory '{}': {e}",
                self.root.display()
            ))
        })?;
        let path = self.path_of(name);
        fs::write(&path, source)
            .map_err(|e| Error::io(format!("failed to write file '{}': {e}", path.display())))
    }
}

struct FileLoader {
    path: PathBuf,
    name: String,
    file: Option<File>,
    size: usize,
}

impl AssetLoader for FileLoader {
    fn open(&mut self) -> Result<()> {
        let metadata = fs::metadata(&self.path).map_err(|_| Error::asset_not_found(&self.name))?;
        if !metadata.is_file() {
            return Err(Error::asset_not_found(&self.name));
        }
        let file = File::open(&self.path).map_err(|e| {
            Error::io(format!("failed to open file '{}': {e}", self.path.display()))
        })?;
        self.size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        self.file = Some(file);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], offset: usize) -> Result<usize> {
        let path = &self.path;
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::io(format!("file '{}' is not open", path.display())))?;
        if offset >= self.size {
            return Ok(0);
        }
        let want = buf.len().min(self.size - offset);
        file.seek(SeekFrom::Start(offset as u64))
            .map_err(|e| Error::io(format!("failed to seek in '{}': {e}", path.display())))?;
        file.read(&mut buf[..want])
            .map_err(|e| Error::io(format!("failed to read file '{}': {e}", path.display())))
    }

    fn size(&self) -> usize {
        if self.file.is_some() { self.size } else { 0 }
    }

    fn close(&mut self) -> Result<()> {
        self.file = None;
        self.size = 0;
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        self.close()?;
        fs::remove_file(&self.path).map_err(|e| {
            Error::io(format!("failed to remove file '{}': {e}", self.path.display()))
        })
    }
}

impl AssetLoaderFactory for DirectoryAssets {
    fn make_loader<'a>(&'a self, _coordinates: &Coordinates, name: &str) -> Box<dyn AssetLoader + 'a> {
        Box::new(FileLoader {
            path: self.path_of(name),
            name: name.to_string(),
            file: None,
            size: 0,
        })
    }
}
