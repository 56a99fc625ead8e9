//! File System Port
//!
//! The synchronizer talks to disk only through [`FileSystem`], so unit tests
//! can run it against the in-memory [`MockFileSystem`].

use crate::error::{ScaffoldError, ScaffoldResult};
use std::io::Write;
use std::path::Path;

/// Default permission bits for generated files
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String>;

    /// Write file content atomically, creating parent directories
    fn write_atomic(&self, path: &Path, content: &str) -> ScaffoldResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;
}

/// Local disk implementation
///
/// Writes go to a temporary file in the target directory which is then
/// renamed over the target, so readers never observe a half-written file.
#[derive(Debug, Clone, Copy)]
pub struct LocalFs {
    mode: u32,
}

impl LocalFs {
    pub fn new() -> Self {
        Self::with_mode(DEFAULT_FILE_MODE)
    }

    /// Use `mode` as the Unix permission bits of written files.
    pub fn with_mode(mode: u32) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String> {
        std::fs::read_to_string(path).map_err(|source| ScaffoldError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let write_err = |source: std::io::Error| ScaffoldError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(self.mode))
                .map_err(write_err)?;
        }

        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<
        std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, String>>,
    >,
    /// Every path written, in order
    pub writes: std::sync::Arc<std::sync::Mutex<Vec<std::path::PathBuf>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<std::path::PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| ScaffoldError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        self.writes.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}
