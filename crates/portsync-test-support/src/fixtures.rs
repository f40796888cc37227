//! Temporary file fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A file inside a private temporary directory, removed on drop.
#[derive(Debug)]
pub struct TempFile {
    _dir: TempDir,
    path: PathBuf,
}

impl TempFile {
    /// Create `name` with `contents` in a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn with_contents(name: &str, contents: &str) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(Self { _dir: dir, path })
    }

    /// A path in a fresh temporary directory that does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn missing(name: &str) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join(name);
        Ok(Self { _dir: dir, path })
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Port file as written by a VPN container's port-forwarding hook.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn port_file(port: &str) -> anyhow::Result<TempFile> {
    TempFile::with_contents("forwarded_port", port)
}
