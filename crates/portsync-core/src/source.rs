//! File-backed forwarded port source.
//!
//! Gluetun (and similar sidecars) can write the forwarded port to a shared
//! volume; this source reads it on every cycle.

use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::service::PortSource;

/// Errors raised while reading a forwarded port file.
#[derive(Debug, Error)]
pub enum FilePortError {
    /// The file could not be opened.
    #[error("unable to open forwarded port file '{}'", .path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The file was opened but could not be read.
    #[error("unable to read forwarded port file '{}'", .path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The trimmed file contents were not a decimal integer.
    #[error("invalid forwarded port '{contents}' in file '{}'", .path.display())]
    Parse {
        /// Path whose contents were invalid.
        path: PathBuf,
        /// Trimmed file contents.
        contents: String,
        /// Underlying parse error.
        source: ParseIntError,
    },
}

/// Reads the forwarded port from a plain-text file.
#[derive(Debug, Clone)]
pub struct FilePortSource {
    path: PathBuf,
}

impl FilePortSource {
    /// Create a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, or if its
    /// trimmed contents are not an integer.
    pub async fn read_port(&self) -> Result<i64, FilePortError> {
        let mut file =
            tokio::fs::File::open(&self.path)
                .await
                .map_err(|source| FilePortError::Open {
                    path: self.path.clone(),
                    source,
                })?;

        let mut raw = String::new();
        file.read_to_string(&mut raw)
            .await
            .map_err(|source| FilePortError::Read {
                path: self.path.clone(),
                source,
            })?;

        let contents = raw.trim();
        let port = contents
            .parse::<i64>()
            .map_err(|source| FilePortError::Parse {
                path: self.path.clone(),
                contents: contents.to_string(),
                source,
            })?;
        debug!(path = %self.path.display(), port, "read forwarded port file");
        Ok(port)
    }
}

#[async_trait]
impl PortSource for FilePortSource {
    fn describe(&self) -> String {
        format!("file '{}'", self.path.display())
    }

    async fn forwarded_port(&self) -> anyhow::Result<i64> {
        Ok(self.read_port().await?)
    }
}
