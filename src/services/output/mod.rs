use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name used when no output path is given.
pub const DEFAULT_FILE_NAME: &str = "wallpaper_auto.png";

/// Destination for the finished image.
pub trait OutputSink {
    /// Store `bytes` and report where they went.
    fn write(&self, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes to a fixed path, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `wallpaper_auto.png` in the system temp directory.
    pub fn temp() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write(&self, bytes: &[u8]) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::info!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(self.path.clone())
    }
}
