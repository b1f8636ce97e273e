use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AnnixError, AnnixResult, ErrorContext};

/// Whole-file writes that either land completely or not at all
pub struct AtomicFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl AtomicFile {
    pub fn new<P: AsRef<Path>>(path: P) -> AnnixResult<Self> {
        let path = path.as_ref().to_path_buf();
        let temp_path = Self::temp_path(&path)?;

        Ok(Self { path, temp_path })
    }

    /// Sibling temp file, so the final rename stays on one filesystem
    fn temp_path(path: &Path) -> AnnixResult<PathBuf> {
        let file_name = path
            .file_name()
            .ok_or_else(|| AnnixError::InvalidInput(format!("Invalid file path: {}", path.display())))?;

        let temp_name = format!(
            ".{}.tmp.{}",
            file_name.to_string_lossy(),
            std::process::id()
        );

        Ok(path.with_file_name(temp_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to the temp file, fsync, then rename over the target
    pub fn write(&self, content: &[u8]) -> AnnixResult<()> {
        let result = self.write_temp(content).and_then(|()| {
            fs::rename(&self.temp_path, &self.path)
                .with_context(|| format!("Failed to replace {}", self.path.display()))
        });

        if result.is_err() && self.temp_path.exists() {
            let _ = fs::remove_file(&self.temp_path);
        }
        result
    }

    fn write_temp(&self, content: &[u8]) -> AnnixResult<()> {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .with_context(|| format!("Failed to create {}", self.temp_path.display()))?;

        temp_file
            .write_all(content)
            .context("Failed to write to temporary file")?;

        temp_file
            .sync_all()
            .context("Failed to sync temporary file")?;

        // Keep the target's permissions, the package file is often root-owned 0644
        if let Ok(metadata) = fs::metadata(&self.path) {
            fs::set_permissions(&self.temp_path, metadata.permissions())
                .context("Failed to copy file permissions")?;
        }

        Ok(())
    }

    pub fn read(&self) -> AnnixResult<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("Failed to read {}", self.path.display()))
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_read() -> AnnixResult<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("an.nix");

        let atomic_file = AtomicFile::new(&file_path)?;
        assert!(!atomic_file.exists());

        atomic_file.write(b"alacritty\n")?;
        assert!(atomic_file.exists());
        assert_eq!(atomic_file.read()?, b"alacritty\n");

        atomic_file.write(b"bottom\n")?;
        assert_eq!(atomic_file.read()?, b"bottom\n");

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() -> AnnixResult<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("missing-dir").join("an.nix");

        let atomic_file = AtomicFile::new(&file_path)?;
        assert!(atomic_file.write(b"x").is_err());
        assert!(!file_path.exists());
        Ok(())
    }

    #[test]
    fn test_read_missing_file_is_io_error() -> AnnixResult<()> {
        let temp_dir = TempDir::new()?;
        let atomic_file = AtomicFile::new(temp_dir.path().join("nope.nix"))?;

        match atomic_file.read() {
            Err(AnnixError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected IO error, got {:?}", other),
        }
        Ok(())
    }
}
