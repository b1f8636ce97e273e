use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::atomic::AtomicFile;
use crate::error::{AnnixError, AnnixResult};
use crate::parser::Document;

/// The package list on disk
#[derive(Debug, Clone)]
pub struct PackageFile {
    path: PathBuf,
}

impl PackageFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> AnnixResult<String> {
        let bytes = AtomicFile::new(&self.path)?.read()?;
        String::from_utf8(bytes).map_err(|e| {
            AnnixError::InvalidInput(format!("{} is not valid UTF-8: {}", self.path.display(), e))
        })
    }

    pub fn write(&self, content: &str) -> AnnixResult<()> {
        AtomicFile::new(&self.path)?.write(content.as_bytes())?;
        debug!(path = %self.path.display(), bytes = content.len(), "Wrote package file");
        Ok(())
    }

    pub fn load(&self) -> AnnixResult<Document> {
        let text = self.read()?;
        Ok(Document::parse(&text)?)
    }

    pub fn store(&self, doc: &Document) -> AnnixResult<()> {
        self.write(&doc.render())
    }

    /// `<stem>_<label><.ext>` next to the package file
    pub fn backup_path(&self, label: &str) -> AnnixResult<PathBuf> {
        let label: String = label.split_whitespace().collect();
        if label.is_empty() {
            return Err(AnnixError::InvalidInput("Backup name must not be empty".to_string()));
        }
        if label.contains(std::path::is_separator) {
            return Err(AnnixError::InvalidInput(format!(
                "Backup name `{}` must not contain path separators",
                label
            )));
        }

        let stem = self
            .path
            .file_stem()
            .ok_or_else(|| AnnixError::InvalidInput(format!("Invalid file path: {}", self.path.display())))?
            .to_string_lossy();
        let name = match self.path.extension() {
            Some(ext) => format!("{}_{}.{}", stem, label, ext.to_string_lossy()),
            None => format!("{}_{}", stem, label),
        };

        Ok(self.path.with_file_name(name))
    }

    /// Copy the file verbatim to its backup name
    pub fn save_copy(&self, label: &str, overwrite: bool) -> AnnixResult<PathBuf> {
        let target = self.backup_path(label)?;
        if target.exists() && !overwrite {
            return Err(AnnixError::AlreadyExists { path: target });
        }

        let content = AtomicFile::new(&self.path)?.read()?;
        AtomicFile::new(&target)?.write(&content)?;
        info!(from = %self.path.display(), to = %target.display(), "Saved package file copy");

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path() -> AnnixResult<()> {
        let file = PackageFile::new("/etc/nixos/an.nix");
        assert_eq!(file.backup_path("work")?, PathBuf::from("/etc/nixos/an_work.nix"));
        assert_eq!(file.backup_path(" my laptop ")?, PathBuf::from("/etc/nixos/an_mylaptop.nix"));
        assert!(file.backup_path("   ").is_err());
        assert!(file.backup_path("../x").is_err());

        let bare = PackageFile::new("/tmp/packages");
        assert_eq!(bare.backup_path("old")?, PathBuf::from("/tmp/packages_old"));
        Ok(())
    }

    #[test]
    fn test_save_copy_is_verbatim_and_guarded() -> AnnixResult<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("an.nix");
        std::fs::write(&path, "#@# \n  alacritty\r\n")?;
        let file = PackageFile::new(&path);

        let saved = file.save_copy("v1", false)?;
        assert_eq!(std::fs::read_to_string(&saved)?, "#@# \n  alacritty\r\n");

        assert!(matches!(
            file.save_copy("v1", false),
            Err(AnnixError::AlreadyExists { .. })
        ));
        assert!(file.save_copy("v1", true).is_ok());
        Ok(())
    }

    #[test]
    fn test_store_round_trips() -> AnnixResult<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("an.nix");
        std::fs::write(&path, "foo\n# note\n")?;
        let file = PackageFile::new(&path);

        let doc = file.load()?;
        file.store(&doc)?;
        assert_eq!(std::fs::read_to_string(&path)?, "foo\n# note\n");
        Ok(())
    }
}
