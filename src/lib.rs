pub mod config;
pub mod error;
pub mod integrity;
pub mod parser;
pub mod storage;
pub mod system;
pub mod transform;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

pub use error::{AnnixError, AnnixResult};
pub use integrity::{Integrity, SyncState};
pub use parser::Document;
pub use transform::{AddStatus, RemoveOptions, RemoveStatus, Report};

use system::{PackageSearch, Rebuilder, SearchHit};

/// Result of a `sync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub state: SyncState,
    /// Whether the rebuild collaborator was invoked
    pub applied: bool,
    pub hash: String,
}

/// Snapshot reported by `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub path: PathBuf,
    pub state: SyncState,
    pub integrity: Integrity,
    pub active: usize,
    pub disabled: usize,
    pub code_lines: usize,
}

/// One package file plus the settings for editing it.
///
/// Every operation reads the file fresh, works on an in-memory
/// [`Document`] and, when something changed, writes it back whole.
#[derive(Debug, Clone)]
pub struct Annix {
    config: config::Config,
    file: storage::PackageFile,
    quiet: bool,
}

impl Annix {
    pub fn new(config: config::Config) -> Self {
        let file = storage::PackageFile::new(&config.data.file);
        Self {
            config,
            file,
            quiet: false,
        }
    }

    /// Default settings pointed at `path`
    pub fn open(path: impl AsRef<Path>) -> Self {
        let mut config = config::Config::default();
        config.data.file = path.as_ref().to_path_buf();
        Self::new(config)
    }

    /// Stop logging parse diagnostics
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn load(&self) -> AnnixResult<Document> {
        let doc = self.file.load()?;
        if !self.quiet {
            for diagnostic in doc.diagnostics() {
                warn!("{}: {}", self.file.path().display(), diagnostic);
            }
        }
        Ok(doc)
    }

    pub fn status(&self) -> AnnixResult<Status> {
        let doc = self.load()?;
        let integrity = Integrity::of(&doc);
        let code_lines = doc
            .lines()
            .iter()
            .filter(|l| matches!(l.kind(), parser::LineKind::Code(_)))
            .count();

        Ok(Status {
            path: self.file.path().to_path_buf(),
            state: integrity.state(),
            active: doc.active_packages().len(),
            disabled: doc.disabled_packages().len(),
            code_lines,
            integrity,
        })
    }

    /// Active package names in file order
    pub fn list(&self) -> AnnixResult<Vec<String>> {
        let doc = self.load()?;
        Ok(doc.active_packages().into_iter().map(str::to_string).collect())
    }

    pub fn add<S: AsRef<str>>(&self, names: &[S]) -> AnnixResult<Report<AddStatus>> {
        let mut doc = self.load()?;
        let report = transform::add(&mut doc, names, &self.config.data.indent)?;
        if report.changed() {
            self.file.store(&doc)?;
        }
        Ok(report)
    }

    pub fn remove<S: AsRef<str>>(
        &self,
        names: &[S],
        options: RemoveOptions,
    ) -> AnnixResult<Report<RemoveStatus>> {
        let mut doc = self.load()?;
        let report = transform::remove(&mut doc, names, options)?;
        if report.changed() {
            self.file.store(&doc)?;
        }
        Ok(report)
    }

    /// Delete all disabled entries, returning how many went away
    pub fn clean(&self) -> AnnixResult<usize> {
        let mut doc = self.load()?;
        let removed = transform::clean(&mut doc);
        if removed > 0 {
            self.file.store(&doc)?;
        }
        Ok(removed)
    }

    /// Bring the system in line with the file.
    ///
    /// Rebuilds when the file is stale or `force` is set. The new hash is
    /// written only after `rebuilder` reports success; on failure the file
    /// is left exactly as it was and the error is returned.
    pub fn sync(&self, force: bool, rebuilder: &dyn Rebuilder) -> AnnixResult<SyncOutcome> {
        let mut doc = self.load()?;
        let integrity = Integrity::of(&doc);

        if integrity.state() == SyncState::Synced && !force {
            info!("System already matches {}", self.file.path().display());
            return Ok(SyncOutcome {
                state: SyncState::Synced,
                applied: false,
                hash: integrity.computed,
            });
        }

        rebuilder.apply(&doc.render())?;

        if integrity.state() == SyncState::Stale {
            integrity::stamp(&mut doc, &integrity.computed);
            self.file.store(&doc)?;
        }
        info!(hash = %integrity.computed, "System rebuilt, hash updated");

        Ok(SyncOutcome {
            state: SyncState::Synced,
            applied: true,
            hash: integrity.computed,
        })
    }

    pub fn search(&self, query: &str, searcher: &dyn PackageSearch) -> AnnixResult<Vec<SearchHit>> {
        searcher.search(query)
    }

    /// Copy the file verbatim to `<stem>_<label>.<ext>`
    pub fn save(&self, label: &str, overwrite: bool) -> AnnixResult<PathBuf> {
        self.file.save_copy(label, overwrite)
    }

    pub fn backup_path(&self, label: &str) -> AnnixResult<PathBuf> {
        self.file.backup_path(label)
    }
}
