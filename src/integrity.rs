//! Content hash over the package file and the synced/stale state derived
//! from it.
//!
//! The digest covers active packages and code lines only. Packages are
//! order-insensitive within each run between code lines, so reordering a
//! package list does not force a rebuild, while moving a package across a
//! code line (which may change what it means) does.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::parser::{classify::stamp_hash_line, classify::HASH_PREFIX, Document, LineKind};

/// Length of a stamped digest in hex characters
pub const DIGEST_LEN: usize = 64;

/// Whether the applied system is known to match the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Synced,
    Stale,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Synced => f.write_str("synced"),
            SyncState::Stale => f.write_str("stale"),
        }
    }
}

/// Stored vs. computed digest of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Integrity {
    pub stored: Option<String>,
    pub computed: String,
}

impl Integrity {
    pub fn of(doc: &Document) -> Self {
        Self {
            stored: doc.stored_hash().map(str::to_string),
            computed: compute_hash(doc),
        }
    }

    pub fn state(&self) -> SyncState {
        match &self.stored {
            Some(stored) if *stored == self.computed => SyncState::Synced,
            _ => SyncState::Stale,
        }
    }
}

/// Normalized tokens the digest is computed over
pub fn hash_tokens(doc: &Document) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in doc.lines() {
        match line.kind() {
            LineKind::Package(entry) => run.push(&entry.name),
            LineKind::Code(code) => {
                run.sort_unstable();
                tokens.append(&mut run);
                tokens.push(code.as_str());
            }
            _ => {}
        }
    }
    run.sort_unstable();
    tokens.append(&mut run);

    tokens
}

pub fn compute_hash(doc: &Document) -> String {
    let tokens = hash_tokens(doc);
    let digest = Sha256::digest(tokens.join("\n").as_bytes());
    let hex = format!("{:x}", digest);
    debug!(tokens = tokens.len(), hash = %hex, "Computed content hash");
    hex
}

pub fn sync_state(doc: &Document) -> SyncState {
    Integrity::of(doc).state()
}

/// Write `digest` into the hash marker, creating the marker as the first
/// line when the file has none.
pub fn stamp(doc: &mut Document, digest: &str) {
    match doc.find_hash_marker() {
        Some(idx) => {
            let raw = stamp_hash_line(doc.lines()[idx].raw(), digest);
            doc.replace_line(idx, raw);
        }
        None => doc.insert_line(0, format!("{} {}", HASH_PREFIX, digest)),
    }
}
