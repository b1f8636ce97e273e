//! External collaborators: the system rebuild and the package search index.
//!
//! Both are reached through one-method traits so the engine never knows
//! which process (if any) sits behind them.

pub mod process;

pub use process::{CommandRebuilder, NixSearch};

use serde::Serialize;

use crate::error::{AnnixResult, ApplyError};

/// Applies the package file to the running system
pub trait Rebuilder {
    /// Blocks until the rebuild finishes. `Ok` is the only signal that lets
    /// the file's hash advance.
    fn apply(&self, content: &str) -> Result<(), ApplyError>;
}

/// Looks packages up in the package index
pub trait PackageSearch {
    fn search(&self, query: &str) -> AnnixResult<Vec<SearchHit>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Attribute path in the package set
    pub attribute: String,
    pub name: String,
    pub version: String,
    pub description: String,
}
