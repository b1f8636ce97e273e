//! Structural edits to a [`Document`](crate::parser::Document).
//!
//! Every edit works on the whole in-memory document and touches only the
//! lines it is about; everything else renders exactly as it was read.

pub mod add;
pub mod clean;
pub mod remove;

pub use add::{add, AddStatus};
pub use clean::clean;
pub use remove::{remove, RemoveOptions, RemoveStatus};

use serde::Serialize;

use crate::error::{AnnixError, AnnixResult};
use crate::parser::classify::is_valid_name;

/// Per-name result of a batch edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<S> {
    pub name: String,
    pub status: S,
}

/// Outcomes of a batch edit, in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report<S> {
    pub outcomes: Vec<Outcome<S>>,
}

/// Statuses that say whether the file was modified
pub trait Status {
    fn is_change(&self) -> bool;
}

impl<S: Status + PartialEq> Report<S> {
    pub fn changed(&self) -> bool {
        self.outcomes.iter().any(|o| o.status.is_change())
    }

    pub fn names_with(&self, status: S) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == status)
            .map(|o| o.name.as_str())
            .collect()
    }
}

impl<S> Default for Report<S> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }
}

impl<S> Report<S> {
    fn push(&mut self, name: &str, status: S) {
        self.outcomes.push(Outcome {
            name: name.to_string(),
            status,
        });
    }
}

/// Validate requested names and drop repeats, keeping first occurrences.
pub(crate) fn requested_names<S: AsRef<str>>(names: &[S]) -> AnnixResult<Vec<&str>> {
    let mut unique: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !is_valid_name(name) {
            return Err(AnnixError::InvalidInput(format!(
                "`{}` is not a valid package name",
                name
            )));
        }
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    Ok(unique)
}
