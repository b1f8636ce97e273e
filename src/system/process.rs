use std::collections::BTreeMap;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, info};

use super::{PackageSearch, Rebuilder, SearchHit};
use crate::error::{AnnixError, AnnixResult, ApplyError};

/// Runs the configured rebuild command with the terminal attached, so its
/// progress output reaches the user. The command reads the configuration
/// from disk; `content` is only logged.
#[derive(Debug, Clone)]
pub struct CommandRebuilder {
    argv: Vec<String>,
}

impl CommandRebuilder {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl Rebuilder for CommandRebuilder {
    fn apply(&self, content: &str) -> Result<(), ApplyError> {
        let (program, args) = self.argv.split_first().ok_or(ApplyError::NoCommand)?;
        let command = shell_words::join(&self.argv);
        info!(command = %command, bytes = content.len(), "Running system rebuild");

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| ApplyError::Spawn {
                command: command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ApplyError::Failed {
                command,
                status: status.to_string(),
            })
        }
    }
}

/// Queries `nix search --json` (or whatever the configured command is) and
/// parses its JSON output.
#[derive(Debug, Clone)]
pub struct NixSearch {
    argv: Vec<String>,
}

impl NixSearch {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl PackageSearch for NixSearch {
    fn search(&self, query: &str) -> AnnixResult<Vec<SearchHit>> {
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| AnnixError::Search("No search command configured".to_string()))?;

        debug!(program = %program, query = %query, "Searching packages");
        let output = Command::new(program)
            .args(args)
            .args(&terms)
            .output()
            .map_err(|e| AnnixError::Search(format!("Failed to start `{}`: {}", program, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // nix exits non-zero when nothing matches
            if stderr.contains("no results") {
                return Ok(Vec::new());
            }
            return Err(AnnixError::Search(format!(
                "`{}` exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        parse_search_output(&stdout)
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(default)]
    pname: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: String,
}

/// Parse the `{ "<attr path>": { pname, version, description } }` object
/// printed by `nix search --json`.
pub fn parse_search_output(json: &str) -> AnnixResult<Vec<SearchHit>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: BTreeMap<String, RawHit> = serde_json::from_str(json)
        .map_err(|e| AnnixError::Search(format!("Unexpected search output: {}", e)))?;

    Ok(raw
        .into_iter()
        .map(|(key, hit)| {
            let attribute = attribute_name(&key).to_string();
            SearchHit {
                name: if hit.pname.is_empty() {
                    attribute.clone()
                } else {
                    hit.pname
                },
                attribute,
                version: hit.version,
                description: hit.description.trim().to_string(),
            }
        })
        .collect())
}

/// `legacyPackages.x86_64-linux.ripgrep` -> `ripgrep`
fn attribute_name(key: &str) -> &str {
    match key.strip_prefix("legacyPackages.") {
        Some(rest) => rest.split_once('.').map_or(rest, |(_, attr)| attr),
        None => key,
    }
}
