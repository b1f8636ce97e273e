pub mod settings;

pub use settings::Config;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    /// The package list being managed
    pub file: PathBuf,
    /// Command that applies the configuration to the system
    pub rebuild_command: Vec<String>,
    /// Command queried by `search`; the query terms are appended
    pub search_command: Vec<String>,
    /// Rebuild right after `add`/`rm` change the file
    pub auto_sync: bool,
    /// Indentation for new package lines when there is no addhere marker
    pub indent: String,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/etc/nixos/an.nix"),
            rebuild_command: vec!["nixos-rebuild".to_string(), "switch".to_string()],
            search_command: vec![
                "nix".to_string(),
                "search".to_string(),
                "--json".to_string(),
                "nixpkgs".to_string(),
            ],
            auto_sync: true,
            indent: "  ".to_string(),
        }
    }
}
