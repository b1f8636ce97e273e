#![allow(dead_code)]

use annix::error::ApplyError;
use annix::system::Rebuilder;
use annix::Annix;
use std::cell::RefCell;
use std::path::PathBuf;
use tempfile::TempDir;

/// Records every rebuild request and answers with a scripted result
pub struct FakeRebuilder {
    succeed: bool,
    pub calls: RefCell<Vec<String>>,
}

impl FakeRebuilder {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Rebuilder for FakeRebuilder {
    fn apply(&self, content: &str) -> Result<(), ApplyError> {
        self.calls.borrow_mut().push(content.to_string());
        if self.succeed {
            Ok(())
        } else {
            Err(ApplyError::Failed {
                command: "fake-rebuild".to_string(),
                status: "exit status: 1".to_string(),
            })
        }
    }
}

/// A package file in a temp dir; keep the `TempDir` alive for the test
pub fn package_file(content: &str) -> (TempDir, PathBuf, Annix) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("an.nix");
    std::fs::write(&path, content).unwrap();
    let annix = Annix::open(&path);
    (temp_dir, path, annix)
}

pub fn read(path: &PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
}
