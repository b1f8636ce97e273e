pub mod classify;
pub mod render;
pub mod types;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{Marker, ParseError};
pub use classify::classify;
pub use types::{Diagnostic, Issue, Line, LineEnding, LineKind, PackageEntry};

/// Where `add` puts new packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPoint {
    /// Index of the addhere marker, or the line count when there is none
    pub index: usize,
    pub prepend: bool,
    pub marker: bool,
}

/// A package line as reported by `ls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRef {
    pub name: String,
    /// 1-based line number
    pub line: usize,
    pub comment: String,
}

/// The package file as an ordered sequence of classified lines.
///
/// Built fresh from text for every command; nothing about it outlives the
/// invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Parse file text. Fails only when a control marker appears twice.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = Vec::new();
        let mut diagnostics = Vec::new();
        let mut hash_at: Option<usize> = None;
        let mut addhere_at: Option<usize> = None;
        let mut seen = HashSet::new();

        for (idx, (raw, ending)) in split_lines(text).enumerate() {
            let (kind, issues) = classify(raw);
            diagnostics.extend(issues.into_iter().map(|issue| Diagnostic {
                line: idx + 1,
                issue,
            }));

            let marker_slot = match &kind {
                LineKind::HashMarker(_) => Some((&mut hash_at, Marker::Hash)),
                LineKind::AddHere { .. } => Some((&mut addhere_at, Marker::AddHere)),
                _ => None,
            };
            if let Some((slot, marker)) = marker_slot {
                if let Some(first) = *slot {
                    return Err(ParseError::DuplicateMarker {
                        marker,
                        first: first + 1,
                        second: idx + 1,
                    });
                }
                *slot = Some(idx);
            }

            if let LineKind::Package(entry) | LineKind::DisabledPackage(entry) = &kind {
                if !seen.insert(entry.name.clone()) {
                    diagnostics.push(Diagnostic {
                        line: idx + 1,
                        issue: Issue::DuplicatePackage(entry.name.clone()),
                    });
                }
            }

            lines.push(Line::from_parts(raw.to_string(), ending, kind));
        }

        debug!(
            lines = lines.len(),
            diagnostics = diagnostics.len(),
            "Parsed package file"
        );

        Ok(Self { lines, diagnostics })
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Active package names in document order
    pub fn active_packages(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.kind().package())
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Disabled package names in document order
    pub fn disabled_packages(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.kind().disabled())
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn active_entries(&self) -> Vec<PackageRef> {
        self.entries(|kind| kind.package())
    }

    pub fn disabled_entries(&self) -> Vec<PackageRef> {
        self.entries(|kind| kind.disabled())
    }

    fn entries<F>(&self, select: F) -> Vec<PackageRef>
    where
        F: Fn(&LineKind) -> Option<&PackageEntry>,
    {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                select(line.kind()).map(|e| PackageRef {
                    name: e.name.clone(),
                    line: idx + 1,
                    comment: e.comment.trim().to_string(),
                })
            })
            .collect()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.find_active(name).is_some()
    }

    pub fn find_active(&self, name: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.kind().package().is_some_and(|e| e.name == name))
    }

    pub fn find_disabled(&self, name: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.kind().disabled().is_some_and(|e| e.name == name))
    }

    pub fn find_add_here(&self) -> InsertPoint {
        self.lines
            .iter()
            .enumerate()
            .find_map(|(index, line)| match line.kind() {
                LineKind::AddHere { prepend } => Some(InsertPoint {
                    index,
                    prepend: *prepend,
                    marker: true,
                }),
                _ => None,
            })
            .unwrap_or(InsertPoint {
                index: self.lines.len(),
                prepend: false,
                marker: false,
            })
    }

    pub fn find_hash_marker(&self) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| matches!(l.kind(), LineKind::HashMarker(_)))
    }

    /// Digest stored in the hash marker, `None` if absent or never stamped
    pub fn stored_hash(&self) -> Option<&str> {
        self.lines.iter().find_map(|l| match l.kind() {
            LineKind::HashMarker(digest) => digest.as_deref(),
            _ => None,
        })
    }

    /// Terminator used for lines the engine creates
    pub fn line_ending(&self) -> LineEnding {
        self.lines
            .iter()
            .map(Line::ending)
            .find(|e| *e != LineEnding::None)
            .unwrap_or_default()
    }

    /// Insert a new line before `index` (or at the end when `index` is the
    /// line count).
    pub(crate) fn insert_line(&mut self, index: usize, raw: String) {
        let ending = self.line_ending();
        if index == self.lines.len() {
            if let Some(last) = self.lines.last_mut() {
                if last.ending() == LineEnding::None {
                    last.set_ending(ending);
                }
            }
        }
        self.lines.insert(index, Line::new(raw, ending));
    }

    pub(crate) fn replace_line(&mut self, index: usize, raw: String) {
        self.lines[index].set_raw(raw);
    }

    pub(crate) fn remove_lines(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for idx in sorted.into_iter().rev() {
            self.lines.remove(idx);
        }
    }

    pub(crate) fn retain_lines<F>(&mut self, keep: F) -> usize
    where
        F: Fn(&Line) -> bool,
    {
        let before = self.lines.len();
        self.lines.retain(|l| keep(l));
        before - self.lines.len()
    }
}

/// Split text into lines, keeping what terminated each one.
fn split_lines(text: &str) -> impl Iterator<Item = (&str, LineEnding)> {
    text.split_inclusive('\n').map(|chunk| {
        if let Some(body) = chunk.strip_suffix("\r\n") {
            (body, LineEnding::CrLf)
        } else if let Some(body) = chunk.strip_suffix('\n') {
            (body, LineEnding::Lf)
        } else {
            (chunk, LineEnding::None)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "#@# \n{ pkgs, ... }: { #@\n  environment.systemPackages = with pkgs; [ #@\n    alacritty\n    #- dmenu # launcher\n    #@+\n  ]; #@\n} #@\n";

    #[test]
    fn test_queries() {
        let doc = Document::parse(SAMPLE).unwrap();

        assert_eq!(doc.active_packages(), vec!["alacritty"]);
        assert_eq!(doc.disabled_packages(), vec!["dmenu"]);
        assert_eq!(doc.find_hash_marker(), Some(0));
        assert_eq!(doc.stored_hash(), None);
        assert_eq!(
            doc.find_add_here(),
            InsertPoint {
                index: 5,
                prepend: false,
                marker: true
            }
        );
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn test_add_here_absent_is_end_of_document() {
        let doc = Document::parse("foo\nbar\n").unwrap();
        assert_eq!(
            doc.find_add_here(),
            InsertPoint {
                index: 2,
                prepend: false,
                marker: false
            }
        );
        assert_eq!(doc.find_hash_marker(), None);
    }

    #[test]
    fn test_duplicate_hash_marker_is_fatal() {
        let err = Document::parse("#@# \nfoo\n#@# abc\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateMarker {
                marker: Marker::Hash,
                first: 1,
                second: 3
            }
        );
    }

    #[test]
    fn test_duplicate_addhere_marker_is_fatal() {
        let err = Document::parse("#@+\nfoo\n  #@+^\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateMarker {
                marker: Marker::AddHere,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_packages_are_diagnostics() {
        let doc = Document::parse("foo\n#- foo\nbar\n").unwrap();
        assert_eq!(
            doc.diagnostics(),
            &[Diagnostic {
                line: 2,
                issue: Issue::DuplicatePackage("foo".to_string())
            }]
        );
    }

    #[test]
    fn test_entries_carry_line_numbers() {
        let doc = Document::parse(SAMPLE).unwrap();
        let disabled = doc.disabled_entries();
        assert_eq!(
            disabled,
            vec![PackageRef {
                name: "dmenu".to_string(),
                line: 5,
                comment: "# launcher".to_string()
            }]
        );
    }

    #[test]
    fn test_line_endings_tracked() {
        let doc = Document::parse("a\r\nb\nc").unwrap();
        let endings: Vec<_> = doc.lines().iter().map(Line::ending).collect();
        assert_eq!(endings, vec![LineEnding::CrLf, LineEnding::Lf, LineEnding::None]);
        assert_eq!(doc.line_ending(), LineEnding::CrLf);
    }

    #[test]
    fn test_insert_at_end_terminates_previous_line() {
        let mut doc = Document::parse("a\nb").unwrap();
        let at = doc.lines().len();
        doc.insert_line(at, "c".to_string());
        assert_eq!(doc.render(), "a\nb\nc\n");
    }
}
