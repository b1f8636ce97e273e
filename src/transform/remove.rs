use serde::Serialize;
use tracing::debug;

use super::{requested_names, Report, Status};
use crate::error::AnnixResult;
use crate::parser::classify::{classify, CODE_SUFFIX, COMMENT_PREFIX};
use crate::parser::{Document, LineKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoveStatus {
    Disabled,
    Deleted,
    NotFound,
}

impl Status for RemoveStatus {
    fn is_change(&self) -> bool {
        !matches!(self, RemoveStatus::NotFound)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Drop the line instead of disabling it. Disabled entries with the
    /// same name are dropped as well.
    pub delete: bool,
    /// Act on every duplicate line rather than the first one
    pub all_instances: bool,
}

/// Disable (or delete) packages in place.
pub fn remove<S: AsRef<str>>(
    doc: &mut Document,
    names: &[S],
    options: RemoveOptions,
) -> AnnixResult<Report<RemoveStatus>> {
    let names = requested_names(names)?;
    let mut report = Report::default();
    let mut doomed = Vec::new();

    for name in names {
        let targets = matching_lines(doc, name, options);
        if targets.is_empty() {
            debug!(package = name, "Package not found");
            report.push(name, RemoveStatus::NotFound);
            continue;
        }

        for idx in targets {
            let line = &doc.lines()[idx];
            let comment = match line.kind() {
                LineKind::Package(e) | LineKind::DisabledPackage(e) => e.comment.trim().to_string(),
                _ => continue,
            };

            if !options.delete {
                let raw = format!("{}#- {}", line.indent(), line.raw().trim_start());
                debug!(package = name, line = idx + 1, "Disabling package");
                doc.replace_line(idx, raw);
            } else {
                match kept_comment(line.indent(), &comment) {
                    Some(raw) => {
                        debug!(package = name, line = idx + 1, "Deleting package, keeping comment");
                        doc.replace_line(idx, raw);
                    }
                    None => {
                        debug!(package = name, line = idx + 1, "Deleting package");
                        doomed.push(idx);
                    }
                }
            }
        }

        let status = if options.delete {
            RemoveStatus::Deleted
        } else {
            RemoveStatus::Disabled
        };
        report.push(name, status);
    }

    doc.remove_lines(&doomed);
    Ok(report)
}

fn matching_lines(doc: &Document, name: &str, options: RemoveOptions) -> Vec<usize> {
    if !options.delete {
        let mut active = lines_named(doc, name, false);
        return if options.all_instances {
            active.collect()
        } else {
            active.next().into_iter().collect()
        };
    }

    if options.all_instances {
        return lines_named(doc, name, true).collect();
    }

    // First active and first disabled instance
    let mut found: Vec<usize> = doc.find_active(name).into_iter().collect();
    found.extend(doc.find_disabled(name));
    found
}

fn lines_named<'a>(
    doc: &'a Document,
    name: &'a str,
    include_disabled: bool,
) -> impl Iterator<Item = usize> + 'a {
    doc.lines()
        .iter()
        .enumerate()
        .filter(move |(_, l)| match l.kind() {
            LineKind::Package(e) => e.name == name,
            LineKind::DisabledPackage(e) => include_disabled && e.name == name,
            _ => false,
        })
        .map(|(idx, _)| idx)
}

/// The comment left behind when a package line is deleted.
///
/// The kept text must stay a plain comment. Trailing `#@` markers are
/// dropped, and a tail such as `#@#` or `#- bar` is commented out so it does
/// not come back as a marker or a package on the next read.
fn kept_comment(indent: &str, comment: &str) -> Option<String> {
    let mut text = comment;
    while let Some(stripped) = text.strip_suffix(CODE_SUFFIX) {
        text = stripped.trim_end();
    }
    if text.is_empty() {
        return None;
    }

    let raw = format!("{}{}", indent, text);
    let (kind, issues) = classify(&raw);
    if kind == LineKind::Comment && issues.is_empty() {
        Some(raw)
    } else {
        Some(format!("{}{} {}", indent, COMMENT_PREFIX, text))
    }
}
