use serde::Serialize;
use tracing::debug;

use super::{requested_names, Report, Status};
use crate::error::AnnixResult;
use crate::parser::classify::{classify, CODE_SUFFIX, DISABLED_PREFIX};
use crate::parser::{Document, PackageEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddStatus {
    Added,
    AlreadyActive,
    Reactivated,
}

impl Status for AddStatus {
    fn is_change(&self) -> bool {
        !matches!(self, AddStatus::AlreadyActive)
    }
}

/// Add packages at the addhere marker.
///
/// `#@+` puts new lines directly above the marker, `#@+^` directly below it,
/// and without a marker they go to the end of the file. Disabled entries are
/// re-enabled where they stand instead of being duplicated.
pub fn add<S: AsRef<str>>(
    doc: &mut Document,
    names: &[S],
    default_indent: &str,
) -> AnnixResult<Report<AddStatus>> {
    let names = requested_names(names)?;
    let mut report = Report::default();

    let point = doc.find_add_here();
    let indent = if point.marker {
        doc.lines()[point.index].indent().to_string()
    } else {
        default_indent.to_string()
    };
    let mut inserted = 0;

    for name in names {
        if doc.is_active(name) {
            report.push(name, AddStatus::AlreadyActive);
            continue;
        }

        if let Some(idx) = doc.find_disabled(name) {
            let line = &doc.lines()[idx];
            let raw = match line.kind().disabled() {
                Some(entry) => enabled_line(line.indent(), line.raw(), entry),
                None => format!("{}{}", line.indent(), name),
            };
            debug!(package = name, line = idx + 1, "Re-enabling package");
            doc.replace_line(idx, raw);
            report.push(name, AddStatus::Reactivated);
            continue;
        }

        let at = match (point.marker, point.prepend) {
            (true, false) => point.index + inserted,
            (true, true) => point.index + 1 + inserted,
            (false, _) => doc.lines().len(),
        };
        debug!(package = name, line = at + 1, "Inserting package");
        doc.insert_line(at, format!("{}{}", indent, name));
        inserted += 1;
        report.push(name, AddStatus::Added);
    }

    Ok(report)
}

/// Text for a disabled line once its prefix is gone.
///
/// Dropping `#-` keeps the line as written when it still reads as the same
/// package. A tail that would turn it into something else (`#- dmenu #@`
/// would become a code line) loses its trailing `#@` markers.
fn enabled_line(indent: &str, raw: &str, entry: &PackageEntry) -> String {
    let rest = raw.trim_start();
    let rest = rest.strip_prefix(DISABLED_PREFIX).unwrap_or(rest).trim_start();
    let candidate = format!("{}{}", indent, rest);
    if classify(&candidate)
        .0
        .package()
        .is_some_and(|e| e.name == entry.name)
    {
        return candidate;
    }

    let mut comment = entry.comment.trim();
    while let Some(stripped) = comment.strip_suffix(CODE_SUFFIX) {
        comment = stripped.trim_end();
    }
    if comment.is_empty() {
        format!("{}{}", indent, entry.name)
    } else {
        format!("{}{} {}", indent, entry.name, comment)
    }
}
