use tracing::debug;

use crate::parser::{Document, LineKind};

/// Delete every disabled package line. Returns how many were removed.
pub fn clean(doc: &mut Document) -> usize {
    let removed = doc.retain_lines(|l| !matches!(l.kind(), LineKind::DisabledPackage(_)));
    debug!(removed, "Removed disabled packages");
    removed
}
