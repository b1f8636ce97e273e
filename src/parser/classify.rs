use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Issue, LineKind, PackageEntry};

pub const HASH_PREFIX: &str = "#@#";
pub const ADD_HERE: &str = "#@+";
pub const ADD_HERE_PREPEND: &str = "#@+^";
pub const CODE_SUFFIX: &str = "#@";
pub const DISABLED_PREFIX: &str = "#-";
pub const COMMENT_PREFIX: char = '#';

// Static regex compilation for performance
static HASH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#@#\s*(?P<token>[^\s#]*)(?P<tail>.*)$").expect("Failed to compile hash pattern")
});

static HASH_LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>\s*)#@#\s*(?P<token>[^\s#]*)(?P<tail>.*?)\s*$")
        .expect("Failed to compile hash line pattern")
});

static HEX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]+$").expect("Failed to compile hex pattern")
});

/// Classify one line of the package file.
///
/// Rules are tried in a fixed order and the first match wins:
///
/// 1. `#@# [hex]` hash marker
/// 2. `#@+` / `#@+^` addhere marker
/// 3. `#- name` disabled package (wins over a trailing `#@`)
/// 4. `... #@` code line
/// 5. `# ...` comment
/// 6. blank
/// 7. package
///
/// Lines that only partially fit a rule fall back to the next rule that does
/// and report an [`Issue`].
pub fn classify(text: &str) -> (LineKind, Vec<Issue>) {
    let line = text.trim();
    let mut issues = Vec::new();

    let kind = classify_trimmed(line, &mut issues);

    if matches!(
        kind,
        LineKind::Package(_) | LineKind::DisabledPackage(_) | LineKind::Code(_)
    ) && (line.contains("/*") || line.contains("*/") || line.contains("''"))
    {
        issues.push(Issue::UnsupportedSyntax);
    }

    (kind, issues)
}

fn classify_trimmed(line: &str, issues: &mut Vec<Issue>) -> LineKind {
    if let Some(caps) = HASH_PATTERN.captures(line) {
        let token = &caps["token"];
        if token.is_empty() {
            return LineKind::HashMarker(None);
        }
        if HEX_PATTERN.is_match(token) {
            return LineKind::HashMarker(Some(token.to_ascii_lowercase()));
        }
        issues.push(Issue::InvalidHash);
        return LineKind::Comment;
    }

    if line == ADD_HERE {
        return LineKind::AddHere { prepend: false };
    }
    if line == ADD_HERE_PREPEND {
        return LineKind::AddHere { prepend: true };
    }

    if let Some(rest) = line.strip_prefix(DISABLED_PREFIX) {
        if let Some(entry) = parse_entry(rest.trim_start(), issues) {
            return LineKind::DisabledPackage(entry);
        }
    }

    if let Some(code) = line.strip_suffix(CODE_SUFFIX) {
        return LineKind::Code(normalize_code(code));
    }

    if line.starts_with(COMMENT_PREFIX) {
        return LineKind::Comment;
    }

    if line.is_empty() {
        return LineKind::Blank;
    }

    match parse_entry(line, issues) {
        Some(entry) => LineKind::Package(entry),
        None => LineKind::Comment,
    }
}

/// Split `name [# comment]` into a package entry.
fn parse_entry(text: &str, issues: &mut Vec<Issue>) -> Option<PackageEntry> {
    let end = text
        .find(|c: char| c.is_whitespace() || c == COMMENT_PREFIX)
        .unwrap_or(text.len());
    let (name, tail) = text.split_at(end);
    if name.is_empty() {
        return None;
    }

    let comment = if tail.trim().is_empty() {
        String::new()
    } else if tail.trim_start().starts_with(COMMENT_PREFIX) {
        tail.to_string()
    } else {
        issues.push(Issue::MultiplePackages);
        match tail.find(COMMENT_PREFIX) {
            Some(pos) => tail[pos..].to_string(),
            None => String::new(),
        }
    };

    Some(PackageEntry {
        name: name.to_string(),
        comment,
    })
}

fn normalize_code(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rewrite a hash marker line to carry `digest`, keeping indentation and any
/// trailing comment.
pub fn stamp_hash_line(raw: &str, digest: &str) -> String {
    match HASH_LINE_PATTERN.captures(raw) {
        Some(caps) => {
            let tail = &caps["tail"];
            let sep = if tail.is_empty() || tail.starts_with(char::is_whitespace) {
                ""
            } else {
                " "
            };
            format!("{}{} {}{}{}", &caps["indent"], HASH_PREFIX, digest, sep, tail)
        }
        None => format!("{} {}", HASH_PREFIX, digest),
    }
}

/// Package name accepted by `add`/`rm`: non-empty, no whitespace, no `#`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(|c: char| c.is_whitespace() || c == COMMENT_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> LineKind {
        classify(text).0
    }

    fn pkg(name: &str, comment: &str) -> PackageEntry {
        PackageEntry {
            name: name.to_string(),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_hash_marker() {
        assert_eq!(kind("#@# "), LineKind::HashMarker(None));
        assert_eq!(kind("#@#"), LineKind::HashMarker(None));
        assert_eq!(
            kind("  #@# ABCdef0123 # last sync"),
            LineKind::HashMarker(Some("abcdef0123".to_string()))
        );
    }

    #[test]
    fn test_invalid_hash_falls_back_to_comment() {
        let (kind, issues) = classify("#@# not-a-hash");
        assert_eq!(kind, LineKind::Comment);
        assert_eq!(issues, vec![Issue::InvalidHash]);
    }

    #[test]
    fn test_addhere_marker() {
        assert_eq!(kind("  #@+"), LineKind::AddHere { prepend: false });
        assert_eq!(kind("#@+^"), LineKind::AddHere { prepend: true });
        assert_eq!(kind("#@+ extra"), LineKind::Comment);
    }

    #[test]
    fn test_code_line() {
        assert_eq!(
            kind("  environment.systemPackages   = with pkgs; [ #@"),
            LineKind::Code("environment.systemPackages = with pkgs; [".to_string())
        );
        assert_eq!(kind("# commented #@"), LineKind::Code("# commented".to_string()));
    }

    #[test]
    fn test_disabled_prefix_beats_code_suffix() {
        assert_eq!(kind("  #- dmenu #@"), LineKind::DisabledPackage(pkg("dmenu", " #@")));
    }

    #[test]
    fn test_disabled_package() {
        assert_eq!(
            kind("  #-   htop # process viewer"),
            LineKind::DisabledPackage(pkg("htop", " # process viewer"))
        );
        assert_eq!(kind("#-"), LineKind::Comment);
        assert_eq!(kind("#- # only a comment"), LineKind::Comment);
    }

    #[test]
    fn test_comment_and_blank() {
        assert_eq!(kind("# just a comment"), LineKind::Comment);
        assert_eq!(kind("   \t"), LineKind::Blank);
        assert_eq!(kind(""), LineKind::Blank);
    }

    #[test]
    fn test_package() {
        assert_eq!(kind("  alacritty"), LineKind::Package(pkg("alacritty", "")));
        assert_eq!(
            kind("python3Packages.numpy  # math"),
            LineKind::Package(pkg("python3Packages.numpy", "  # math"))
        );
        assert_eq!(kind("foo#bar"), LineKind::Package(pkg("foo", "#bar")));
    }

    #[test]
    fn test_multiple_packages_reported() {
        let (kind, issues) = classify("  git vim # editors");
        assert_eq!(kind, LineKind::Package(pkg("git", "# editors")));
        assert_eq!(issues, vec![Issue::MultiplePackages]);
    }

    #[test]
    fn test_unsupported_syntax_reported() {
        let (_, issues) = classify("  foo /* bar */");
        assert!(issues.contains(&Issue::UnsupportedSyntax));

        let (_, issues) = classify("# /* harmless in a comment */");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_stamp_hash_line() {
        assert_eq!(stamp_hash_line("#@# ", "abc"), "#@# abc");
        assert_eq!(stamp_hash_line("  #@# 0123 # synced", "abc"), "  #@# abc # synced");
        assert_eq!(stamp_hash_line("#@## note", "abc"), "#@# abc # note");
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("ripgrep"));
        assert!(is_valid_name("python3Packages.numpy"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("two words"));
        assert!(!is_valid_name("#-evil"));
    }
}
