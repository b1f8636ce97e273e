use super::classify::classify;

/// A package entry extracted from an active or disabled package line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    /// Trailing `#` comment including its leading whitespace, empty if none
    pub comment: String,
}

/// What a physical line of the package file means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Package(PackageEntry),
    DisabledPackage(PackageEntry),
    /// Opaque host-language line; payload has whitespace collapsed
    Code(String),
    /// `None` when the marker has never been stamped
    HashMarker(Option<String>),
    AddHere { prepend: bool },
    Comment,
    Blank,
}

impl LineKind {
    pub fn package(&self) -> Option<&PackageEntry> {
        match self {
            LineKind::Package(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn disabled(&self) -> Option<&PackageEntry> {
        match self {
            LineKind::DisabledPackage(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Terminator that followed a line in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Last line of a file without a trailing newline
    None,
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::None => "",
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// One physical line. The kind is always derived from the raw text, so the
/// only way to change what a line means is to replace its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    raw: String,
    ending: LineEnding,
    kind: LineKind,
}

impl Line {
    pub fn new(raw: impl Into<String>, ending: LineEnding) -> Self {
        let raw = raw.into();
        let (kind, _) = classify(&raw);
        Self { raw, ending, kind }
    }

    pub(crate) fn from_parts(raw: String, ending: LineEnding, kind: LineKind) -> Self {
        Self { raw, ending, kind }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    /// Leading whitespace of the raw text
    pub fn indent(&self) -> &str {
        let trimmed = self.raw.trim_start();
        &self.raw[..self.raw.len() - trimmed.len()]
    }

    pub(crate) fn set_raw(&mut self, raw: String) {
        *self = Self::new(raw, self.ending);
    }

    pub(crate) fn set_ending(&mut self, ending: LineEnding) {
        self.ending = ending;
    }
}

/// Something the classifier accepted but could not interpret cleanly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// `#@#` followed by a token that is not hexadecimal
    InvalidHash,
    /// More than one package, or stray text, on a package line
    MultiplePackages,
    /// Multi-line comments and strings are not tracked across lines
    UnsupportedSyntax,
    DuplicatePackage(String),
}

/// An [`Issue`] tied to a 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub issue: Issue,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.issue {
            Issue::InvalidHash => write!(f, "line {}: invalid hash, treated as a comment", self.line),
            Issue::MultiplePackages => write!(
                f,
                "line {}: only one package per line is supported, extra text ignored",
                self.line
            ),
            Issue::UnsupportedSyntax => write!(
                f,
                "line {}: multi-line comments and strings are not supported",
                self.line
            ),
            Issue::DuplicatePackage(name) => {
                write!(f, "line {}: duplicate package `{}`", self.line, name)
            }
        }
    }
}
