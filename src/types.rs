/// Core domain types shared by the resolvers, the link scanner, and the CLI.
use std::ops::Range;
use std::path::PathBuf;

/// A single entry from a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DirEntry {
    /// What the entry is on disk.
    pub kind: EntryKind,
    /// File or directory name, without any parent path.
    pub name: String,
}

impl DirEntry {
    /// Build an entry from a name and kind.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        return Self {
            kind,
            name: name.into(),
        };
    }
}

/// Kind of a directory-listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A regular file.
    File,
    /// Anything else: sockets, fifos, dangling links.
    Other,
}

/// Where a resolved link points.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum LinkTarget {
    /// A scheme-qualified reference, kept verbatim and never probed.
    External(String),
    /// An existing regular file on disk.
    File(PathBuf),
}

impl std::fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            LinkTarget::External(uri) => write!(f, "{uri}"),
            LinkTarget::File(path) => write!(f, "{}", path.display()),
        };
    }
}

/// A configured virtual-prefix-to-directory rule.
///
/// Field names follow the editor settings shape (`logicalPath`,
/// `directoryPath`, `isPhysicalDirectoryPath`) so a `cfml.mappings` array can
/// be pasted into `.cfpath.toml` unchanged.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalMapping {
    /// Physical directory, or a root-relative one when not physical.
    pub directory_path: String,
    /// Whether `directory_path` is used verbatim. Unset means `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_physical_directory_path: Option<bool>,
    /// Slash-delimited virtual prefix such as `/models`.
    pub logical_path: String,
}

impl LogicalMapping {
    /// Whether `directory_path` is a physical path rather than root-relative.
    pub fn is_physical(&self) -> bool {
        return self.is_physical_directory_path.unwrap_or(true);
    }
}

/// A link-shaped substring found by the scanner, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLinkMatch {
    /// Byte length of `text`.
    pub len: usize,
    /// Byte offset of `text` within the scanned document.
    pub offset: usize,
    /// The link substring itself.
    pub text: String,
}

impl RawLinkMatch {
    /// Document byte range covered by the link text.
    pub const fn span(&self) -> Range<usize> {
        return self.offset..self.offset.saturating_add(self.len);
    }
}

/// A link whose target exists (or is external). Unresolved links never
/// produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedLink {
    /// Byte range of the link text in the owning document.
    pub span: Range<usize>,
    /// Where the link points.
    pub target: LinkTarget,
}
