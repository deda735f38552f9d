//! Resolve CFML dotted component paths and document links to files on disk.
//!
//! Dotted paths (`models.user.User`) are searched in the requesting
//! document's directory, then its project root, then the configured logical
//! mappings. Document text is scanned for link-shaped attribute values and
//! includes, and each one is resolved to an external URI or an existing file.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod links;
pub mod listing;
pub mod mapping;
pub mod probe;
pub mod resolver;
pub mod scanner;
pub mod types;
pub mod workspace;

pub use crate::error::Error;
pub use crate::links::{resolve_link, scan_and_resolve_links};
pub use crate::listing::{get_components, get_directories};
pub use crate::probe::{DiskFileSystem, FileSystem, Probe};
pub use crate::resolver::{resolve_component, resolve_dotted_path};
pub use crate::types::{DirEntry, EntryKind, LinkTarget, LogicalMapping, ResolvedLink};
pub use crate::workspace::{ResolutionContext, Workspace};
