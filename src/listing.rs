//! Directory listing filters: sub-directories and component files.

use std::path::Path;

use crate::error::Error;
use crate::probe::FileSystem;
use crate::types::{DirEntry, EntryKind};

/// File extension that marks a component, compared case-insensitively.
pub const COMPONENT_EXTENSION: &str = "cfc";

/// Keep file entries whose name ends in `.cfc` (any case). Order is preserved.
pub fn components(entries: &[DirEntry]) -> Vec<DirEntry> {
    return entries
        .iter()
        .filter(|e| return e.kind == EntryKind::File && is_component_name(&e.name))
        .cloned()
        .collect();
}

/// Keep directory entries. Order is preserved.
pub fn directories(entries: &[DirEntry]) -> Vec<DirEntry> {
    return entries
        .iter()
        .filter(|e| return e.kind == EntryKind::Directory)
        .cloned()
        .collect();
}

/// List `location` and keep the component files.
///
/// # Errors
///
/// Propagates the listing failure from the filesystem.
pub fn get_components(fs: &dyn FileSystem, location: &Path) -> Result<Vec<DirEntry>, Error> {
    let entries = fs.list_directory(location)?;
    return Ok(components(&entries));
}

/// List `location` and keep the sub-directories.
///
/// # Errors
///
/// Propagates the listing failure from the filesystem.
pub fn get_directories(fs: &dyn FileSystem, location: &Path) -> Result<Vec<DirEntry>, Error> {
    let entries = fs.list_directory(location)?;
    return Ok(directories(&entries));
}

/// Whether a file name carries the component suffix.
fn is_component_name(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    return lowered
        .strip_suffix(COMPONENT_EXTENSION)
        .is_some_and(|stem| return stem.ends_with('.'));
}
