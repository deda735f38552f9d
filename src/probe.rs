//! Filesystem probing: existence and kind checks that never fail, plus the
//! directory listing primitive the component filters run over.

use std::path::Path;

use crate::error::Error;
use crate::types::{DirEntry, EntryKind};

/// Outcome of probing a path. Absence and probe failures (permissions,
/// invalid paths) are both `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Nothing usable exists at the path.
    Absent,
    /// A directory exists at the path.
    Directory,
    /// A regular file exists at the path.
    File,
    /// Something exists that is neither a file nor a directory.
    Other,
}

impl Probe {
    /// Whether anything exists at the probed path.
    pub fn exists(self) -> bool {
        return self != Self::Absent;
    }

    /// Whether the probed path is a regular file.
    pub fn is_file(self) -> bool {
        return self == Self::File;
    }
}

/// Host filesystem primitives consumed by the resolvers.
pub trait FileSystem {
    /// List the entries of a directory in the order the host returns them.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotADirectory` if `path` is not a directory,
    /// or `Error::ListingFailed` if it cannot be read.
    fn list_directory(&self, path: &Path) -> Result<Vec<DirEntry>, Error>;

    /// Report what exists at `path` without ever failing.
    fn probe(&self, path: &Path) -> Probe;
}

/// `FileSystem` backed by `std::fs`. Symlinks are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn list_directory(&self, path: &Path) -> Result<Vec<DirEntry>, Error> {
        if self.probe(path) != Probe::Directory {
            return Err(Error::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let read_dir = std::fs::read_dir(path).map_err(|source| {
            return Error::ListingFailed {
                path: path.to_path_buf(),
                source,
            };
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| {
                return Error::ListingFailed {
                    path: path.to_path_buf(),
                    source,
                };
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let kind = kind_of_probe(self.probe(&entry.path()));
            entries.push(DirEntry::new(name, kind));
        }

        return Ok(entries);
    }

    fn probe(&self, path: &Path) -> Probe {
        let Ok(metadata) = std::fs::metadata(path) else {
            return Probe::Absent;
        };
        if metadata.is_dir() {
            return Probe::Directory;
        }
        if metadata.is_file() {
            return Probe::File;
        }
        return Probe::Other;
    }
}

/// Map a probe outcome onto a listing kind. An entry that vanished between
/// listing and probing, or a dangling symlink, lists as `Other`.
const fn kind_of_probe(probe: Probe) -> EntryKind {
    return match probe {
        Probe::Absent | Probe::Other => EntryKind::Other,
        Probe::Directory => EntryKind::Directory,
        Probe::File => EntryKind::File,
    };
}
