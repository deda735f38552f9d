//! Project roots and the per-call resolution context derived from them.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Error;
use crate::types::LogicalMapping;

/// What a single resolution call needs to know about where it runs: the
/// project root of the requesting location (if any) and the mappings that
/// apply there. Built fresh for each call, never stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionContext<'a> {
    /// Mappings applicable to the requesting location.
    pub mappings: &'a [LogicalMapping],
    /// Nearest enclosing project root, if the location is inside one.
    pub root: Option<&'a Path>,
}

impl<'a> ResolutionContext<'a> {
    /// Context from an explicit root and mapping table.
    pub const fn new(root: Option<&'a Path>, mappings: &'a [LogicalMapping]) -> Self {
        return Self { mappings, root };
    }
}

/// A set of project roots, each with its own config, plus the user-level
/// config that applies outside every root and wherever a root leaves
/// mappings unset.
#[derive(Debug, Default)]
pub struct Workspace {
    /// Configured project roots.
    folders: Vec<WorkspaceFolder>,
    /// User-level fallback config.
    user: Config,
}

/// One project root and its `.cfpath.toml`.
#[derive(Debug)]
struct WorkspaceFolder {
    /// Config loaded from the root.
    config: Config,
    /// Root directory.
    root: PathBuf,
}

impl Workspace {
    /// Add a project root with its config.
    pub fn add_folder(&mut self, root: PathBuf, config: Config) {
        self.folders.push(WorkspaceFolder { config, root });
        return;
    }

    /// Config that governs `location`: its root's config, or the user config
    /// when the location is outside every root.
    pub fn config_for(&self, location: &Path) -> &Config {
        return self
            .folder_of(location)
            .map_or(&self.user, |f| return &f.config);
    }

    /// Resolution context for a request made from `location`.
    pub fn context_for(&self, location: &Path) -> ResolutionContext<'_> {
        return ResolutionContext {
            mappings: self.mappings_for(location),
            root: self.root_of(location),
        };
    }

    /// Nearest enclosing folder of `location`; the deepest root wins when
    /// roots are nested.
    fn folder_of(&self, location: &Path) -> Option<&WorkspaceFolder> {
        return self
            .folders
            .iter()
            .filter(|f| return location.starts_with(&f.root))
            .max_by_key(|f| return f.root.components().count());
    }

    /// Load a workspace: each root's `.cfpath.toml` plus the user config.
    ///
    /// # Errors
    ///
    /// Returns config loading errors for any root.
    pub fn load(roots: &[PathBuf], user: Config) -> Result<Self, Error> {
        let mut workspace = Self::new(user);
        for root in roots {
            let config = Config::load(root)?;
            workspace.add_folder(root.clone(), config);
        }
        return Ok(workspace);
    }

    /// Mappings that apply at `location`. A root whose config leaves
    /// mappings unset inherits the user-level mappings.
    pub fn mappings_for(&self, location: &Path) -> &[LogicalMapping] {
        let folder_mappings = self
            .folder_of(location)
            .and_then(|f| return f.config.mappings());
        return folder_mappings
            .or_else(|| return self.user.mappings())
            .unwrap_or_default();
    }

    /// Empty workspace with the given user-level config.
    pub const fn new(user: Config) -> Self {
        return Self {
            folders: Vec::new(),
            user,
        };
    }

    /// Project root enclosing `location`, if any.
    pub fn root_of(&self, location: &Path) -> Option<&Path> {
        return self.folder_of(location).map(|f| return f.root.as_path());
    }
}
