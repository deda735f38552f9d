//! CLI commands for cfpath: resolve, component, links, ls, mappings.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use tracing::warn;

use cfpath::config::{self, Config};
use cfpath::error::Error;
use cfpath::links::scan_and_resolve_links;
use cfpath::listing::{components, directories};
use cfpath::probe::{DiskFileSystem, FileSystem as _, Probe};
use cfpath::resolver::{resolve_component, resolve_dotted_path};
use cfpath::types::{LogicalMapping, ResolvedLink};
use cfpath::workspace::Workspace;

/// Extensions of documents scanned for links when walking a directory.
const DOCUMENT_EXTENSIONS: &[&str] = &["cfc", "cfm", "cfml"];

/// A resolved link together with the document it was found in.
#[derive(Serialize)]
struct DocumentLink<'a> {
    /// Document containing the link.
    document: &'a Path,
    /// Span and target of the link.
    #[serde(flatten)]
    link: &'a ResolvedLink,
}

/// Filtered directory listing printed by `ls --json`.
#[derive(Serialize)]
struct ListingReport {
    /// Component files, in listing order.
    components: Vec<String>,
    /// Sub-directories, in listing order.
    directories: Vec<String>,
}

/// Project roots and configs shared by every command, built once from the
/// global CLI flags.
pub struct Session {
    /// Roots in the order given; the first one owns `mappings` edits.
    roots: Vec<PathBuf>,
    /// Loaded workspace.
    workspace: Workspace,
}

impl Session {
    /// Load every root's config plus the optional user-level config.
    ///
    /// # Errors
    ///
    /// Returns config loading errors, or `Error::Io` if a path cannot be
    /// made absolute.
    pub fn load(roots: &[PathBuf], user_config: Option<&Path>) -> Result<Self, Error> {
        let roots = roots
            .iter()
            .map(|r| return std::path::absolute(r))
            .collect::<Result<Vec<_>, _>>()?;
        let user = match user_config {
            None => Config::default(),
            Some(path) => Config::load_file(path)?,
        };
        let workspace = Workspace::load(&roots, user)?;
        return Ok(Self { roots, workspace });
    }

    /// Root whose `.cfpath.toml` the `mappings` commands read and edit.
    fn primary_root(&self) -> PathBuf {
        return self.roots.first().cloned().unwrap_or_else(|| return PathBuf::from("."));
    }
}

/// Resolve a dotted component name to its `.cfc` file.
///
/// # Errors
///
/// Returns `Error::Io` if `from` cannot be made absolute.
pub fn component(session: &Session, name: &str, from: &Path) -> Result<ExitCode, Error> {
    let base = std::path::absolute(from)?;
    let ctx = session.workspace.context_for(&base);
    let found = resolve_component(&DiskFileSystem, &ctx, name, &base);
    return Ok(print_paths(&found));
}

/// Whether a walked file is a document worth scanning.
fn has_document_extension(path: &Path) -> bool {
    return path
        .extension()
        .and_then(|e| return e.to_str())
        .is_some_and(|ext| {
            return DOCUMENT_EXTENSIONS.iter().any(|d| return d.eq_ignore_ascii_case(ext));
        });
}

/// Scan documents for links and print every link that resolves.
/// Directories are walked; explicitly named files are always scanned.
///
/// # Errors
///
/// Returns `Error::Io` if a named path does not exist or a named file cannot
/// be read, or `Error::Json`.
pub fn links(session: &Session, paths: &[PathBuf], json: bool) -> Result<ExitCode, Error> {
    let mut documents: Vec<(PathBuf, bool)> = Vec::new();
    for path in paths {
        let path = std::path::absolute(path)?;
        match DiskFileSystem.probe(&path) {
            Probe::File => documents.push((path, true)),
            Probe::Directory => {
                documents.extend(walk_documents(session, &path).into_iter().map(|d| return (d, false)));
            },
            Probe::Absent | Probe::Other => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no file or directory at {}", path.display()),
                )));
            },
        }
    }

    let mut found: Vec<(PathBuf, Vec<ResolvedLink>)> = Vec::new();
    for (document, explicit) in documents {
        let text = match std::fs::read_to_string(&document) {
            Err(e) if explicit => return Err(Error::Io(e)),
            Err(e) => {
                warn!(document = %document.display(), error = %e, "links: skipping unreadable document");
                continue;
            },
            Ok(t) => t,
        };
        let ctx = session.workspace.context_for(&document);
        let resolved = scan_and_resolve_links(&DiskFileSystem, &ctx, &text, &document);
        found.push((document, resolved));
    }

    if json {
        let rows: Vec<DocumentLink<'_>> = found
            .iter()
            .flat_map(|(document, links)| {
                return links.iter().map(move |link| {
                    return DocumentLink {
                        document: document.as_path(),
                        link,
                    };
                });
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    for (document, links) in &found {
        for link in links {
            println!(
                "{}:{}..{} -> {}",
                document.display(),
                link.span.start,
                link.span.end,
                link.target
            );
        }
    }
    return Ok(ExitCode::SUCCESS);
}

/// List the sub-directories and component files of a directory.
///
/// # Errors
///
/// Returns listing errors (`Error::NotADirectory`, `Error::ListingFailed`),
/// or `Error::Json`.
pub fn ls(dir: &Path, json: bool) -> Result<ExitCode, Error> {
    let entries = DiskFileSystem.list_directory(dir)?;
    let report = ListingReport {
        components: components(&entries).into_iter().map(|e| return e.name).collect(),
        directories: directories(&entries).into_iter().map(|e| return e.name).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    for name in &report.directories {
        println!("{name}/");
    }
    for name in &report.components {
        println!("{name}");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Add a mapping to the primary root's `.cfpath.toml`.
///
/// # Errors
///
/// Returns errors from mapping validation or config editing.
pub fn mappings_add(
    session: &Session,
    logical_path: &str,
    directory_path: &str,
    root_relative: bool,
) -> Result<ExitCode, Error> {
    let mapping = LogicalMapping {
        directory_path: directory_path.to_string(),
        is_physical_directory_path: root_relative.then_some(false),
        logical_path: logical_path.to_string(),
    };
    config::add_mapping(&session.primary_root(), &mapping)?;
    eprintln!("Added mapping: {logical_path} -> {directory_path}");
    return Ok(ExitCode::SUCCESS);
}

/// List the mappings that apply inside the primary root.
pub fn mappings_list(session: &Session) -> ExitCode {
    let root = session.primary_root();
    let mappings = session.workspace.mappings_for(&root);

    if mappings.is_empty() {
        println!("No mappings configured.");
        return ExitCode::SUCCESS;
    }

    for mapping in mappings {
        let note = if mapping.is_physical() { "" } else { "  (root-relative)" };
        println!("{} -> {}{note}", mapping.logical_path, mapping.directory_path);
    }
    return ExitCode::SUCCESS;
}

/// Remove a mapping from the primary root's `.cfpath.toml`.
///
/// # Errors
///
/// Returns `Error::UnknownMapping` or config editing errors.
pub fn mappings_remove(session: &Session, logical_path: &str) -> Result<ExitCode, Error> {
    config::remove_mapping(&session.primary_root(), logical_path)?;
    eprintln!("Removed mapping: {logical_path}");
    return Ok(ExitCode::SUCCESS);
}

/// Print one path per line. Exit code 1 signals "nothing resolved".
fn print_paths(paths: &[PathBuf]) -> ExitCode {
    if paths.is_empty() {
        eprintln!("unresolved");
        return ExitCode::from(1);
    }
    for path in paths {
        println!("{}", path.display());
    }
    return ExitCode::SUCCESS;
}

/// Resolve a dotted path from the document at `from`.
///
/// # Errors
///
/// Returns `Error::Io` if `from` cannot be made absolute.
pub fn resolve(session: &Session, dotted: &str, from: &Path) -> Result<ExitCode, Error> {
    let base = std::path::absolute(from)?;
    let ctx = session.workspace.context_for(&base);
    let found = resolve_dotted_path(&DiskFileSystem, &ctx, dotted, &base);
    return Ok(print_paths(&found));
}

/// Walk a directory for documents that pass their root's include/exclude
/// filters. Include/exclude prefixes are matched against the path relative
/// to the document's project root, or to `dir` outside every root.
fn walk_documents(session: &Session, dir: &Path) -> Vec<PathBuf> {
    return walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| {
            return entry
                .inspect_err(|e| {
                    warn!(error = %e, "links: skipping unreadable entry");
                    return;
                })
                .ok();
        })
        .filter(|e| return e.file_type().is_file() && has_document_extension(e.path()))
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            let base = session.workspace.root_of(path).unwrap_or(dir);
            let relative = path.strip_prefix(base).unwrap_or(path.as_path());
            let relative = relative.to_string_lossy().replace('\\', "/");
            return session.workspace.config_for(path).should_scan(&relative);
        })
        .collect();
}
