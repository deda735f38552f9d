//! Project configuration: `.cfpath.toml` loading and in-place mapping edits.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::LogicalMapping;

/// Name of the per-project config file, looked up in each project root.
pub const CONFIG_FILE_NAME: &str = ".cfpath.toml";

/// Project configuration loaded from `.cfpath.toml`.
/// Include/exclude patterns are path prefixes applied to scanned documents.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path prefixes never scanned for links.
    exclude: Vec<String>,
    /// Path prefixes scanned for links; empty means everything.
    include: Vec<String>,
    /// Logical mappings, or `None` when the file leaves them unset.
    mappings: Option<Vec<LogicalMapping>>,
}

/// Raw TOML structure for `.cfpath.toml`.
#[derive(serde::Deserialize)]
struct CfpathTomlConfig {
    /// Raw exclude prefixes.
    #[serde(default)]
    exclude: Vec<String>,
    /// Raw include prefixes.
    #[serde(default)]
    include: Vec<String>,
    /// Raw `[[mappings]]` tables.
    #[serde(default)]
    mappings: Option<Vec<LogicalMapping>>,
}

impl Config {
    /// Config with the given mappings and no scan filters.
    pub const fn from_mappings(mappings: Vec<LogicalMapping>) -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            mappings: Some(mappings),
        };
    }

    /// Load config from `.cfpath.toml` in the given root directory.
    /// Returns the default (scan everything, mappings unset) if the file
    /// doesn't exist. A file that exists but is malformed is an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Load config from an explicit file path, such as a user-level config.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or `Error::TomlDe` if malformed.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Configured mappings, or `None` when this config leaves them unset.
    pub fn mappings(&self) -> Option<&[LogicalMapping]> {
        return self.mappings.as_deref();
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the content is not valid config TOML.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: CfpathTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            mappings: raw.mappings,
        });
    }

    /// Check whether a document path (relative to its root) should be scanned.
    ///
    /// A path is included if no include patterns are set, or if it starts
    /// with at least one include pattern. An included path is then excluded
    /// if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

// ── Config file editing ───────────────────────────────────────────────

/// Append a mapping to `.cfpath.toml`, creating the file and the
/// `[[mappings]]` array as needed. Existing formatting is preserved.
///
/// # Errors
///
/// Returns `Error::InvalidMapping` if the mapping is malformed,
/// `Error::DuplicateMapping` if its logical path is taken,
/// `Error::ParseFailed` if the config can't be parsed, or `Error::Io`.
pub fn add_mapping(root: &Path, mapping: &LogicalMapping) -> Result<(), Error> {
    validate_mapping(mapping)?;
    let (config_path, mut doc) = read_config_doc(root)?;

    if !doc.contains_key("mappings") {
        doc.insert(
            "mappings",
            toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new()),
        );
    }
    let tables = mappings_array_mut(&mut doc, &config_path)?;

    if position_of_mapping(tables, &mapping.logical_path).is_some() {
        return Err(Error::DuplicateMapping {
            logical_path: mapping.logical_path.clone(),
        });
    }

    let mut table = toml_edit::Table::new();
    table.insert("logicalPath", toml_edit::value(mapping.logical_path.as_str()));
    table.insert("directoryPath", toml_edit::value(mapping.directory_path.as_str()));
    if let Some(flag) = mapping.is_physical_directory_path {
        table.insert("isPhysicalDirectoryPath", toml_edit::value(flag));
    }
    tables.push(table);

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

/// Borrow the `[[mappings]]` array of a config document.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if `mappings` exists but is not an array of tables.
fn mappings_array_mut<'a>(
    doc: &'a mut toml_edit::DocumentMut,
    config_path: &Path,
) -> Result<&'a mut toml_edit::ArrayOfTables, Error> {
    return doc
        .get_mut("mappings")
        .and_then(toml_edit::Item::as_array_of_tables_mut)
        .ok_or_else(|| {
            return Error::ParseFailed {
                file: config_path.to_path_buf(),
                reason: "`mappings` must be an array of tables ([[mappings]])".to_string(),
            };
        });
}

/// Index of the table whose `logicalPath` equals `logical_path`.
fn position_of_mapping(tables: &toml_edit::ArrayOfTables, logical_path: &str) -> Option<usize> {
    return tables.iter().position(|t| {
        return t.get("logicalPath").and_then(toml_edit::Item::as_str) == Some(logical_path);
    });
}

/// Parse a `.cfpath.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ParseFailed` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), Error> {
    let config_path = root.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&config_path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return Error::ParseFailed {
            file: config_path.clone(),
            reason: e.to_string(),
        };
    })?;

    return Ok((config_path, doc));
}

/// Remove the mapping with `logical_path` from `.cfpath.toml`.
///
/// # Errors
///
/// Returns `Error::UnknownMapping` if no mapping has that logical path,
/// `Error::ParseFailed` if the config can't be parsed, or `Error::Io`.
pub fn remove_mapping(root: &Path, logical_path: &str) -> Result<(), Error> {
    let unknown = || {
        return Error::UnknownMapping {
            logical_path: logical_path.to_string(),
        };
    };

    let (config_path, mut doc) = read_config_doc(root)?;
    if !doc.contains_key("mappings") {
        return Err(unknown());
    }
    let tables = mappings_array_mut(&mut doc, &config_path)?;
    let index = position_of_mapping(tables, logical_path).ok_or_else(unknown)?;
    tables.remove(index);

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

/// Reject mappings that could never match or never resolve.
///
/// # Errors
///
/// Returns `Error::InvalidMapping` describing the first problem found.
fn validate_mapping(mapping: &LogicalMapping) -> Result<(), Error> {
    let reason = if !mapping.logical_path.starts_with('/') {
        "logical path must start with `/`"
    } else if mapping.directory_path.trim().is_empty() {
        "directory path must not be empty"
    } else {
        return Ok(());
    };
    return Err(Error::InvalidMapping {
        logical_path: mapping.logical_path.clone(),
        reason: reason.to_string(),
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    fn mapping(logical: &str, dir: &str) -> LogicalMapping {
        return LogicalMapping {
            directory_path: dir.to_string(),
            is_physical_directory_path: None,
            logical_path: logical.to_string(),
        };
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.mappings().is_none());
        assert!(config.should_scan("anything.cfm"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "mappings = 3").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn explicit_missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_file(&dir.path().join("user.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn parses_editor_shaped_mappings() {
        let config = Config::parse(
            r#"
            [[mappings]]
            logicalPath = "/models"
            directoryPath = "/srv/models"

            [[mappings]]
            logicalPath = "/lib"
            directoryPath = "vendor/lib"
            isPhysicalDirectoryPath = false
            "#,
        )
        .unwrap();

        let mappings = config.mappings().unwrap();
        assert_eq!(mappings.len(), 2);
        assert!(mappings[0].is_physical());
        assert!(!mappings[1].is_physical());
        assert_eq!(mappings[1].directory_path, "vendor/lib");
    }

    #[test]
    fn empty_mappings_array_is_set_not_unset() {
        let config = Config::parse("mappings = []").unwrap();
        assert_eq!(config.mappings(), Some(&[][..]));
    }

    #[test]
    fn include_then_exclude() {
        let config = Config::parse(
            r#"
            include = ["views/"]
            exclude = ["views/legacy/"]
            "#,
        )
        .unwrap();
        assert!(config.should_scan("views/home.cfm"));
        assert!(!config.should_scan("views/legacy/old.cfm"));
        assert!(!config.should_scan("models/User.cfc"));
    }

    #[test]
    fn add_then_remove_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "# project settings\ninclude = [\"views/\"]\n",
        )
        .unwrap();

        add_mapping(dir.path(), &mapping("/models", "/srv/models")).unwrap();
        let content = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(content.starts_with("# project settings"), "comment lost: {content}");

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.mappings().unwrap(), &[mapping("/models", "/srv/models")][..]);

        remove_mapping(dir.path(), "/models").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.mappings().unwrap_or_default().is_empty());
    }

    #[test]
    fn add_rejects_duplicates_and_bad_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        add_mapping(dir.path(), &mapping("/models", "/a")).unwrap();

        let dup = add_mapping(dir.path(), &mapping("/models", "/b")).unwrap_err();
        assert!(matches!(dup, Error::DuplicateMapping { .. }));

        let bad = add_mapping(dir.path(), &mapping("models", "/b")).unwrap_err();
        assert!(matches!(bad, Error::InvalidMapping { .. }));
    }

    #[test]
    fn remove_unknown_mapping_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove_mapping(dir.path(), "/nope").unwrap_err();
        assert!(matches!(err, Error::UnknownMapping { .. }));
    }
}
