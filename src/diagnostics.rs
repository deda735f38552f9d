use std::path::Path;

use crate::config::CONFIG_FILE_NAME;
use crate::error::Error;

/// ANSI bold.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigNotFound { path } => render_config_not_found(path),
        Error::DuplicateMapping { logical_path } => render_duplicate_mapping(logical_path),
        Error::InvalidMapping { logical_path, reason } => render_invalid_mapping(logical_path, reason),
        Error::NotADirectory { path } => render_not_a_directory(path),
        Error::UnknownMapping { logical_path } => render_unknown_mapping(logical_path),
        _ => render_generic(e),
    };
}

fn render_config_not_found(path: &Path) -> String {
    return format!("\
# Error: Config Not Found

`{}` does not exist.

## Fix

Check the path passed to `--config`.
", path.display());
}

fn render_duplicate_mapping(logical_path: &str) -> String {
    return format!("\
# Error: Mapping Already Exists

A mapping for `{logical_path}` is already configured.

## Fix

Remove it first:

    cfpath mappings remove {logical_path}
");
}

fn render_generic(e: &Error) -> String {
    return match e {
        Error::Io(err) => format!("\
# Error: I/O

{err}
"),
        Error::ListingFailed { path, source } => format!("\
# Error: Cannot List Directory

`{}` could not be read: {source}
", path.display()),
        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),
        Error::TomlDe(err) => format!("\
# Error: Invalid TOML

{err}

## Fix

Check `{CONFIG_FILE_NAME}` against the documented shape:

    [[mappings]]
    logicalPath = \"/models\"
    directoryPath = \"/srv/models\"
"),
        _ => format!("\
# Error

{e}
"),
    };
}

fn render_invalid_mapping(logical_path: &str, reason: &str) -> String {
    return format!("\
# Error: Invalid Mapping

`{logical_path}`: {reason}.

## Fix

Logical paths are slash-prefixed virtual directories:

    cfpath mappings add /models /srv/app/models
");
}

fn render_not_a_directory(path: &Path) -> String {
    return format!("\
# Error: Not A Directory

`{}` is not a directory.
", path.display());
}

fn render_unknown_mapping(logical_path: &str) -> String {
    return format!("\
# Error: Unknown Mapping

No mapping for `{logical_path}` is configured in `{CONFIG_FILE_NAME}`.

## Fix

List the configured mappings:

    cfpath mappings list
");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn unknown_mapping_suggests_listing() {
        let md = render_error(&Error::UnknownMapping {
            logical_path: "/models".to_string(),
        });
        assert!(md.starts_with("# Error: Unknown Mapping"));
        assert!(md.contains("cfpath mappings list"));
    }

    #[test]
    fn not_a_directory_names_the_path() {
        let md = render_error(&Error::NotADirectory {
            path: PathBuf::from("views/home.cfm"),
        });
        assert!(md.contains("`views/home.cfm` is not a directory"));
    }
}
