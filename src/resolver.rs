//! Dotted-path resolution: local directory, then project root, then logical
//! mappings, stopping at the first tier that finds something.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::listing::COMPONENT_EXTENSION;
use crate::mapping::{join_segments, resolve_mapping_candidates};
use crate::probe::FileSystem;
use crate::workspace::ResolutionContext;

/// Replace the dots of a dotted path with `/` separators.
pub fn normalize_dotted_path(dotted: &str) -> String {
    return dotted.replace('.', "/");
}

/// Resolve a dotted component name (`a.b.User`) to its `.cfc` file, using the
/// same tier order as [`resolve_dotted_path`]. Empty names resolve to nothing.
pub fn resolve_component(
    fs: &dyn FileSystem,
    ctx: &ResolutionContext<'_>,
    name: &str,
    base: &Path,
) -> Vec<PathBuf> {
    if name.trim().is_empty() {
        return Vec::new();
    }
    let normalized = format!("{}.{COMPONENT_EXTENSION}", normalize_dotted_path(name));
    return search_tiers(fs, ctx, &normalized, base);
}

/// Resolve a dotted path requested from the document at `base`.
///
/// Tiers run in order: the directory containing `base`, the project root,
/// then each mapping candidate. The first existing candidate ends the search.
/// An empty dotted path never ends it early, so existing candidates from
/// every tier accumulate. An empty result means "unresolved".
pub fn resolve_dotted_path(
    fs: &dyn FileSystem,
    ctx: &ResolutionContext<'_>,
    dotted: &str,
    base: &Path,
) -> Vec<PathBuf> {
    let normalized = normalize_dotted_path(dotted);
    return search_tiers(fs, ctx, &normalized, base);
}

/// Probe one candidate and record it if it exists.
fn accept_if_exists(
    fs: &dyn FileSystem,
    tier: &str,
    candidate: PathBuf,
    accepted: &mut Vec<PathBuf>,
) -> bool {
    if !fs.probe(&candidate).exists() {
        debug!(tier, candidate = %candidate.display(), "resolve: candidate missing");
        return false;
    }
    debug!(tier, candidate = %candidate.display(), "resolve: candidate accepted");
    accepted.push(candidate);
    return true;
}

/// Run the local, root, and mapping tiers over a normalized path.
fn search_tiers(
    fs: &dyn FileSystem,
    ctx: &ResolutionContext<'_>,
    normalized: &str,
    base: &Path,
) -> Vec<PathBuf> {
    let stop_on_hit = !normalized.is_empty();
    let mut accepted = Vec::new();

    let local_dir = base.parent().unwrap_or(base);
    let local = join_segments(local_dir, normalized);
    if accept_if_exists(fs, "local", local, &mut accepted) && stop_on_hit {
        return accepted;
    }

    if let Some(root) = ctx.root {
        let rooted = join_segments(root, normalized);
        if accept_if_exists(fs, "root", rooted, &mut accepted) && stop_on_hit {
            return accepted;
        }
    } else {
        debug!(base = %base.display(), "resolve: no project root, root tier skipped");
    }

    for candidate in resolve_mapping_candidates(ctx.mappings, ctx.root, normalized) {
        if accept_if_exists(fs, "mapping", candidate, &mut accepted) && stop_on_hit {
            return accepted;
        }
    }

    return accepted;
}
