//! Link resolution: classify each scanned link and map it to an external
//! reference or an existing file.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::mapping::join_segments;
use crate::probe::FileSystem;
use crate::scanner::{LinkPatternRule, default_rules, scan_links};
use crate::types::{LinkTarget, ResolvedLink};
use crate::workspace::ResolutionContext;

/// Return the link verbatim if it carries a URI scheme. Single-letter
/// schemes are Windows drive letters, not schemes.
fn external_reference(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    if parsed.scheme().len() < 2 {
        return None;
    }
    return Some(link.to_string());
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` on relative paths and never climbs above a root.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::Prefix(_) | Component::RootDir) => {},
            Some(Component::CurDir | Component::ParentDir) | None => components.push(component),
        },
        other => components.push(other),
    }
    return;
}

/// Resolve one link found in `document`.
///
/// Surrounding whitespace is ignored. Fragment-only links resolve to nothing. Scheme-qualified links are
/// returned verbatim without probing. Anything else has its query and
/// fragment stripped and is resolved against the project root (leading `/`)
/// or the document's directory, and must be an existing regular file.
pub fn resolve_link(
    fs: &dyn FileSystem,
    root: Option<&Path>,
    link: &str,
    document: &Path,
) -> Option<LinkTarget> {
    let link = link.trim();
    if link.starts_with('#') {
        return None;
    }
    if let Some(uri) = external_reference(link) {
        return Some(LinkTarget::External(uri));
    }

    let local = strip_query_and_fragment(link);
    let candidate = if let Some(rooted) = local.strip_prefix(['/', '\\']) {
        let Some(root) = root else {
            debug!(link, "links: root-relative link outside any project root");
            return None;
        };
        join_segments(root, rooted)
    } else {
        document.parent().unwrap_or(Path::new("")).join(local)
    };

    let candidate = normalize_path(&candidate);
    if !fs.probe(&candidate).is_file() {
        debug!(link, candidate = %candidate.display(), "links: target is not an existing file");
        return None;
    }
    return Some(LinkTarget::File(candidate));
}

/// Scan `text` with the default rules and resolve every match.
pub fn scan_and_resolve_links(
    fs: &dyn FileSystem,
    ctx: &ResolutionContext<'_>,
    text: &str,
    document: &Path,
) -> Vec<ResolvedLink> {
    return scan_and_resolve_links_with(fs, ctx, text, document, default_rules());
}

/// Scan `text` with the given rules and resolve every match. Matches that do
/// not resolve are dropped; they never stop the remaining matches.
pub fn scan_and_resolve_links_with(
    fs: &dyn FileSystem,
    ctx: &ResolutionContext<'_>,
    text: &str,
    document: &Path,
    rules: &[LinkPatternRule],
) -> Vec<ResolvedLink> {
    return scan_links(text, rules)
        .into_iter()
        .filter_map(|raw| {
            let target = resolve_link(fs, ctx.root, &raw.text, document)?;
            return Some(ResolvedLink {
                span: raw.span(),
                target,
            });
        })
        .collect();
}

/// Cut a link at its first `?` or `#`.
fn strip_query_and_fragment(link: &str) -> &str {
    return link.split(['?', '#']).next().unwrap_or(link);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;
    use crate::probe::DiskFileSystem;
    use crate::probe::testing::RecordingFileSystem;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn fragment_links_never_resolve() {
        let root = tempfile::tempdir().unwrap();
        let doc = root.path().join("index.cfm");
        touch(&doc);
        touch(&root.path().join("#section"));

        let fs = RecordingFileSystem::default();
        assert_eq!(resolve_link(&fs, Some(root.path()), "#section", &doc), None);
        assert!(fs.probed.borrow().is_empty());
    }

    #[test]
    fn scheme_links_resolve_without_probing() {
        let fs = RecordingFileSystem::default();
        let doc = Path::new("/does/not/exist/index.cfm");

        let target = resolve_link(&fs, None, "https://example.com/x", doc);
        assert_eq!(target, Some(LinkTarget::External("https://example.com/x".to_string())));

        let mail = resolve_link(&fs, None, "mailto:ops@example.com", doc);
        assert_eq!(mail, Some(LinkTarget::External("mailto:ops@example.com".to_string())));
        assert!(fs.probed.borrow().is_empty(), "scheme link was probed");
    }

    #[test]
    fn drive_letters_are_not_schemes() {
        let fs = RecordingFileSystem::default();
        let target = resolve_link(&fs, None, "C:/nope/x.cfm", Path::new("/w/index.cfm"));
        assert_eq!(target, None);
        assert_eq!(fs.probed.borrow().len(), 1);
    }

    #[test]
    fn directories_are_not_link_targets() {
        let root = tempfile::tempdir().unwrap();
        let doc = root.path().join("index.cfm");
        touch(&doc);
        std::fs::create_dir(root.path().join("images")).unwrap();

        assert_eq!(resolve_link(&DiskFileSystem, Some(root.path()), "images", &doc), None);
        assert_eq!(resolve_link(&DiskFileSystem, Some(root.path()), "/images", &doc), None);
    }

    #[test]
    fn relative_links_resolve_against_the_document_directory() {
        let root = tempfile::tempdir().unwrap();
        let doc = root.path().join("views/home.cfm");
        touch(&doc);
        touch(&root.path().join("views/partials/nav.cfm"));
        touch(&root.path().join("css/site.css"));

        let nav = resolve_link(&DiskFileSystem, None, "partials/nav.cfm?v=2#top", &doc);
        assert_eq!(nav, Some(LinkTarget::File(root.path().join("views/partials/nav.cfm"))));

        let css = resolve_link(&DiskFileSystem, None, "../css/site.css", &doc);
        assert_eq!(css, Some(LinkTarget::File(root.path().join("css/site.css"))));
    }

    #[test]
    fn root_relative_links_need_a_root() {
        let root = tempfile::tempdir().unwrap();
        let doc = root.path().join("views/home.cfm");
        touch(&doc);
        touch(&root.path().join("css/site.css"));

        let with_root = resolve_link(&DiskFileSystem, Some(root.path()), "/css/site.css", &doc);
        assert_eq!(with_root, Some(LinkTarget::File(root.path().join("css/site.css"))));
        assert_eq!(resolve_link(&DiskFileSystem, None, "/css/site.css", &doc), None);
    }

    #[test]
    fn scan_and_resolve_keeps_going_past_failures() {
        let root = tempfile::tempdir().unwrap();
        let doc = root.path().join("index.cfm");
        touch(&doc);
        touch(&root.path().join("a/b.png"));
        touch(&root.path().join("footer.cfm"));

        let text = concat!(
            "<a href=\"missing.cfm\">x</a>\n",
            "<a href='#top'>top</a>\n",
            "<img src=\"a/b.png\">\n",
            "<a href=\"https://example.com/x\">ext</a>\n",
            "include 'footer.cfm';\n",
        );
        let ctx = ResolutionContext::new(Some(root.path()), &[]);
        let links = scan_and_resolve_links(&DiskFileSystem, &ctx, text, &doc);

        let targets: Vec<String> = links.iter().map(|l| l.target.to_string()).collect();
        assert_eq!(
            targets,
            vec![
                root.path().join("a/b.png").display().to_string(),
                "https://example.com/x".to_string(),
                root.path().join("footer.cfm").display().to_string(),
            ]
        );
        assert_eq!(&text[links[0].span.clone()], "a/b.png");
        assert_eq!(&text[links[2].span.clone()], "footer.cfm");
    }

    #[test]
    fn padded_scheme_links_are_trimmed() {
        let fs = RecordingFileSystem::default();
        let target = resolve_link(&fs, None, "  https://example.com/x ", Path::new("/w/a.cfm"));
        assert_eq!(target, Some(LinkTarget::External("https://example.com/x".to_string())));
    }

    #[test]
    fn fragment_suffix_is_stripped_before_probing() {
        let root = tempfile::tempdir().unwrap();
        let doc = root.path().join("index.cfm");
        touch(&doc);
        touch(&root.path().join("other.cfm"));

        let text = r##"<a href="other.cfm#section">x</a> <a href="other.cfm?x=1">y</a>"##;
        let ctx = ResolutionContext::new(Some(root.path()), &[]);
        let links = scan_and_resolve_links(&DiskFileSystem, &ctx, text, &doc);
        assert_eq!(links.len(), 2);
        assert_eq!(&text[links[0].span.clone()], "other.cfm#section");
        assert_eq!(links[0].target, LinkTarget::File(root.path().join("other.cfm")));
        assert_eq!(links[1].target, LinkTarget::File(root.path().join("other.cfm")));
    }

    #[test]
    fn normalization_stays_below_root() {
        assert_eq!(normalize_path(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
        assert_eq!(normalize_path(Path::new("a/b/../c")), PathBuf::from("a/c"));
    }
}
