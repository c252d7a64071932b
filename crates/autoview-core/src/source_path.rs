//! Source path recognition and cleaning.
//!
//! Paths reaching the inspector come from several untrusted producers:
//! debug-source metadata, stack frames, bundler module registries. Each
//! producer has its own quirks (URI schemes, backslashes, query suffixes),
//! so everything funnels through [`clean_path`] before a
//! `SourceLocation` is built from it.
//!
//! ## Key Functions
//!
//! - [`clean_path`] — strip scheme prefixes, normalize separators, drop
//!   query suffixes.
//! - [`project_relative`] — truncate a path to start at a recognized
//!   project-root marker directory.
//! - [`has_source_extension`] — recognize source files by extension.
//! - [`is_dependency_path`] — detect framework/dependency directories that
//!   must never be reported as the user's component source.

/// URI scheme prefixes stripped before any other processing.
const SCHEME_PREFIXES: &[&str] = &["webpack-internal:///", "webpack://", "file://"];

/// Directory names that mark the start of project source.
///
/// When one of these appears as a path segment, the path is truncated to
/// begin there: `"/Users/x/proj/src/Button.tsx"` → `"src/Button.tsx"`.
const PROJECT_ROOT_MARKERS: &[&str] = &["src", "app", "pages", "components", "lib"];

/// Extensions recognized as UI source files.
const SOURCE_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".vue", ".svelte"];

/// Path segments that identify framework/dependency code.
const DEPENDENCY_DIR_MARKERS: &[&str] = &["node_modules", "webpack", ".vite", "vendor"];

/// Clean a raw path from debug metadata, a stack frame, or a module registry.
///
/// Strips URI schemes, leading `./`, query/fragment suffixes (`?t=123`),
/// and normalizes `\` to `/`. Does not touch relative/absolute-ness beyond
/// that — [`project_relative`] handles marker truncation separately.
pub fn clean_path(raw: &str) -> String {
    let mut path = raw.trim();

    for scheme in SCHEME_PREFIXES {
        if let Some(stripped) = path.strip_prefix(scheme) {
            path = stripped;
            break;
        }
    }

    // Bundler paths carry cache-busting queries: "src/App.tsx?t=1699..."
    let path = path.split(['?', '#']).next().unwrap_or(path);

    let mut cleaned = path.replace('\\', "/");
    while let Some(stripped) = cleaned.strip_prefix("./") {
        cleaned = stripped.to_string();
    }
    cleaned
}

/// Derive the project-relative form of a cleaned path, if a root marker
/// directory appears in it.
///
/// The first marker match wins, scanning segments left to right:
/// `"/home/u/work/shop/src/cart/Cart.tsx"` → `Some("src/cart/Cart.tsx")`.
/// Returns `None` when no marker segment is present.
pub fn project_relative(cleaned: &str) -> Option<String> {
    let segments: Vec<&str> = cleaned.split('/').collect();
    for (idx, segment) in segments.iter().enumerate() {
        // A marker only counts when it is a directory, not the file itself.
        if idx + 1 < segments.len() && PROJECT_ROOT_MARKERS.contains(segment) {
            return Some(segments[idx..].join("/"));
        }
    }
    None
}

/// Whether a path ends in a recognized UI source extension.
pub fn has_source_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    SOURCE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether a path points into framework or dependency code.
pub fn is_dependency_path(path: &str) -> bool {
    path.split(['/', '\\'])
        .any(|segment| DEPENDENCY_DIR_MARKERS.contains(&segment))
}

/// Whether a stack frame path is worth reporting as a source candidate:
/// a source extension, and not inside a dependency directory.
pub fn is_project_source(path: &str) -> bool {
    has_source_extension(path) && !is_dependency_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_strips_file_scheme() {
        assert_eq!(
            clean_path("file:///Users/dev/proj/src/App.tsx"),
            "/Users/dev/proj/src/App.tsx"
        );
    }

    #[test]
    fn test_clean_path_strips_webpack_schemes() {
        assert_eq!(clean_path("webpack:///./src/App.jsx"), "src/App.jsx");
        assert_eq!(
            clean_path("webpack-internal:///src/Button.tsx"),
            "src/Button.tsx"
        );
    }

    #[test]
    fn test_clean_path_drops_query_suffix() {
        assert_eq!(clean_path("src/App.tsx?t=1699999999"), "src/App.tsx");
    }

    #[test]
    fn test_clean_path_normalizes_backslashes() {
        assert_eq!(
            clean_path("C:\\work\\proj\\src\\App.tsx"),
            "C:/work/proj/src/App.tsx"
        );
    }

    #[test]
    fn test_clean_path_plain_passthrough() {
        assert_eq!(clean_path("/a/b/c.ts"), "/a/b/c.ts");
    }

    #[test]
    fn test_project_relative_truncates_at_src() {
        assert_eq!(
            project_relative("/home/u/work/shop/src/cart/Cart.tsx").as_deref(),
            Some("src/cart/Cart.tsx")
        );
    }

    #[test]
    fn test_project_relative_first_marker_wins() {
        assert_eq!(
            project_relative("/repo/app/src/main.ts").as_deref(),
            Some("app/src/main.ts")
        );
    }

    #[test]
    fn test_project_relative_none_without_marker() {
        assert_eq!(project_relative("/tmp/scratch/file.tsx"), None);
    }

    #[test]
    fn test_project_relative_marker_must_be_directory() {
        // A file literally named "src" is not a root marker.
        assert_eq!(project_relative("/weird/path/src"), None);
    }

    #[test]
    fn test_has_source_extension() {
        assert!(has_source_extension("src/App.tsx"));
        assert!(has_source_extension("widget.SVELTE"));
        assert!(!has_source_extension("styles.css"));
        assert!(!has_source_extension("bundle.js.map"));
    }

    #[test]
    fn test_is_dependency_path() {
        assert!(is_dependency_path("node_modules/react-dom/index.js"));
        assert!(is_dependency_path("/proj/node_modules/x/y.js"));
        assert!(is_dependency_path("webpack/runtime/chunk.js"));
        assert!(!is_dependency_path("src/components/Button.tsx"));
    }

    #[test]
    fn test_is_project_source() {
        assert!(is_project_source("src/TodoItem.tsx"));
        assert!(!is_project_source("node_modules/react/index.js"));
        assert!(!is_project_source("src/logo.svg"));
    }
}
