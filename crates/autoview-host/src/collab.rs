//! Collaborator interfaces consumed at the subsystem boundary.
//!
//! The surrounding application supplies real implementations (its text
//! search, its file index, its editor integration). [`WorkspaceSearch`] is
//! the built-in filesystem-backed implementation of the two search traits,
//! used when no richer collaborator is wired in.

use std::fs;
use std::path::{Path, PathBuf};

use autoview_core::prelude::*;
use autoview_core::{has_source_extension, Error};
use regex::Regex;

/// One text-search match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub file: PathBuf,
    /// 1-based line number of the match.
    pub line: u32,
}

/// Content search over project source.
pub trait TextSearch: Send + Sync {
    /// Search for a regex pattern within the files selected by
    /// `scope_globs` (empty globs mean "all recognized source files").
    fn search(&self, pattern: &str, scope_globs: &[String]) -> Result<Vec<SearchHit>>;
}

/// File lookup by glob pattern.
pub trait FileSearch: Send + Sync {
    /// Find files matching a glob of the form `**/name.ext`.
    fn find_files(&self, glob: &str) -> Result<Vec<PathBuf>>;
}

/// Editor integration: open a file at a location.
#[cfg_attr(test, mockall::automock)]
pub trait EditorLauncher: Send + Sync {
    fn open_file(&self, path: &Path, line: Option<u32>, column: Option<u32>) -> Result<()>;
}

/// Open the primary candidate of a mapped result in the editor.
///
/// A convenience for "open file" actions on an inspection result. No-ops
/// (returning `false`) when there is no primary candidate; editor failures
/// are logged and swallowed, matching the transient-environment error
/// policy.
pub fn open_primary_source(
    editor: &dyn EditorLauncher,
    info: &autoview_core::ComponentSourceInfo,
) -> bool {
    let Some(primary) = &info.primary else {
        return false;
    };
    let path = Path::new(&primary.file_path);
    match editor.open_file(path, primary.line_number, primary.column_number) {
        Ok(()) => true,
        Err(e) => {
            warn!("editor failed to open {}: {e}", primary.file_path);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────
// WorkspaceSearch
// ─────────────────────────────────────────────────────────

/// Directory names never descended into during workspace walks.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "target", "coverage"];

/// Maximum directory depth for workspace walks.
const MAX_WALK_DEPTH: usize = 16;

/// Filesystem-backed search over a project root.
///
/// Walks the tree once per query, skipping dependency/build directories.
/// Unreadable files are skipped, not errors — a search can only miss,
/// never fail the inspection.
#[derive(Debug, Clone)]
pub struct WorkspaceSearch {
    root: PathBuf,
}

impl WorkspaceSearch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect all source files under the root, bounded by depth.
    fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        walk_dir(&self.root, 0, &mut files);
        files.sort();
        files
    }
}

fn walk_dir(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            walk_dir(&path, depth + 1, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}

/// Extract the extension filters from scope globs like `**/*.tsx`.
///
/// Globs that don't fit the `*.<ext>` shape contribute nothing; with no
/// usable filter at all, the recognized source extensions apply.
fn glob_extensions(scope_globs: &[String]) -> Vec<String> {
    scope_globs
        .iter()
        .filter_map(|glob| glob.rsplit_once("*.").map(|(_, ext)| format!(".{ext}")))
        .collect()
}

fn matches_scope(path: &Path, extensions: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    if extensions.is_empty() {
        return has_source_extension(&path_str);
    }
    extensions.iter().any(|ext| path_str.ends_with(ext.as_str()))
}

impl TextSearch for WorkspaceSearch {
    fn search(&self, pattern: &str, scope_globs: &[String]) -> Result<Vec<SearchHit>> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::search(format!("invalid search pattern: {e}")))?;
        let extensions = glob_extensions(scope_globs);

        let mut hits = Vec::new();
        for path in self.walk() {
            if !matches_scope(&path, &extensions) {
                continue;
            }
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            for (index, line) in content.lines().enumerate() {
                if regex.is_match(line) {
                    hits.push(SearchHit {
                        file: path.clone(),
                        line: (index + 1) as u32,
                    });
                }
            }
        }
        debug!("workspace search '{pattern}': {} hits", hits.len());
        Ok(hits)
    }
}

impl FileSearch for WorkspaceSearch {
    fn find_files(&self, glob: &str) -> Result<Vec<PathBuf>> {
        let suffix = glob.strip_prefix("**/").unwrap_or(glob);
        let found = self
            .walk()
            .into_iter()
            .filter(|path| {
                let path_str = path.to_string_lossy().replace('\\', "/");
                path_str.ends_with(&format!("/{suffix}")) || path_str == suffix
            })
            .collect();
        Ok(found)
    }
}
