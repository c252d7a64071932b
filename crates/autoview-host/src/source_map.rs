//! # Source Mapper
//!
//! Turns a component descriptor into ranked candidate source locations.
//!
//! Three strategies, in confidence order:
//!
//! 1. A location the locator already attached (debug metadata) becomes
//!    the primary candidate at confidence `high`.
//! 2. A declaration-pattern text search for the component name
//!    (export/function/const/class forms) appends `medium` candidates;
//!    the first hit becomes primary when none exists yet.
//! 3. Naming-convention probing (kebab-case, snake_case file names in
//!    conventional locations) appends `low` candidates, only consulted
//!    when the first two strategies produced nothing.
//!
//! Search failures are logged and treated as empty result sets — a
//! source-resolution miss yields an empty candidate list at confidence
//! `low`, never an error.

use std::sync::Arc;

use autoview_core::prelude::*;
use autoview_core::{ComponentDescriptor, ComponentSourceInfo, Confidence, SourceLocation};

use crate::collab::{FileSearch, TextSearch};

/// Extensions probed by the naming-convention strategy.
const CONVENTION_EXTENSIONS: &[&str] = &[".tsx", ".jsx", ".ts", ".js", ".vue", ".svelte"];

/// Component names never worth searching for.
const UNSEARCHABLE_NAMES: &[&str] = &["Anonymous", "Unknown"];

/// Maps component descriptors to ranked source candidates.
pub struct SourceMapper {
    text: Arc<dyn TextSearch>,
    files: Arc<dyn FileSearch>,
    scope_globs: Vec<String>,
}

impl SourceMapper {
    pub fn new(
        text: Arc<dyn TextSearch>,
        files: Arc<dyn FileSearch>,
        scope_globs: Vec<String>,
    ) -> Self {
        Self {
            text,
            files,
            scope_globs,
        }
    }

    /// Resolve ranked candidates for a descriptor.
    pub fn map(&self, component: &ComponentDescriptor) -> ComponentSourceInfo {
        let mut info = ComponentSourceInfo::new(component.clone());

        // 1. The locator's own metadata wins outright.
        if let Some(location) = &component.source_location {
            info.set_primary(location.clone(), Confidence::High);
        }

        let name = component.name();
        if !is_searchable_name(name) {
            return info;
        }

        // 2. Declaration-pattern search, regardless of a primary: extra
        // candidates are still useful to show.
        for pattern in declaration_patterns(name) {
            match self.text.search(&pattern, &self.scope_globs) {
                Ok(hits) => {
                    for hit in hits {
                        let location = SourceLocation::new(
                            &hit.file.to_string_lossy(),
                            Some(hit.line),
                            None,
                        );
                        info.set_primary(location.clone(), Confidence::Medium);
                        info.add_candidate(location);
                    }
                }
                Err(e) => debug!("declaration search failed for '{name}': {e}"),
            }
        }

        // 3. Convention probing only when everything else came up empty.
        if !info.has_candidates() {
            'probing: for file_name in convention_file_names(name) {
                match self.files.find_files(&format!("**/{file_name}")) {
                    Ok(files) => {
                        for file in files {
                            let location =
                                SourceLocation::new(&file.to_string_lossy(), None, None);
                            info.set_primary(location.clone(), Confidence::Low);
                            info.add_candidate(location);
                        }
                        if info.has_candidates() {
                            break 'probing;
                        }
                    }
                    Err(e) => debug!("file probe failed for '{file_name}': {e}"),
                }
            }
        }

        info
    }
}

/// Whether a component name is a plausible search target.
fn is_searchable_name(name: &str) -> bool {
    !name.is_empty()
        && !UNSEARCHABLE_NAMES.contains(&name)
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Declaration patterns for the common component definition forms.
fn declaration_patterns(name: &str) -> Vec<String> {
    let escaped = regex::escape(name);
    vec![
        format!(r"export\s+default\s+function\s+{escaped}\b"),
        format!(r"export\s+function\s+{escaped}\b"),
        format!(r"export\s+const\s+{escaped}\s*[=:]"),
        format!(r"export\s+class\s+{escaped}\b"),
        format!(r"function\s+{escaped}\s*\("),
        format!(r"const\s+{escaped}\s*[=:]"),
        format!(r"class\s+{escaped}\b"),
    ]
}

/// Conventional file names derived from the component name: as-is,
/// kebab-case, and snake_case, across the probed extensions.
fn convention_file_names(name: &str) -> Vec<String> {
    let mut stems = vec![name.to_string()];
    let kebab = kebab_case(name);
    if kebab != name {
        stems.push(kebab);
    }
    let snake = snake_case(name);
    if !stems.contains(&snake) {
        stems.push(snake);
    }

    let mut out = Vec::new();
    for stem in &stems {
        for ext in CONVENTION_EXTENSIONS {
            out.push(format!("{stem}{ext}"));
        }
    }
    out
}

fn kebab_case(name: &str) -> String {
    delimited_case(name, '-')
}

fn snake_case(name: &str) -> String {
    delimited_case(name, '_')
}

fn delimited_case(name: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push(delimiter);
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
