//! # Component Descriptor Domain Types
//!
//! Types describing the UI component that rendered an inspected element,
//! plus the ranked source-location candidates resolved for it.
//!
//! These types are shared between the probe side (which assembles a
//! [`ComponentDescriptor`] from the target's framework internals) and the
//! host side (which maps the descriptor to ranked [`SourceLocation`]
//! candidates), which is why they live in `autoview-core`.
//!
//! ## Key Types
//!
//! - [`ComponentDescriptor`] — Safe-copied snapshot of a framework component
//! - [`SourceLocation`] — A file/line/column guess for a component's source
//! - [`ComponentSourceInfo`] — Deduplicated ranked candidates plus a confidence tier
//! - [`Confidence`] — How trustworthy the primary candidate is
//! - [`InspectionResult`] — Everything delivered per completed click cycle

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::DomNodeInfo;
use crate::framework::FrameworkInfo;
use crate::source_path::{clean_path, project_relative};

/// Placeholder written into props/state for non-primitive array values.
pub const PLACEHOLDER_ARRAY: &str = "[Array]";
/// Placeholder written into props/state for non-primitive object values.
pub const PLACEHOLDER_OBJECT: &str = "[Object]";
/// Placeholder written into props/state for function values.
pub const PLACEHOLDER_FUNCTION: &str = "[Function]";

// ============================================================================
// SourceLocation
// ============================================================================

/// A source-file location guess for a component.
///
/// `file_path` is the cleaned absolute (or bundler-rooted) path; the
/// project-relative form is derived at construction when a root marker
/// directory is present. Line and column are 1-based when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,

    /// Path truncated to start at a project-root marker (`src/`, `app/`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

impl SourceLocation {
    /// Build a location from a raw producer path, cleaning it and deriving
    /// the project-relative form.
    pub fn new(raw_path: &str, line: Option<u32>, column: Option<u32>) -> Self {
        let file_path = clean_path(raw_path);
        let relative_path = project_relative(&file_path);
        Self {
            file_path,
            line_number: line,
            column_number: column,
            relative_path,
        }
    }

    /// Identity used for candidate deduplication.
    pub fn dedup_key(&self) -> (&str, Option<u32>, Option<u32>) {
        (&self.file_path, self.line_number, self.column_number)
    }
}

// ============================================================================
// Confidence
// ============================================================================

/// Qualitative trust tier for a source-location guess.
///
/// `High` means the location came from debug metadata attached to the
/// component itself; `Medium` from a declaration-pattern text search;
/// `Low` from naming-convention probing (or nothing at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ComponentDescriptor
// ============================================================================

/// Safe-copied snapshot of the framework component that rendered an element.
///
/// Never holds a reference into the foreign runtime: props and state carry
/// only JSON primitives, with arrays/objects/functions replaced by the
/// `[Array]` / `[Object]` / `[Function]` placeholder strings. This is what
/// makes every payload carrying a descriptor structurally cloneable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub component_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub props: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub state: BTreeMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

impl ComponentDescriptor {
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            display_name: None,
            props: BTreeMap::new(),
            state: BTreeMap::new(),
            source_location: None,
        }
    }

    /// Preferred human-facing name: displayName when set, else the type name.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.component_name)
    }
}

// ============================================================================
// ComponentSourceInfo
// ============================================================================

/// Ranked, deduplicated source candidates for one component.
///
/// Maintains two invariants:
/// - the primary candidate (when present) is `possible_sources[0]`
/// - no two entries share the same `(file, line, column)` identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSourceInfo {
    pub component: ComponentDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<SourceLocation>,

    #[serde(default)]
    pub possible_sources: Vec<SourceLocation>,

    pub confidence: Confidence,
}

impl ComponentSourceInfo {
    /// Start with no candidates at the lowest tier. The mapper upgrades
    /// the confidence when it establishes a primary.
    pub fn new(component: ComponentDescriptor) -> Self {
        Self {
            component,
            primary: None,
            possible_sources: Vec::new(),
            confidence: Confidence::Low,
        }
    }

    /// Install the primary candidate at the head of the list.
    ///
    /// A no-op if a primary is already set (first producer wins). The
    /// location also joins `possible_sources` at index 0, displacing any
    /// duplicate of itself found later in the list.
    pub fn set_primary(&mut self, location: SourceLocation, confidence: Confidence) {
        if self.primary.is_some() {
            return;
        }
        self.possible_sources
            .retain(|existing| existing.dedup_key() != location.dedup_key());
        self.possible_sources.insert(0, location.clone());
        self.primary = Some(location);
        self.confidence = confidence;
    }

    /// Append a secondary candidate, skipping duplicates.
    pub fn add_candidate(&mut self, location: SourceLocation) {
        let key = location.dedup_key();
        let exists = self
            .possible_sources
            .iter()
            .any(|existing| existing.dedup_key() == key);
        if !exists {
            self.possible_sources.push(location);
        }
    }

    pub fn has_candidates(&self) -> bool {
        !self.possible_sources.is_empty()
    }
}

// ============================================================================
// InspectionResult
// ============================================================================

/// The payload delivered to the host callback once per click cycle.
///
/// `dom_node` is always present. `source` is `None` on introspection miss
/// (no owning component found) and in fallback mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    pub dom_node: DomNodeInfo,
    pub framework: FrameworkInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ComponentSourceInfo>,
}

// ============================================================================
// Tests
// ============================================================================
