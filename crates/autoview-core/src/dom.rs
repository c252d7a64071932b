//! Structural DOM facts for an inspected element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Structural description of a clicked element.
///
/// This is the guaranteed part of every inspection result: even when no
/// owning component can be found, the probe always produces one of these.
/// All fields are plain data — the probe never posts live DOM handles.
///
/// The JSON field names use camelCase to match the wire payloads produced
/// inside the target context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNodeInfo {
    /// Lowercase tag name (e.g., "div", "button")
    pub tag_name: String,

    /// Class names in document order
    #[serde(default)]
    pub class_list: Vec<String>,

    /// Attribute key/value pairs
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Absolute XPath addressing this element (id-anchored when possible)
    pub xpath: String,

    /// Best-effort CSS selector (id, else tag.classes, else tag)
    pub css_selector: String,

    /// Bounding box in target-local coordinates
    pub bounding_box: Rect,
}

impl DomNodeInfo {
    /// Get the `id` attribute if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attributes
            .get("id")
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Short display form, e.g. `div#app.container.dark`.
    pub fn display_name(&self) -> String {
        let mut out = self.tag_name.clone();
        if let Some(id) = self.id() {
            out.push('#');
            out.push_str(id);
        }
        for class in &self.class_list {
            out.push('.');
            out.push_str(class);
        }
        out
    }
}
