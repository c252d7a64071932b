//! # Fallback Inspector
//!
//! Degraded whole-surface inspection for targets no injection strategy
//! can reach. The surface element itself becomes the one inspectable
//! node: pointer-cursor styling is applied to it, clicks on it are
//! handled host-side, and the synthesized result describes the surface
//! (`iframe-fallback`) with an unknown framework and no component.
//!
//! Start/stop semantics mirror the primary path: armed at `start()`,
//! disarmed at `stop()`, activated only once injection is exhausted or
//! the handshake times out.

use std::collections::BTreeMap;

use autoview_core::prelude::*;
use autoview_core::{DomNodeInfo, FrameworkInfo, InspectionResult};

use crate::surface::PreviewSurface;

/// Tag name reported for the synthesized surface node.
const FALLBACK_TAG: &str = "iframe-fallback";

/// Explanation carried in the framework version slot of fallback results.
const FALLBACK_REASON: &str = "not detectable (cross-origin frame)";

#[derive(Debug, Default)]
pub struct FallbackInspector {
    armed: bool,
    active: bool,
}

impl FallbackInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Armed means surface clicks are captured. The controller arms in
    /// parallel with injection so a click is never lost while the probe
    /// is still booting.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Active means the fallback is the session's only inspection path;
    /// applies the pointer cursor to the surface element.
    pub fn activate(&mut self, surface: &dyn PreviewSurface) {
        if !self.active {
            info!("fallback inspector active for {:?}", surface.id());
            surface.set_inspect_cursor(true);
            self.active = true;
        }
    }

    /// Disarm and deactivate, removing the cursor styling. Idempotent.
    pub fn disarm(&mut self, surface: &dyn PreviewSurface) {
        self.armed = false;
        if self.active {
            surface.set_inspect_cursor(false);
            self.active = false;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Synthesize the whole-surface inspection result.
    pub fn synthesize(&self, surface: &dyn PreviewSurface) -> InspectionResult {
        InspectionResult {
            dom_node: DomNodeInfo {
                tag_name: FALLBACK_TAG.to_string(),
                class_list: Vec::new(),
                attributes: BTreeMap::new(),
                xpath: "//iframe".to_string(),
                css_selector: "iframe".to_string(),
                bounding_box: surface.bounds(),
            },
            framework: FrameworkInfo::unavailable(FALLBACK_REASON),
            source: None,
        }
    }
}
