//! # autoview-core - Core Domain Types
//!
//! Foundation crate for the AutoView element inspector. Provides the domain
//! types, error handling, wire protocol, and source path utilities shared
//! by the probe (target-context) and host (controller) crates.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Geometry & DOM (`geometry`, `dom`)
//! - [`Rect`] - Bounding rectangle with derived edges, host/target translation
//! - [`DomNodeInfo`] - Structural facts for a clicked element
//!
//! ### Frameworks & Components (`framework`, `component`)
//! - [`FrameworkKind`], [`FrameworkInfo`] - Detected UI framework snapshot
//! - [`ComponentDescriptor`] - Safe-copied component snapshot (no live references)
//! - [`SourceLocation`], [`ComponentSourceInfo`], [`Confidence`] - Ranked source candidates
//! - [`InspectionResult`] - Per-click payload delivered to the host callback
//!
//! ### Wire Protocol (`messages`)
//! - [`HostMessage`], [`ProbeMessage`] - Discriminated-union message types
//! - [`structural_clone()`] - The context-boundary copy applied to every send
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ### Source Paths (`source_path`)
//! - [`clean_path()`], [`project_relative()`] - Producer path normalization
//! - [`is_project_source()`] - Stack-frame admissibility check
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use autoview_core::prelude::*;
//! ```

pub mod component;
pub mod dom;
pub mod error;
pub mod framework;
pub mod geometry;
pub mod logging;
pub mod messages;
pub mod source_path;

/// Prelude for common imports used throughout all AutoView crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use component::{
    ComponentDescriptor, ComponentSourceInfo, Confidence, InspectionResult, SourceLocation,
    PLACEHOLDER_ARRAY, PLACEHOLDER_FUNCTION, PLACEHOLDER_OBJECT,
};
pub use dom::DomNodeInfo;
pub use error::{Error, Result, ResultExt};
pub use framework::{FrameworkInfo, FrameworkKind};
pub use geometry::Rect;
pub use messages::{structural_clone, HostMessage, ProbeMessage};
pub use source_path::{
    clean_path, has_source_extension, is_dependency_path, is_project_source, project_relative,
};
