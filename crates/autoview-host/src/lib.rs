//! # autoview-host - Host-Side Orchestration
//!
//! The controller half of the AutoView inspector: everything that runs in
//! the host application's execution context.
//!
//! Depends on [`autoview_core`] for domain types and [`autoview_probe`]
//! for the target-context model and transport.
//!
//! ## Public API
//!
//! ### Orchestration (`controller`, `inject`, `fallback`)
//! - [`InspectionController`] - Session lifecycle, wire protocol, overlay
//! - [`InjectionSelector`], [`InjectionStrategy`] - First-success-wins ladder
//! - [`FallbackInspector`] - Degraded whole-surface inspection
//!
//! ### Surfaces (`surface`)
//! - [`PreviewSurface`] - The contract a preview surface implements
//! - [`EmbeddedSurface`], [`SurfaceCapabilities`] - In-process implementation
//!
//! ### Source Mapping (`source_map`, `collab`)
//! - [`SourceMapper`] - Descriptor → ranked source candidates
//! - [`TextSearch`], [`FileSearch`], [`EditorLauncher`] - Collaborator traits
//! - [`WorkspaceSearch`] - Filesystem-backed search implementation
//!
//! ### Configuration (`settings`)
//! - [`InspectorSettings`] - `.autoview/config.toml` with defaults

pub mod collab;
pub mod controller;
pub mod fallback;
pub mod inject;
pub mod settings;
pub mod source_map;
pub mod surface;

pub use collab::{
    open_primary_source, EditorLauncher, FileSearch, SearchHit, TextSearch, WorkspaceSearch,
};
pub use controller::{HighlightOverlay, InspectionController, InspectionSession, OnResult};
pub use fallback::FallbackInspector;
pub use inject::{Injection, InjectionSelector, InjectionStrategy};
pub use settings::InspectorSettings;
pub use source_map::SourceMapper;
pub use surface::{EmbeddedSurface, PreviewSurface, SurfaceCapabilities, SurfaceId};
