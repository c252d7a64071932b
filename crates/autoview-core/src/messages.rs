//! Cross-context wire protocol.
//!
//! Host and target run in separate execution contexts with no shared
//! memory; everything crossing the boundary is one of the two enums below.
//! Each variant carries a unique `type` tag chosen to avoid collision with
//! the embedded app's own messaging.
//!
//! Shapes are checked at compile time on both ends by construction — a
//! payload that cannot be structurally cloned cannot be expressed, because
//! every field bottoms out in plain serde data (no live DOM nodes, no
//! framework-internal objects).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::component::ComponentDescriptor;
use crate::dom::DomNodeInfo;
use crate::error::{Error, Result};
use crate::framework::FrameworkInfo;
use crate::geometry::Rect;

/// Control messages sent host → target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    #[serde(rename = "START_INSPECTION")]
    StartInspection,

    #[serde(rename = "STOP_INSPECTION")]
    StopInspection,
}

/// Messages posted target → host by the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProbeMessage {
    /// The probe's listeners are attached; carries the detection snapshot.
    /// This is the handshake ack the controller waits for before it
    /// considers the session live.
    #[serde(rename = "INSPECTOR_READY")]
    InspectorReady { framework: FrameworkInfo },

    /// The probe attached after a `START_INSPECTION` it never saw; asks
    /// the host to resend its current state.
    #[serde(rename = "REQUEST_INSPECTION_STATE")]
    RequestInspectionState,

    /// An element is hovered; rect is in target-local coordinates.
    #[serde(rename = "INSPECT_HOVER")]
    Hover { rect: Rect },

    /// The pointer left the hovered element.
    #[serde(rename = "INSPECT_LEAVE")]
    Leave,

    /// A click completed inside the target. `component` is `None` on
    /// introspection miss — the DOM facts are still always present.
    #[serde(rename = "INSPECT_CLICK")]
    Click {
        #[serde(rename = "domNode")]
        dom_node: DomNodeInfo,
        framework: FrameworkInfo,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        component: Option<ComponentDescriptor>,
    },
}

impl ProbeMessage {
    /// The wire tag for this message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InspectorReady { .. } => "INSPECTOR_READY",
            Self::RequestInspectionState => "REQUEST_INSPECTION_STATE",
            Self::Hover { .. } => "INSPECT_HOVER",
            Self::Leave => "INSPECT_LEAVE",
            Self::Click { .. } => "INSPECT_CLICK",
        }
    }
}

impl HostMessage {
    /// The wire tag for this message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::StartInspection => "START_INSPECTION",
            Self::StopInspection => "STOP_INSPECTION",
        }
    }
}

/// Structurally clone a message, the way a context boundary would.
///
/// Round-trips through `serde_json::Value` so the copy shares nothing with
/// the original. The transport applies this to every send; tests use it to
/// assert payload cloneability directly.
pub fn structural_clone<T>(message: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let value = serde_json::to_value(message)?;
    serde_json::from_value(value).map_err(Error::from)
}
