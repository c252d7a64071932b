//! Cross-context message transport.
//!
//! Host and target each hold one endpoint of a channel pair. Every send
//! structurally clones its payload (serde round trip), reproducing the
//! context-boundary copy semantics: nothing that crosses is shared, and a
//! send toward an absent peer is silently dropped (logged at debug).
//!
//! There are no request/response correlation IDs — matching is by message
//! `type` only, exactly as the wire protocol defines.

use autoview_core::prelude::*;
use autoview_core::{structural_clone, HostMessage, ProbeMessage};
use tokio::sync::mpsc;

/// Host → target control sender. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ControlSender {
    tx: mpsc::UnboundedSender<HostMessage>,
}

impl ControlSender {
    /// Send a control message toward the target context.
    ///
    /// The message is structurally cloned first. If the peer is gone (probe
    /// never started, or torn down on navigation) the message is dropped —
    /// this is what makes `stop()` safe with no probe present.
    pub fn send(&self, message: &HostMessage) {
        let cloned = match structural_clone(message) {
            Ok(m) => m,
            Err(e) => {
                warn!("control message failed structural clone: {e}");
                return;
            }
        };
        if self.tx.send(cloned).is_err() {
            debug!("control message dropped: no probe listening ({})", message.tag());
        }
    }
}

/// Target-side receiver for control messages.
pub struct ControlReceiver {
    rx: mpsc::UnboundedReceiver<HostMessage>,
}

impl ControlReceiver {
    pub async fn recv(&mut self) -> Option<HostMessage> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<HostMessage> {
        self.rx.try_recv().ok()
    }
}

/// Target → host event sender, held by the probe. Cheap to clone.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<ProbeMessage>,
}

impl EventSender {
    /// Post a probe message toward the host context.
    pub fn post(&self, message: &ProbeMessage) {
        let cloned = match structural_clone(message) {
            Ok(m) => m,
            Err(e) => {
                warn!("probe message failed structural clone: {e}");
                return;
            }
        };
        if self.tx.send(cloned).is_err() {
            debug!("probe message dropped: host detached ({})", message.tag());
        }
    }
}

/// Host-side receiver for probe events.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<ProbeMessage>,
}

impl EventReceiver {
    pub async fn recv(&mut self) -> Option<ProbeMessage> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ProbeMessage> {
        self.rx.try_recv().ok()
    }
}

/// The host's half of a connected transport.
#[derive(Debug)]
pub struct HostEndpoint {
    pub commands: ControlSender,
    pub events: EventReceiver,
}

/// The target's half of a connected transport.
pub struct TargetEndpoint {
    pub events: EventSender,
    pub commands: ControlReceiver,
}

/// Create a connected endpoint pair.
pub fn connect() -> (HostEndpoint, TargetEndpoint) {
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        HostEndpoint {
            commands: ControlSender { tx: control_tx },
            events: EventReceiver { rx: event_rx },
        },
        TargetEndpoint {
            events: EventSender { tx: event_tx },
            commands: ControlReceiver { rx: control_rx },
        },
    )
}
