//! # Preview Surface
//!
//! The host's handle to one embedded preview surface. [`PreviewSurface`]
//! is what the injection ladder and the controller program against;
//! [`EmbeddedSurface`] is the in-process implementation backing a
//! [`TargetPage`] with its own event-loop task.
//!
//! Each injection strategy either produces a connected [`HostEndpoint`]
//! (the probe is running in the target context) or fails with a
//! recoverable error describing why that technique cannot reach this
//! target. Origin restrictions are modeled by [`SurfaceCapabilities`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use autoview_core::prelude::*;
use autoview_core::{Error, Rect};
use autoview_probe::transport::{self, HostEndpoint, TargetEndpoint};
use autoview_probe::{probe, PointerAction, TargetPage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identity of one preview surface within the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// What the host can do to this particular target.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceCapabilities {
    /// The target document and global scope are same-origin accessible.
    pub same_origin: bool,
    /// The embedding shell exposes a privileged execute-in-context bridge.
    pub privileged_bridge: bool,
    /// The target app opts into self-injection requests.
    pub self_inject_optin: bool,
    /// The target accepts posted messages at all (false once detached).
    pub accepts_messages: bool,
}

impl SurfaceCapabilities {
    /// A same-origin target with no privileged bridge — the common dev case.
    pub fn same_origin() -> Self {
        Self {
            same_origin: true,
            privileged_bridge: false,
            self_inject_optin: false,
            accepts_messages: true,
        }
    }

    /// A cross-origin target that does not cooperate in any way.
    pub fn cross_origin() -> Self {
        Self {
            same_origin: false,
            privileged_bridge: false,
            self_inject_optin: false,
            accepts_messages: true,
        }
    }
}

/// The surface contract the injection ladder and controller consume.
///
/// The four strategy methods correspond to the ladder rungs in order.
/// A successful rung hands back the host half of a connected transport,
/// with the probe running in the target context behind the other half.
pub trait PreviewSurface: Send + Sync {
    fn id(&self) -> SurfaceId;

    /// Load generation, incremented on each (re)load of the target.
    fn generation(&self) -> u64;

    /// The surface element's bounding box in host coordinates.
    fn bounds(&self) -> Rect;

    /// Apply or remove pointer-cursor styling on the surface element
    /// (used by the fallback inspector).
    fn set_inspect_cursor(&self, enabled: bool);

    /// Rung 1: privileged execute-in-context bridge.
    fn execute_in_context(&self) -> Result<HostEndpoint>;

    /// Rung 2: create a script element in the target's own document.
    fn inject_script_element(&self) -> Result<HostEndpoint>;

    /// Rung 3: direct evaluation against the target's global scope.
    fn eval_in_global(&self) -> Result<HostEndpoint>;

    /// Rung 4: post a message asking the target to self-inject. Posting
    /// succeeds even when the target ignores the request — a
    /// non-cooperating target simply never acknowledges, and the
    /// controller's handshake timeout catches that.
    fn request_self_injection(&self) -> Result<HostEndpoint>;
}

// ─────────────────────────────────────────────────────────
// EmbeddedSurface
// ─────────────────────────────────────────────────────────

struct ProbeHandle {
    pointer: mpsc::UnboundedSender<PointerAction>,
    task: JoinHandle<()>,
}

/// In-process preview surface backing a [`TargetPage`].
///
/// On successful injection it spawns the probe's event loop as its own
/// task — the "separate execution context". Pointer events dispatched via
/// [`dispatch`][EmbeddedSurface::dispatch] are delivered into that loop,
/// never handled synchronously on the host side.
pub struct EmbeddedSurface {
    id: SurfaceId,
    bounds: Mutex<Rect>,
    capabilities: SurfaceCapabilities,
    generation: AtomicU64,
    page: Arc<Mutex<TargetPage>>,
    probe: Mutex<Option<ProbeHandle>>,
    /// Target halves for self-inject requests the target ignored: kept
    /// alive so the host endpoint times out instead of seeing a closed
    /// channel.
    parked: Mutex<Vec<TargetEndpoint>>,
    inspect_cursor: AtomicBool,
}

impl EmbeddedSurface {
    pub fn new(id: SurfaceId, bounds: Rect, page: TargetPage, capabilities: SurfaceCapabilities) -> Arc<Self> {
        Arc::new(Self {
            id,
            bounds: Mutex::new(bounds),
            capabilities,
            generation: AtomicU64::new(0),
            page: Arc::new(Mutex::new(page)),
            probe: Mutex::new(None),
            parked: Mutex::new(Vec::new()),
            inspect_cursor: AtomicBool::new(false),
        })
    }

    /// Shared handle to the target page (tests inspect and mutate it).
    pub fn page(&self) -> Arc<Mutex<TargetPage>> {
        Arc::clone(&self.page)
    }

    /// Whether a probe event loop is currently running.
    pub fn probe_running(&self) -> bool {
        self.probe
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Whether pointer-cursor styling is currently applied.
    pub fn inspect_cursor(&self) -> bool {
        self.inspect_cursor.load(Ordering::Relaxed)
    }

    /// Deliver a pointer event into the target context. Returns `false`
    /// when no probe is running to receive it.
    pub fn dispatch(&self, action: PointerAction) -> bool {
        let guard = self.probe.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(handle) => handle.pointer.send(action).is_ok(),
            None => false,
        }
    }

    /// Simulate a (re)load of the target: bumps the generation and tears
    /// down the running probe. The host application is expected to follow
    /// up by notifying its controller.
    pub fn reload(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.teardown_probe();
    }

    fn teardown_probe(&self) {
        let mut guard = self.probe.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = guard.take() {
            handle.task.abort();
            debug!("surface {:?}: probe torn down", self.id);
        }
        self.parked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Start the probe in the target context and hand back the host half.
    fn boot_probe(&self) -> HostEndpoint {
        self.teardown_probe();
        let (host, target) = transport::connect();
        let (pointer_tx, pointer_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(probe::run(Arc::clone(&self.page), target, pointer_rx));
        *self.probe.lock().unwrap_or_else(|e| e.into_inner()) = Some(ProbeHandle {
            pointer: pointer_tx,
            task,
        });
        host
    }
}

impl Drop for EmbeddedSurface {
    fn drop(&mut self) {
        self.teardown_probe();
    }
}

impl PreviewSurface for EmbeddedSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bounds(&self) -> Rect {
        *self.bounds.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_inspect_cursor(&self, enabled: bool) {
        self.inspect_cursor.store(enabled, Ordering::Relaxed);
    }

    fn execute_in_context(&self) -> Result<HostEndpoint> {
        if !self.capabilities.privileged_bridge {
            return Err(Error::injection(
                "no privileged execution bridge in this embedding",
            ));
        }
        Ok(self.boot_probe())
    }

    fn inject_script_element(&self) -> Result<HostEndpoint> {
        if !self.capabilities.same_origin {
            return Err(Error::access_denied(
                "cross-origin: target document not reachable for script injection",
            ));
        }
        Ok(self.boot_probe())
    }

    fn eval_in_global(&self) -> Result<HostEndpoint> {
        if !self.capabilities.same_origin {
            return Err(Error::access_denied(
                "cross-origin: target global scope not accessible",
            ));
        }
        Ok(self.boot_probe())
    }

    fn request_self_injection(&self) -> Result<HostEndpoint> {
        if !self.capabilities.accepts_messages {
            return Err(Error::injection("target no longer accepts messages"));
        }
        if self.capabilities.self_inject_optin {
            return Ok(self.boot_probe());
        }
        // Posted into the void: keep the target half alive so the host
        // sees silence (handshake timeout), not a closed channel.
        let (host, target) = transport::connect();
        self.parked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(target);
        debug!("surface {:?}: self-inject request posted, target did not opt in", self.id);
        Ok(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoview_core::{HostMessage, ProbeMessage};

    fn surface_with(caps: SurfaceCapabilities) -> Arc<EmbeddedSurface> {
        EmbeddedSurface::new(
            SurfaceId(1),
            Rect::new(100.0, 50.0, 1024.0, 768.0),
            TargetPage::new(),
            caps,
        )
    }

    #[tokio::test]
    async fn test_script_injection_requires_same_origin() {
        let surface = surface_with(SurfaceCapabilities::cross_origin());
        assert!(matches!(
            surface.inject_script_element(),
            Err(Error::AccessDenied { .. })
        ));
        assert!(matches!(
            surface.eval_in_global(),
            Err(Error::AccessDenied { .. })
        ));
        assert!(!surface.probe_running());
    }

    #[tokio::test]
    async fn test_privileged_bridge_works_cross_origin() {
        let mut caps = SurfaceCapabilities::cross_origin();
        caps.privileged_bridge = true;
        let surface = surface_with(caps);

        let mut endpoint = surface.execute_in_context().unwrap();
        assert!(surface.probe_running());
        // The probe announces itself on boot.
        assert!(matches!(
            endpoint.events.recv().await,
            Some(ProbeMessage::InspectorReady { .. })
        ));
    }

    #[tokio::test]
    async fn test_self_inject_without_optin_goes_silent() {
        let surface = surface_with(SurfaceCapabilities::cross_origin());
        let mut endpoint = surface.request_self_injection().unwrap();
        assert!(!surface.probe_running());
        // No probe means no ready ack — and no channel closure either.
        assert!(endpoint.events.try_recv().is_none());
        endpoint.commands.send(&HostMessage::StartInspection);
    }

    #[tokio::test]
    async fn test_self_inject_with_optin_boots_probe() {
        let mut caps = SurfaceCapabilities::cross_origin();
        caps.self_inject_optin = true;
        let surface = surface_with(caps);
        let _endpoint = surface.request_self_injection().unwrap();
        assert!(surface.probe_running());
    }

    #[tokio::test]
    async fn test_reload_bumps_generation_and_tears_down() {
        let surface = surface_with(SurfaceCapabilities::same_origin());
        let _endpoint = surface.inject_script_element().unwrap();
        assert_eq!(surface.generation(), 0);
        assert!(surface.probe_running());

        surface.reload();
        assert_eq!(surface.generation(), 1);
        assert!(!surface.probe_running());
    }

    #[tokio::test]
    async fn test_dispatch_without_probe_is_false() {
        let surface = surface_with(SurfaceCapabilities::same_origin());
        let el = {
            let page = surface.page();
            let mut page = page.lock().unwrap();
            let body = page.document.body();
            page.document.append_element(body, "div")
        };
        assert!(!surface.dispatch(PointerAction::Click(el)));
        let _endpoint = surface.inject_script_element().unwrap();
        assert!(surface.dispatch(PointerAction::Click(el)));
    }

    #[test]
    fn test_inspect_cursor_toggles() {
        let surface = surface_with(SurfaceCapabilities::same_origin());
        assert!(!surface.inspect_cursor());
        surface.set_inspect_cursor(true);
        assert!(surface.inspect_cursor());
        surface.set_inspect_cursor(false);
        assert!(!surface.inspect_cursor());
    }
}
