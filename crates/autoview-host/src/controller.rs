//! # Inspection Controller
//!
//! Host-side orchestrator: owns the session, runs the injection ladder,
//! performs the ready-ack handshake, mediates all wire messages, and
//! renders the host highlight overlay.
//!
//! ## Session liveness
//!
//! `start()` marks the session inspecting immediately (the fallback
//! listener is armed in the same breath, so clicks are never lost), but
//! the session only becomes *live* once the probe acknowledges with
//! `INSPECTOR_READY`. Silence past the configured timeout means the
//! target is unreachable and the fallback inspector takes over.
//! `REQUEST_INSPECTION_STATE` stays as a secondary resync for probes that
//! attach later (re-injection after navigation), not as the primary
//! synchronization mechanism.
//!
//! ## Failure policy
//!
//! Nothing here throws past the subsystem boundary: injection exhaustion
//! degrades to fallback, overlay geometry errors only hide the overlay,
//! sends toward an absent probe are dropped by the transport.

use std::sync::Arc;
use std::time::Duration;

use autoview_core::prelude::*;
use autoview_core::{
    Error, FrameworkInfo, HostMessage, InspectionResult, ProbeMessage, Rect,
};
use autoview_probe::transport::HostEndpoint;

use crate::fallback::FallbackInspector;
use crate::inject::InjectionSelector;
use crate::settings::InspectorSettings;
use crate::source_map::SourceMapper;
use crate::surface::PreviewSurface;

/// Callback invoked once per completed click-to-result cycle.
pub type OnResult = Box<dyn Fn(InspectionResult) + Send + Sync>;

/// Per-surface session state. At most one per preview surface; owned
/// exclusively by the controller.
#[derive(Debug, Default)]
pub struct InspectionSession {
    pub is_inspecting: bool,
    /// The probe has acknowledged and is receiving control messages.
    pub probe_live: bool,
    /// Detection snapshot from the most recent `INSPECTOR_READY`.
    pub framework: Option<FrameworkInfo>,
    pub last_result: Option<InspectionResult>,
}

/// The host-rendered highlight overlay. Owned exclusively by the
/// controller and updated last-write-wins on the UI thread.
#[derive(Debug, Clone)]
pub struct HighlightOverlay {
    pub visible: bool,
    pub rect: Option<Rect>,
    pub color: String,
}

impl HighlightOverlay {
    fn new(color: String) -> Self {
        Self {
            visible: false,
            rect: None,
            color,
        }
    }

    fn show(&mut self, rect: Rect) {
        self.rect = Some(rect);
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.rect = None;
    }
}

/// Host-side orchestrator for one preview surface.
pub struct InspectionController {
    surface: Arc<dyn PreviewSurface>,
    settings: InspectorSettings,
    selector: InjectionSelector,
    mapper: SourceMapper,
    fallback: FallbackInspector,
    overlay: HighlightOverlay,
    session: Option<InspectionSession>,
    endpoint: Option<HostEndpoint>,
    /// Whether the current endpoint's probe has ever acknowledged.
    probe_acknowledged: bool,
    on_result: Option<OnResult>,
}

impl InspectionController {
    /// Attach to a preview surface. The host application is responsible
    /// for forwarding surface load events to
    /// [`handle_surface_load`][Self::handle_surface_load] and surface
    /// clicks to [`handle_surface_click`][Self::handle_surface_click].
    pub fn attach(
        surface: Arc<dyn PreviewSurface>,
        settings: InspectorSettings,
        mapper: SourceMapper,
    ) -> Self {
        let overlay = HighlightOverlay::new(settings.highlight_color.clone());
        Self {
            surface,
            settings,
            selector: InjectionSelector::new(),
            mapper,
            fallback: FallbackInspector::new(),
            overlay,
            session: None,
            endpoint: None,
            probe_acknowledged: false,
            on_result: None,
        }
    }

    pub fn is_inspecting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_inspecting)
    }

    pub fn session(&self) -> Option<&InspectionSession> {
        self.session.as_ref()
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    pub fn fallback_active(&self) -> bool {
        self.fallback.is_active()
    }

    /// Start inspecting: create the session, arm the fallback listener,
    /// run the injection ladder, perform the handshake, and send
    /// `START_INSPECTION` once the probe is known to be listening.
    ///
    /// Never fails the caller for target-side problems — an unreachable
    /// target degrades to the fallback inspector.
    pub async fn start(&mut self, on_result: OnResult) -> Result<()> {
        self.on_result = Some(on_result);
        self.session = Some(InspectionSession {
            is_inspecting: true,
            ..Default::default()
        });
        self.fallback.arm();

        match self.selector.inject(self.surface.as_ref()) {
            Ok(Some(injection)) => {
                self.endpoint = Some(injection.endpoint);
                self.probe_acknowledged = false;
            }
            Ok(None) => {
                // Already injected this generation; reuse the endpoint.
            }
            Err(e) => {
                warn!("injection exhausted: {e}");
                self.fallback.activate(self.surface.as_ref());
                return Ok(());
            }
        }

        self.establish_session().await;
        Ok(())
    }

    /// Stop inspecting. Safe and idempotent: with no session or no probe
    /// present this does nothing observable.
    pub fn stop(&mut self) {
        if let Some(session) = &mut self.session {
            if session.is_inspecting {
                if let Some(endpoint) = &self.endpoint {
                    endpoint.commands.send(&HostMessage::StopInspection);
                }
            }
            session.is_inspecting = false;
            session.probe_live = false;
        }
        self.fallback.disarm(self.surface.as_ref());
        self.overlay.hide();
    }

    /// Handshake + `START_INSPECTION`, falling back on silence.
    async fn establish_session(&mut self) {
        if !self.probe_acknowledged {
            match self.await_ready().await {
                Ok(framework) => {
                    self.probe_acknowledged = true;
                    if let Some(session) = &mut self.session {
                        session.framework = Some(framework);
                    }
                }
                Err(e) => {
                    warn!("probe never acknowledged ({e}); activating fallback");
                    self.fallback.activate(self.surface.as_ref());
                    return;
                }
            }
        }
        if let Some(session) = &mut self.session {
            session.probe_live = true;
        }
        self.send_start();
    }

    /// Wait for `INSPECTOR_READY`, bounded by the configured timeout.
    /// Other messages arriving first are handled in order.
    async fn await_ready(&mut self) -> Result<FrameworkInfo> {
        let timeout = Duration::from_millis(self.settings.ready_timeout_ms);
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let endpoint = self.endpoint.as_mut().ok_or(Error::ChannelClosed)?;
            let received = tokio::time::timeout_at(deadline, endpoint.events.recv()).await;
            match received {
                Ok(Some(ProbeMessage::InspectorReady { framework })) => return Ok(framework),
                Ok(Some(other)) => self.handle_probe_message(other),
                Ok(None) => return Err(Error::ChannelClosed),
                Err(_) => return Err(Error::protocol("ready ack timed out")),
            }
        }
    }

    fn send_start(&self) {
        if let Some(endpoint) = &self.endpoint {
            endpoint.commands.send(&HostMessage::StartInspection);
        }
    }

    /// Drain and handle all buffered probe messages. Returns how many
    /// were processed.
    pub fn process_pending(&mut self) -> usize {
        let mut messages = Vec::new();
        if let Some(endpoint) = &mut self.endpoint {
            while let Some(message) = endpoint.events.try_recv() {
                messages.push(message);
            }
        }
        let count = messages.len();
        for message in messages {
            self.handle_probe_message(message);
        }
        count
    }

    /// Wait for one probe message and handle it. Returns `false` when the
    /// transport is gone.
    pub async fn process_one(&mut self) -> bool {
        let Some(endpoint) = self.endpoint.as_mut() else {
            return false;
        };
        match endpoint.events.recv().await {
            Some(message) => {
                self.handle_probe_message(message);
                true
            }
            None => false,
        }
    }

    /// Handle one message from the probe.
    pub fn handle_probe_message(&mut self, message: ProbeMessage) {
        match message {
            ProbeMessage::Hover { rect } => match self.translate_to_host(rect) {
                Ok(host_rect) => self.overlay.show(host_rect),
                Err(e) => {
                    // Geometry failures only ever hide the overlay; the
                    // session stays up.
                    warn!("overlay geometry failed: {e}");
                    self.overlay.hide();
                }
            },
            ProbeMessage::Leave => self.overlay.hide(),
            ProbeMessage::Click {
                dom_node,
                framework,
                component,
            } => {
                let source = component.as_ref().map(|c| self.mapper.map(c));
                let result = InspectionResult {
                    dom_node,
                    framework,
                    source,
                };
                self.deliver(result);
            }
            ProbeMessage::InspectorReady { framework } => {
                // A probe announcing after session start: record the
                // snapshot and consider it live.
                self.probe_acknowledged = true;
                if let Some(session) = &mut self.session {
                    session.framework = Some(framework);
                    if session.is_inspecting {
                        session.probe_live = true;
                    }
                }
            }
            ProbeMessage::RequestInspectionState => {
                // Resync: the probe attached its listeners after our
                // original START. Resend only while inspecting.
                if self.is_inspecting() {
                    self.send_start();
                }
            }
        }
    }

    /// Fallback listener for clicks landing on the surface element
    /// itself. Only produces a result while inspecting without a live
    /// probe — otherwise the probe's own capture handles the click.
    pub fn handle_surface_click(&mut self) {
        let degraded = self
            .session
            .as_ref()
            .is_some_and(|s| s.is_inspecting && !s.probe_live);
        if self.fallback.is_armed() && degraded {
            let result = self.fallback.synthesize(self.surface.as_ref());
            self.deliver(result);
        }
    }

    /// Surface (re)load listener: with an active session, re-run the
    /// injection ladder (the new generation re-arms the registry) and
    /// re-establish the session.
    pub async fn handle_surface_load(&mut self) {
        if !self.is_inspecting() {
            return;
        }
        info!("surface reloaded mid-session; re-injecting");
        self.overlay.hide();
        if let Some(session) = &mut self.session {
            session.probe_live = false;
        }
        match self.selector.inject(self.surface.as_ref()) {
            Ok(Some(injection)) => {
                self.endpoint = Some(injection.endpoint);
                self.probe_acknowledged = false;
                self.establish_session().await;
            }
            Ok(None) => {
                self.establish_session().await;
            }
            Err(e) => {
                warn!("re-injection exhausted after reload: {e}");
                self.fallback.activate(self.surface.as_ref());
            }
        }
    }

    fn deliver(&mut self, result: InspectionResult) {
        if let Some(session) = &mut self.session {
            session.last_result = Some(result.clone());
        }
        if let Some(on_result) = &self.on_result {
            on_result(result);
        }
    }

    /// Translate a target-local rect to host coordinates by the surface's
    /// own bounding box. Non-finite geometry is rejected rather than
    /// rendered.
    fn translate_to_host(&self, rect: Rect) -> Result<Rect> {
        let bounds = self.surface.bounds();
        let translated = rect.translate(bounds.x, bounds.y);
        let finite = [
            translated.x,
            translated.y,
            translated.width,
            translated.height,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::protocol("non-finite overlay geometry"));
        }
        Ok(translated)
    }
}
