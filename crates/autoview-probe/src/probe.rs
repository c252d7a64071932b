//! # The Injected Probe
//!
//! The code that runs *inside* the target execution context. It owns event
//! capture, the in-page highlight overlay, and — on click — the framework
//! detection and component location that feed the `INSPECT_CLICK` payload.
//!
//! Inspection state here is driven solely by `START_INSPECTION` /
//! `STOP_INSPECTION` control messages, never by host-side state: the two
//! contexts cannot share memory, so each keeps its own `is_inspecting`
//! flag and the wire protocol keeps them converged.

use autoview_core::prelude::*;
use autoview_core::{DomNodeInfo, HostMessage, ProbeMessage, Rect};
use tokio::sync::mpsc;

use crate::detect::{adapter_for, detect_framework};
use crate::page::{Document, ElementId};
use crate::runtime::TargetPage;
use crate::transport::{EventSender, TargetEndpoint};

/// Marker attribute on the overlay element the probe appends to the page.
const OVERLAY_MARKER_ATTR: &str = "data-autoview-overlay";

/// Overlay border color while hovering.
const OVERLAY_COLOR: &str = "#6366f1";

/// Overlay border color flashed briefly on click as user feedback.
const OVERLAY_FLASH_COLOR: &str = "#f59e0b";

/// A pointer event dispatched to the probe's capture-phase listeners.
///
/// The probe pre-empts the target app's own handlers on click: it sets
/// both flags, which the surface honors before bubbling the event onward.
#[derive(Debug)]
pub struct PointerEvent {
    pub target: ElementId,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl PointerEvent {
    pub fn new(target: ElementId) -> Self {
        Self {
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }
}

/// Pointer actions the surface feeds into the target event loop.
#[derive(Debug, Clone, Copy)]
pub enum PointerAction {
    Over(ElementId),
    Out(ElementId),
    Click(ElementId),
}

/// The in-page highlight overlay. Created lazily on first hover, reused
/// for the rest of the session.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub element: ElementId,
    pub visible: bool,
    pub rect: Rect,
    pub border_color: &'static str,
}

/// The probe's per-context state.
pub struct Probe {
    is_inspecting: bool,
    overlay: Option<Overlay>,
    events: EventSender,
}

impl Probe {
    pub fn new(events: EventSender) -> Self {
        Self {
            is_inspecting: false,
            overlay: None,
            events,
        }
    }

    pub fn is_inspecting(&self) -> bool {
        self.is_inspecting
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Announce the probe to the host: detection snapshot first (the
    /// handshake ack), then a state request in case a session was already
    /// live before this probe attached (re-injection after navigation).
    pub fn announce(&self, page: &TargetPage) {
        let framework = detect_framework(page);
        self.events
            .post(&ProbeMessage::InspectorReady { framework });
        self.events.post(&ProbeMessage::RequestInspectionState);
    }

    /// Handle a control message from the host.
    pub fn handle_control(&mut self, message: HostMessage) {
        match message {
            HostMessage::StartInspection => {
                debug!("probe: inspection started");
                self.is_inspecting = true;
            }
            HostMessage::StopInspection => {
                debug!("probe: inspection stopped");
                self.is_inspecting = false;
                if let Some(overlay) = &mut self.overlay {
                    overlay.visible = false;
                }
            }
        }
    }

    /// Capture-phase mouseover: position the overlay and report the rect.
    pub fn on_mouse_over(&mut self, page: &mut TargetPage, target: ElementId) {
        if !self.is_inspecting {
            return;
        }
        let rect = page.document.element(target).bounds();
        self.position_overlay(&mut page.document, rect);
        self.events.post(&ProbeMessage::Hover { rect });
    }

    /// Capture-phase mouseout: hide the overlay.
    pub fn on_mouse_out(&mut self, _page: &mut TargetPage, _target: ElementId) {
        if !self.is_inspecting {
            return;
        }
        if let Some(overlay) = &mut self.overlay {
            overlay.visible = false;
        }
        self.events.post(&ProbeMessage::Leave);
    }

    /// Capture-phase click: pre-empt the app's own handlers, inspect the
    /// element, and post the full click payload.
    pub fn on_click(&mut self, page: &mut TargetPage, event: &mut PointerEvent) {
        if !self.is_inspecting {
            return;
        }
        event.default_prevented = true;
        event.propagation_stopped = true;

        let dom_node = build_dom_node_info(&page.document, event.target);
        let framework = detect_framework(page);

        let component = adapter_for(framework.kind).and_then(|adapter| {
            adapter
                .locate(page, event.target)
                .map(|located| adapter.describe(page, &located))
        });

        // Brief feedback flash; the next hover repositions and resets it.
        if let Some(overlay) = &mut self.overlay {
            overlay.border_color = OVERLAY_FLASH_COLOR;
        }

        self.events.post(&ProbeMessage::Click {
            dom_node,
            framework,
            component,
        });
    }

    fn position_overlay(&mut self, document: &mut Document, rect: Rect) {
        match &mut self.overlay {
            Some(overlay) => {
                overlay.rect = rect;
                overlay.visible = true;
                overlay.border_color = OVERLAY_COLOR;
                document.set_bounds(overlay.element, rect);
            }
            None => {
                let element = document.append_element(document.body(), "div");
                document.set_attribute(element, OVERLAY_MARKER_ATTR, "true");
                document.set_bounds(element, rect);
                self.overlay = Some(Overlay {
                    element,
                    visible: true,
                    rect,
                    border_color: OVERLAY_COLOR,
                });
            }
        }
    }
}

/// Run the probe's event loop inside the target context.
///
/// Multiplexes control messages from the host with pointer events from
/// the page. Exits when both inputs close (navigation teardown).
pub async fn run(
    page: std::sync::Arc<std::sync::Mutex<TargetPage>>,
    endpoint: TargetEndpoint,
    mut pointer: mpsc::UnboundedReceiver<PointerAction>,
) {
    let TargetEndpoint {
        events,
        mut commands,
    } = endpoint;
    let mut probe = Probe::new(events);

    {
        let page = page.lock().unwrap_or_else(|e| e.into_inner());
        probe.announce(&page);
    }

    loop {
        tokio::select! {
            // Control messages take precedence over pointer events so a
            // START already in flight is never outrun by a click.
            biased;
            command = commands.recv() => match command {
                Some(message) => probe.handle_control(message),
                None => break,
            },
            action = pointer.recv() => match action {
                Some(PointerAction::Over(target)) => {
                    let mut page = page.lock().unwrap_or_else(|e| e.into_inner());
                    probe.on_mouse_over(&mut page, target);
                }
                Some(PointerAction::Out(target)) => {
                    let mut page = page.lock().unwrap_or_else(|e| e.into_inner());
                    probe.on_mouse_out(&mut page, target);
                }
                Some(PointerAction::Click(target)) => {
                    let mut page = page.lock().unwrap_or_else(|e| e.into_inner());
                    let mut event = PointerEvent::new(target);
                    probe.on_click(&mut page, &mut event);
                }
                None => break,
            },
        }
    }
    debug!("probe event loop exited");
}

// ─────────────────────────────────────────────────────────
// DOM fact extraction
// ─────────────────────────────────────────────────────────

/// Assemble the structural facts for a clicked element.
pub fn build_dom_node_info(document: &Document, element: ElementId) -> DomNodeInfo {
    let el = document.element(element);
    DomNodeInfo {
        tag_name: el.tag().to_string(),
        class_list: el.class_list().to_vec(),
        attributes: el.attributes().clone(),
        xpath: compute_xpath(document, element),
        css_selector: compute_css_selector(document, element),
        bounding_box: el.bounds(),
    }
}

/// Compute an absolute XPath for an element.
///
/// Id-addressed when the element has an id; otherwise the parent's path
/// plus the tag name and 1-based index among same-tag siblings,
/// terminating at `document.body`.
pub fn compute_xpath(document: &Document, element: ElementId) -> String {
    if let Some(id) = document.element(element).id() {
        return format!("//*[@id=\"{id}\"]");
    }
    if element == document.body() {
        return "/html/body".to_string();
    }
    let parent = match document.element(element).parent() {
        Some(p) => p,
        None => return "/html".to_string(),
    };

    let tag = document.element(element).tag();
    let index = document.sibling_index(element);
    format!("{}/{tag}[{index}]", compute_xpath(document, parent))
}

/// Compute a best-effort CSS selector: id if present, else tag plus
/// dot-joined class list, else bare tag.
pub fn compute_css_selector(document: &Document, element: ElementId) -> String {
    let el = document.element(element);
    if let Some(id) = el.id() {
        return format!("#{id}");
    }
    if el.class_list().is_empty() {
        el.tag().to_string()
    } else {
        format!("{}.{}", el.tag(), el.class_list().join("."))
    }
}
