//! End-to-end inspection flows: a host controller attached to an embedded
//! surface with a live probe task, driven through real pointer events.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use autoview_core::{
    ComponentDescriptor, Confidence, FrameworkKind, InspectionResult, Rect, SourceLocation,
};
use autoview_host::{
    FileSearch, InspectionController, InspectorSettings, PreviewSurface, SearchHit, SourceMapper,
    SurfaceCapabilities, SurfaceId, TextSearch,
};
use autoview_host::{EmbeddedSurface, WorkspaceSearch};
use autoview_probe::{Fiber, FiberType, JsValue, PointerAction, TargetPage};

// ─────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────

struct EmptySearch;

impl TextSearch for EmptySearch {
    fn search(&self, _: &str, _: &[String]) -> autoview_core::Result<Vec<SearchHit>> {
        Ok(vec![])
    }
}

impl FileSearch for EmptySearch {
    fn find_files(&self, _: &str) -> autoview_core::Result<Vec<std::path::PathBuf>> {
        Ok(vec![])
    }
}

fn empty_mapper() -> SourceMapper {
    SourceMapper::new(Arc::new(EmptySearch), Arc::new(EmptySearch), vec![])
}

fn fast_settings() -> InspectorSettings {
    InspectorSettings {
        ready_timeout_ms: 200,
        ..Default::default()
    }
}

type Results = Arc<Mutex<Vec<InspectionResult>>>;

fn collecting_callback() -> (Results, autoview_host::OnResult) {
    let results: Results = Arc::new(Mutex::new(Vec::new()));
    let sink = results.clone();
    (results, Box::new(move |r| sink.lock().unwrap().push(r)))
}

/// A React page with body > div#root(App) > div.todo-item(TodoItem),
/// TodoItem carrying debug source app/TodoItem.tsx:12.
fn react_todo_page() -> (TargetPage, autoview_probe::ElementId) {
    let mut page = TargetPage::new();
    page.scope.set_global(
        "React",
        JsValue::object([("version", JsValue::str("18.3.1"))]),
    );

    let body = page.document.body();
    let root = page.document.append_element(body, "div");
    page.document.set_attribute(root, "id", "root");
    page.document.set_bounds(root, Rect::new(0.0, 0.0, 800.0, 600.0));

    let item = page.document.append_element(root, "div");
    page.document.add_class(item, "todo-item");
    page.document.set_bounds(item, Rect::new(16.0, 40.0, 400.0, 32.0));

    let app = page.components.add(Fiber::new(FiberType::Function {
        name: "App".into(),
    }));
    let todo = page.components.add(Fiber::new(FiberType::Function {
        name: "TodoItem".into(),
    }));
    let host = page
        .components
        .add(Fiber::new(FiberType::Host("div".into())));

    page.components.fiber_mut(app).host_node = Some(root);
    page.components.fiber_mut(todo).return_owner = Some(app);
    page.components.fiber_mut(todo).debug_source =
        Some(SourceLocation::new("app/TodoItem.tsx", Some(12), Some(8)));
    let mut props = BTreeMap::new();
    props.insert("label".to_string(), JsValue::str("Buy milk"));
    props.insert("onToggle".to_string(), JsValue::func());
    page.components.fiber_mut(todo).props = props;
    page.components.fiber_mut(host).return_owner = Some(todo);
    page.components.fiber_mut(todo).host_node = Some(item);
    page.bind_fiber(item, host, "e2e01");

    (page, item)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ─────────────────────────────────────────────────────────
// Same-origin React page: click resolves component + source
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn click_resolves_component_and_source() {
    let (page, item) = react_todo_page();
    let surface = EmbeddedSurface::new(
        SurfaceId(1),
        Rect::new(50.0, 60.0, 1024.0, 768.0),
        page,
        SurfaceCapabilities::same_origin(),
    );
    let mut controller = InspectionController::attach(
        surface.clone() as Arc<dyn PreviewSurface>,
        fast_settings(),
        empty_mapper(),
    );

    let (results, callback) = collecting_callback();
    controller.start(callback).await.unwrap();
    assert!(controller.session().unwrap().probe_live);
    assert_eq!(
        controller.session().unwrap().framework.as_ref().unwrap().kind,
        FrameworkKind::React
    );

    assert!(surface.dispatch(PointerAction::Click(item)));
    settle().await;
    controller.process_pending();

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];

    assert_eq!(result.dom_node.tag_name, "div");
    assert_eq!(result.dom_node.css_selector, "div.todo-item");
    assert_eq!(result.framework.kind, FrameworkKind::React);
    assert_eq!(result.framework.version.as_deref(), Some("18.3.1"));

    let source = result.source.as_ref().unwrap();
    assert_eq!(source.component.component_name, "TodoItem");
    assert_eq!(source.confidence, Confidence::High);
    let primary = source.primary.as_ref().unwrap();
    assert_eq!(primary.file_path, "app/TodoItem.tsx");
    assert_eq!(primary.line_number, Some(12));
    // High-confidence primary leads the candidate list.
    assert_eq!(source.possible_sources[0], *primary);
    // Safe-copied props: primitive verbatim, function as placeholder.
    assert_eq!(
        source.component.props["label"],
        serde_json::json!("Buy milk")
    );
    assert_eq!(
        source.component.props["onToggle"],
        serde_json::json!("[Function]")
    );
}

// ─────────────────────────────────────────────────────────
// Cross-origin target: fallback inspection
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn cross_origin_falls_back_to_surface_inspection() {
    let surface = EmbeddedSurface::new(
        SurfaceId(2),
        Rect::new(0.0, 0.0, 640.0, 480.0),
        TargetPage::new(),
        SurfaceCapabilities::cross_origin(),
    );
    let mut controller = InspectionController::attach(
        surface.clone() as Arc<dyn PreviewSurface>,
        fast_settings(),
        empty_mapper(),
    );

    let (results, callback) = collecting_callback();
    controller.start(callback).await.unwrap();

    assert!(controller.fallback_active());
    assert!(surface.inspect_cursor());
    assert!(!controller.session().unwrap().probe_live);

    // The user clicks the opaque surface element.
    controller.handle_surface_click();

    let results = results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].dom_node.tag_name, "iframe-fallback");
    assert_eq!(results[0].framework.kind, FrameworkKind::Unknown);
    assert!(results[0].framework.version.is_some());
    assert!(results[0].source.is_none());
}

// ─────────────────────────────────────────────────────────
// Stop with no active session
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn stop_without_session_is_a_noop() {
    let surface = EmbeddedSurface::new(
        SurfaceId(3),
        Rect::zero(),
        TargetPage::new(),
        SurfaceCapabilities::same_origin(),
    );
    let mut controller = InspectionController::attach(
        surface.clone() as Arc<dyn PreviewSurface>,
        fast_settings(),
        empty_mapper(),
    );

    controller.stop();
    assert!(!controller.is_inspecting());
    assert!(!surface.probe_running());
}

// ─────────────────────────────────────────────────────────
// The wrapper-vs-widget selection policy, exercised through a full
// click (the same policy has unit coverage in the locator).
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn specific_component_beats_generic_wrapper() {
    // body > div(GenericLayout) > button — the button's own fiber chain
    // is [host, SpecificButton(has source), GenericLayout], none a direct
    // match for the clicked button.
    let mut page = TargetPage::new();
    page.scope.set_global("React", JsValue::object([("version", JsValue::str("18.0.0"))]));

    let body = page.document.body();
    let layout_el = page.document.append_element(body, "div");
    page.document.set_bounds(layout_el, Rect::new(0.0, 0.0, 500.0, 500.0));
    let button_el = page.document.append_element(layout_el, "button");
    page.document.set_bounds(button_el, Rect::new(10.0, 10.0, 120.0, 40.0));

    let layout = page.components.add(Fiber::new(FiberType::Function {
        name: "GenericLayout".into(),
    }));
    let specific = page.components.add(Fiber::new(FiberType::Function {
        name: "SpecificButton".into(),
    }));
    let host = page
        .components
        .add(Fiber::new(FiberType::Host("button".into())));

    page.components.fiber_mut(layout).host_node = Some(layout_el);
    page.components.fiber_mut(specific).return_owner = Some(layout);
    page.components.fiber_mut(specific).type_debug_source =
        Some(SourceLocation::new("src/SpecificButton.tsx", Some(4), None));
    page.components.fiber_mut(host).return_owner = Some(specific);
    page.bind_fiber(button_el, host, "e2e02");

    let surface = EmbeddedSurface::new(
        SurfaceId(4),
        Rect::zero(),
        page,
        SurfaceCapabilities::same_origin(),
    );
    let mut controller = InspectionController::attach(
        surface.clone() as Arc<dyn PreviewSurface>,
        fast_settings(),
        empty_mapper(),
    );

    let (results, callback) = collecting_callback();
    controller.start(callback).await.unwrap();

    surface.dispatch(PointerAction::Click(button_el));
    settle().await;
    controller.process_pending();

    let results = results.lock().unwrap();
    let source = results[0].source.as_ref().unwrap();
    assert_eq!(source.component.component_name, "SpecificButton");
}

// ─────────────────────────────────────────────────────────
// Hover/leave overlay flow
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn hover_then_leave_drives_host_overlay() {
    let (page, item) = react_todo_page();
    let surface = EmbeddedSurface::new(
        SurfaceId(5),
        Rect::new(100.0, 200.0, 1024.0, 768.0),
        page,
        SurfaceCapabilities::same_origin(),
    );
    let mut controller = InspectionController::attach(
        surface.clone() as Arc<dyn PreviewSurface>,
        fast_settings(),
        empty_mapper(),
    );
    let (_results, callback) = collecting_callback();
    controller.start(callback).await.unwrap();

    surface.dispatch(PointerAction::Over(item));
    settle().await;
    controller.process_pending();

    let overlay = controller.overlay();
    assert!(overlay.visible);
    // Target-local (16, 40) offset by the surface origin (100, 200).
    let rect = overlay.rect.unwrap();
    assert_eq!(rect.x, 116.0);
    assert_eq!(rect.y, 240.0);

    surface.dispatch(PointerAction::Out(item));
    settle().await;
    controller.process_pending();
    assert!(!controller.overlay().visible);
}

// ─────────────────────────────────────────────────────────
// Reload mid-session: re-injection handshake
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn reload_reinjects_and_inspection_continues() {
    let (page, item) = react_todo_page();
    let surface = EmbeddedSurface::new(
        SurfaceId(6),
        Rect::zero(),
        page,
        SurfaceCapabilities::same_origin(),
    );
    let mut controller = InspectionController::attach(
        surface.clone() as Arc<dyn PreviewSurface>,
        fast_settings(),
        empty_mapper(),
    );
    let (results, callback) = collecting_callback();
    controller.start(callback).await.unwrap();

    surface.reload();
    controller.handle_surface_load().await;
    assert!(controller.session().unwrap().probe_live);

    surface.dispatch(PointerAction::Click(item));
    settle().await;
    controller.process_pending();
    assert_eq!(results.lock().unwrap().len(), 1);
}

// ─────────────────────────────────────────────────────────
// Source mapper against a real workspace
// ─────────────────────────────────────────────────────────

#[tokio::test]
async fn name_search_fills_in_missing_debug_source() {
    // The component has no debug metadata; the mapper's declaration
    // search over a real (temp) workspace supplies a medium candidate.
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(
        src.join("CartSummary.tsx"),
        "export function CartSummary() {\n  return null;\n}\n",
    )
    .unwrap();

    let workspace = Arc::new(WorkspaceSearch::new(dir.path()));
    let mapper = SourceMapper::new(
        workspace.clone(),
        workspace,
        vec!["**/*.tsx".to_string()],
    );

    let info = mapper.map(&ComponentDescriptor::new("CartSummary"));
    assert_eq!(info.confidence, Confidence::Medium);
    let primary = info.primary.as_ref().unwrap();
    assert!(primary.file_path.ends_with("CartSummary.tsx"));
    assert_eq!(primary.line_number, Some(1));
    assert_eq!(primary.relative_path.as_deref(), Some("src/CartSummary.tsx"));
}
