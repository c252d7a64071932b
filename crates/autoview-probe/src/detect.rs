//! Framework detection over passive page signals.
//!
//! Detection is a pure function over the target global scope and DOM. Each
//! supported framework gets one [`FrameworkAdapter`]; the detector asks
//! them in priority order (React, Vue, Angular, Svelte) and the first
//! match wins. Only the React adapter can locate components — the others
//! are detect-only and report an introspection miss on `locate`.
//!
//! Version extraction is best-effort: read from the detected global object
//! or a marker attribute, absent otherwise.

use autoview_core::{ComponentDescriptor, FrameworkInfo, FrameworkKind};

use crate::locate::{self, LocatedComponent};
use crate::page::ElementId;
use crate::runtime::TargetPage;
use crate::value::JsValue;

/// Instance-reference property prefixes written by modern React renderers.
pub const INSTANCE_KEY_PREFIXES: &[&str] = &["__reactFiber$", "__reactInternalInstance$"];

/// Legacy direct property names from older React versions.
pub const LEGACY_INSTANCE_KEYS: &[&str] = &["_reactInternalFiber", "_reactInternalInstance"];

/// Container-reference property prefixes found on React root containers.
const ROOT_CONTAINER_PREFIXES: &[&str] = &["__reactContainer$", "_reactRootContainer"];

/// Element ids conventionally used for React root containers.
const KNOWN_ROOT_IDS: &[&str] = &["root", "app"];

/// Capability adapter for one framework family.
///
/// `detect` classifies from passive signals; `locate` resolves a DOM
/// element to its owning component node; `describe` builds the safe
/// descriptor. Detect-only adapters return `None` from `locate`, which
/// the probe reports as a null component (never an error).
pub trait FrameworkAdapter: Sync {
    fn kind(&self) -> FrameworkKind;

    fn detect(&self, page: &TargetPage) -> Option<FrameworkInfo>;

    fn locate(&self, page: &TargetPage, element: ElementId) -> Option<LocatedComponent>;

    fn describe(&self, page: &TargetPage, located: &LocatedComponent) -> ComponentDescriptor {
        locate::describe_component(page, located)
    }
}

/// Adapters in detection priority order.
pub const ADAPTERS: &[&dyn FrameworkAdapter] =
    &[&ReactAdapter, &VueAdapter, &AngularAdapter, &SvelteAdapter];

/// Classify the page, first adapter match wins.
pub fn detect_framework(page: &TargetPage) -> FrameworkInfo {
    ADAPTERS
        .iter()
        .find_map(|adapter| adapter.detect(page))
        .unwrap_or_else(FrameworkInfo::unknown)
}

/// Get the adapter for a detected framework kind, if one exists.
pub fn adapter_for(kind: FrameworkKind) -> Option<&'static dyn FrameworkAdapter> {
    ADAPTERS.iter().copied().find(|a| a.kind() == kind)
}

/// Whether a property key is an instance-reference key (modern or legacy).
pub fn is_instance_key(key: &str) -> bool {
    INSTANCE_KEY_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
        || LEGACY_INSTANCE_KEYS.contains(&key)
}

fn version_of(global: &JsValue) -> Option<String> {
    global
        .get("version")
        .and_then(JsValue::as_str)
        .map(str::to_string)
}

// ─────────────────────────────────────────────────────────
// React
// ─────────────────────────────────────────────────────────

pub struct ReactAdapter;

impl ReactAdapter {
    fn has_react_signal(page: &TargetPage) -> bool {
        // 1. Global framework object.
        if page.scope.has_global("React") {
            return true;
        }

        let elements = page.document.all_elements();

        // 2. Root marker attribute (pre-18 ReactDOM.render roots).
        if elements
            .iter()
            .any(|&el| page.document.element(el).attribute("data-reactroot").is_some())
        {
            return true;
        }

        // 3. Known root-container id carrying a container reference.
        for &el in &elements {
            let element = page.document.element(el);
            let is_known_root = element.id().is_some_and(|id| KNOWN_ROOT_IDS.contains(&id));
            if is_known_root
                && element
                    .property_keys()
                    .any(|k| ROOT_CONTAINER_PREFIXES.iter().any(|p| k.starts_with(p)))
            {
                return true;
            }
        }

        // 4. Per-element internal instance keys anywhere in the tree.
        if elements.iter().any(|&el| {
            page.document
                .element(el)
                .property_keys()
                .any(is_instance_key)
        }) {
            return true;
        }

        // 5. Registered devtools hook.
        page.scope.react_devtools.is_some()
    }
}

impl FrameworkAdapter for ReactAdapter {
    fn kind(&self) -> FrameworkKind {
        FrameworkKind::React
    }

    fn detect(&self, page: &TargetPage) -> Option<FrameworkInfo> {
        if !Self::has_react_signal(page) {
            return None;
        }
        let mut info = FrameworkInfo::new(FrameworkKind::React)
            .with_devtools(page.scope.react_devtools.is_some());
        info.version = page.scope.global("React").and_then(version_of);
        Some(info)
    }

    fn locate(&self, page: &TargetPage, element: ElementId) -> Option<LocatedComponent> {
        locate::locate_component(page, element)
    }
}

// ─────────────────────────────────────────────────────────
// Vue
// ─────────────────────────────────────────────────────────

pub struct VueAdapter;

impl FrameworkAdapter for VueAdapter {
    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Vue
    }

    fn detect(&self, page: &TargetPage) -> Option<FrameworkInfo> {
        let elements = page.document.all_elements();
        let has_root_marker = elements.iter().any(|&el| {
            let element = page.document.element(el);
            element.attribute("data-v-app").is_some()
                || element.property("__vue_app__").is_some()
                || element.attribute("data-server-rendered") == Some("true")
        });

        let detected = page.scope.has_global("Vue")
            || page.scope.vue_devtools
            || page.scope.has_global("__VUE_DEVTOOLS_GLOBAL_HOOK__")
            || has_root_marker;
        if !detected {
            return None;
        }

        let mut info = FrameworkInfo::new(FrameworkKind::Vue).with_devtools(
            page.scope.vue_devtools || page.scope.has_global("__VUE_DEVTOOLS_GLOBAL_HOOK__"),
        );
        info.version = page.scope.global("Vue").and_then(version_of);
        Some(info)
    }

    fn locate(&self, _page: &TargetPage, _element: ElementId) -> Option<LocatedComponent> {
        None
    }
}

// ─────────────────────────────────────────────────────────
// Angular
// ─────────────────────────────────────────────────────────

pub struct AngularAdapter;

impl FrameworkAdapter for AngularAdapter {
    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Angular
    }

    fn detect(&self, page: &TargetPage) -> Option<FrameworkInfo> {
        let version_attr = page.document.all_elements().into_iter().find_map(|el| {
            page.document
                .element(el)
                .attribute("ng-version")
                .map(str::to_string)
        });

        if !page.scope.has_global("ng") && version_attr.is_none() {
            return None;
        }

        let mut info = FrameworkInfo::new(FrameworkKind::Angular);
        info.version = version_attr;
        Some(info)
    }

    fn locate(&self, _page: &TargetPage, _element: ElementId) -> Option<LocatedComponent> {
        None
    }
}

// ─────────────────────────────────────────────────────────
// Svelte
// ─────────────────────────────────────────────────────────

pub struct SvelteAdapter;

impl FrameworkAdapter for SvelteAdapter {
    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Svelte
    }

    fn detect(&self, page: &TargetPage) -> Option<FrameworkInfo> {
        let has_scoped_class = page.document.all_elements().into_iter().any(|el| {
            page.document
                .element(el)
                .class_list()
                .iter()
                .any(|c| c.starts_with("svelte-"))
        });

        if !page.scope.has_global("__svelte") && !has_scoped_class {
            return None;
        }
        Some(FrameworkInfo::new(FrameworkKind::Svelte))
    }

    fn locate(&self, _page: &TargetPage, _element: ElementId) -> Option<LocatedComponent> {
        None
    }
}
