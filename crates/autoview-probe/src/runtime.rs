//! # Framework Runtime Model
//!
//! The framework-internal side of the target page: the ownership tree of
//! internal instance nodes ("fibers"), the global scope with framework
//! globals and devtools hooks, and the bindings from DOM elements to
//! fibers.
//!
//! These are *opaque foreign structures* from the inspector's point of
//! view — nothing in here ever crosses the context boundary. The locator
//! reads them, builds a safe descriptor, and lets go.

use std::collections::BTreeMap;

use autoview_core::SourceLocation;

use crate::page::{Document, ElementId};
use crate::value::JsValue;

/// Arena index of a fiber within a [`ComponentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiberId(pub(crate) usize);

/// The type slot of a fiber: host element, component, or built-in marker.
#[derive(Debug, Clone, PartialEq)]
pub enum FiberType {
    /// A raw host element (e.g. a `div`); never a candidate.
    Host(String),
    /// A function component.
    Function { name: String },
    /// A class component.
    Class { name: String },
    /// A forward-ref render object.
    ForwardRef { name: String },
    /// A memoized render object.
    Memo { name: String },
    /// Framework built-in: fragment marker.
    Fragment,
    /// Framework built-in: strict-mode marker.
    StrictMode,
}

impl FiberType {
    /// Whether this type is function-like or render-object-like — i.e. a
    /// component rather than a host tag or built-in marker.
    pub fn is_component(&self) -> bool {
        matches!(
            self,
            Self::Function { .. } | Self::Class { .. } | Self::ForwardRef { .. } | Self::Memo { .. }
        )
    }

    /// Component name, when this type has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function { name }
            | Self::Class { name }
            | Self::ForwardRef { name }
            | Self::Memo { name } => Some(name),
            _ => None,
        }
    }
}

/// One internal instance node in the ownership tree.
#[derive(Debug, Clone)]
pub struct Fiber {
    pub fiber_type: FiberType,
    /// The "return" link: the owner this fiber was rendered by.
    pub return_owner: Option<FiberId>,
    /// The DOM element this fiber rendered (host fibers: their element;
    /// component fibers: their nearest rendered host element, if any).
    pub host_node: Option<ElementId>,
    /// Debug-source metadata attached to the node itself.
    pub debug_source: Option<SourceLocation>,
    /// Debug-source metadata compiled onto the component type.
    pub type_debug_source: Option<SourceLocation>,
    pub props: BTreeMap<String, JsValue>,
    pub state: BTreeMap<String, JsValue>,
    pub display_name: Option<String>,
}

impl Fiber {
    pub fn new(fiber_type: FiberType) -> Self {
        Self {
            fiber_type,
            return_owner: None,
            host_node: None,
            debug_source: None,
            type_debug_source: None,
            props: BTreeMap::new(),
            state: BTreeMap::new(),
            display_name: None,
        }
    }
}

/// Arena of fibers for one renderer.
#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    fibers: Vec<Fiber>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fiber: Fiber) -> FiberId {
        let id = FiberId(self.fibers.len());
        self.fibers.push(fiber);
        id
    }

    pub fn fiber(&self, id: FiberId) -> &Fiber {
        &self.fibers[id.0]
    }

    pub fn fiber_mut(&mut self, id: FiberId) -> &mut Fiber {
        &mut self.fibers[id.0]
    }

    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Resolve a fiber id carried in an element expando property.
    ///
    /// Instance-reference properties store the fiber's arena index as a
    /// number; anything else (or out of range) resolves to `None`.
    pub fn resolve_property(&self, value: &JsValue) -> Option<FiberId> {
        let index = value.as_f64()?;
        if index < 0.0 || index.fract() != 0.0 {
            return None;
        }
        let index = index as usize;
        (index < self.fibers.len()).then_some(FiberId(index))
    }
}

/// A stack frame captured in the target context at click time.
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A devtools hook registered in the target global scope.
///
/// Each registered renderer can resolve DOM elements to its own internal
/// nodes; the locator asks them in registration order.
#[derive(Debug, Clone, Default)]
pub struct DevtoolsHook {
    renderers: Vec<BTreeMap<ElementId, FiberId>>,
}

impl DevtoolsHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_renderer(&mut self, bindings: BTreeMap<ElementId, FiberId>) {
        self.renderers.push(bindings);
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Ask each renderer, in order, to resolve the element.
    pub fn resolve_element(&self, element: ElementId) -> Option<FiberId> {
        self.renderers
            .iter()
            .find_map(|bindings| bindings.get(&element).copied())
    }
}

/// The target global scope: framework globals, devtools hooks, and the
/// environment facts the locator's last-resort strategies consult.
#[derive(Debug, Clone, Default)]
pub struct GlobalScope {
    globals: BTreeMap<String, JsValue>,
    pub react_devtools: Option<DevtoolsHook>,
    pub vue_devtools: bool,
    /// Synthetic "current call stack" visible at click time.
    pub stack_frames: Vec<StackFrame>,
    /// Bundler module registry: component identity → module path.
    pub module_registry: BTreeMap<String, String>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_global(&mut self, name: &str, value: JsValue) {
        self.globals.insert(name.to_string(), value);
    }

    pub fn global(&self, name: &str) -> Option<&JsValue> {
        self.globals.get(name)
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }
}

/// Everything the probe can reach inside the target context.
#[derive(Debug, Clone, Default)]
pub struct TargetPage {
    pub document: Document,
    pub scope: GlobalScope,
    pub components: ComponentTree,
}

impl TargetPage {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            scope: GlobalScope::new(),
            components: ComponentTree::new(),
        }
    }

    /// Bind a fiber to the element it rendered: sets the fiber's host node
    /// and writes the instance-reference expando property the way a
    /// framework runtime would (`__reactFiber$<suffix>`).
    pub fn bind_fiber(&mut self, element: ElementId, fiber: FiberId, key_suffix: &str) {
        self.components.fiber_mut(fiber).host_node = Some(element);
        self.document.set_property(
            element,
            &format!("__reactFiber${key_suffix}"),
            JsValue::Number(fiber.0 as f64),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiber_type_is_component() {
        assert!(FiberType::Function {
            name: "Button".into()
        }
        .is_component());
        assert!(FiberType::Class {
            name: "Legacy".into()
        }
        .is_component());
        assert!(FiberType::Memo {
            name: "Row".into()
        }
        .is_component());
        assert!(!FiberType::Host("div".into()).is_component());
        assert!(!FiberType::Fragment.is_component());
        assert!(!FiberType::StrictMode.is_component());
    }

    #[test]
    fn test_fiber_type_name() {
        assert_eq!(
            FiberType::ForwardRef {
                name: "Input".into()
            }
            .name(),
            Some("Input")
        );
        assert_eq!(FiberType::Host("div".into()).name(), None);
        assert_eq!(FiberType::Fragment.name(), None);
    }

    #[test]
    fn test_component_tree_arena() {
        let mut tree = ComponentTree::new();
        let a = tree.add(Fiber::new(FiberType::Host("div".into())));
        let b = tree.add(Fiber::new(FiberType::Function {
            name: "App".into(),
        }));
        tree.fiber_mut(b).return_owner = Some(a);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.fiber(b).return_owner, Some(a));
    }

    #[test]
    fn test_resolve_property_bounds_checked() {
        let mut tree = ComponentTree::new();
        let id = tree.add(Fiber::new(FiberType::Fragment));
        assert_eq!(tree.resolve_property(&JsValue::Number(0.0)), Some(id));
        assert_eq!(tree.resolve_property(&JsValue::Number(5.0)), None);
        assert_eq!(tree.resolve_property(&JsValue::Number(-1.0)), None);
        assert_eq!(tree.resolve_property(&JsValue::Number(0.5)), None);
        assert_eq!(tree.resolve_property(&JsValue::str("0")), None);
    }

    #[test]
    fn test_devtools_hook_renderer_order() {
        let mut tree = ComponentTree::new();
        let f1 = tree.add(Fiber::new(FiberType::Fragment));
        let f2 = tree.add(Fiber::new(FiberType::Fragment));

        let el = ElementId(3);
        let mut hook = DevtoolsHook::new();
        hook.register_renderer([(el, f2)].into_iter().collect());
        hook.register_renderer([(el, f1)].into_iter().collect());

        // First registered renderer wins.
        assert_eq!(hook.resolve_element(el), Some(f2));
        assert_eq!(hook.resolve_element(ElementId(9)), None);
    }

    #[test]
    fn test_global_scope_roundtrip() {
        let mut scope = GlobalScope::new();
        scope.set_global("React", JsValue::object([("version", JsValue::str("18.2.0"))]));
        assert!(scope.has_global("React"));
        assert_eq!(
            scope
                .global("React")
                .and_then(|v| v.get("version"))
                .and_then(JsValue::as_str),
            Some("18.2.0")
        );
    }

    #[test]
    fn test_bind_fiber_writes_instance_key_and_host_node() {
        let mut page = TargetPage::new();
        let el = page.document.append_element(page.document.body(), "div");
        let fiber = page.components.add(Fiber::new(FiberType::Host("div".into())));
        page.bind_fiber(el, fiber, "k3j9x");

        assert_eq!(page.components.fiber(fiber).host_node, Some(el));
        let value = page.document.element(el).property("__reactFiber$k3j9x");
        assert_eq!(page.components.resolve_property(value.unwrap()), Some(fiber));
    }
}
