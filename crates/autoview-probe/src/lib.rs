//! # autoview-probe - Target-Context Model
//!
//! Everything that conceptually executes *inside* the inspected preview
//! surface: the page/DOM model, the framework runtime internals, the
//! framework adapters, the component locator, the injected probe itself,
//! and the structural-clone transport connecting the two contexts.
//!
//! Depends on [`autoview_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Page Model (`page`, `value`, `runtime`)
//! - [`Document`], [`Element`], [`ElementId`] - Arena-backed DOM tree with
//!   selector/xpath query evaluation
//! - [`JsValue`] - Target-runtime values and the safe-copy rule
//! - [`TargetPage`], [`GlobalScope`], [`ComponentTree`], [`Fiber`] - The
//!   framework-internal structures the locator introspects
//!
//! ### Detection & Location (`detect`, `locate`)
//! - [`FrameworkAdapter`] - Capability adapter, one per framework family
//! - [`detect_framework()`] - Priority-ordered classification
//! - [`locate_component()`], [`describe_component()`] - The locator pipeline
//!
//! ### The Probe (`probe`)
//! - [`Probe`] - Event capture, overlay, click payload assembly
//! - [`probe::run()`] - The target-context event loop
//! - [`compute_xpath()`], [`compute_css_selector()`] - Element addressing
//!
//! ### Transport (`transport`)
//! - [`transport::connect()`] - Create a connected endpoint pair
//! - [`HostEndpoint`], [`TargetEndpoint`] - The two halves

pub mod detect;
pub mod locate;
pub mod page;
pub mod probe;
pub mod runtime;
pub mod transport;
pub mod value;

pub use detect::{adapter_for, detect_framework, FrameworkAdapter, ADAPTERS};
pub use locate::{
    describe_component, locate_component, Candidate, LocatedComponent, MAX_ANCESTOR_SCAN,
    MAX_DESCENDANT_SCAN, MAX_OWNER_WALK_DEPTH, OVERSIZE_AREA_RATIO,
};
pub use page::{Document, Element, ElementId};
pub use probe::{
    build_dom_node_info, compute_css_selector, compute_xpath, Overlay, PointerAction,
    PointerEvent, Probe,
};
pub use runtime::{
    ComponentTree, DevtoolsHook, Fiber, FiberId, FiberType, GlobalScope, StackFrame, TargetPage,
};
pub use transport::{
    ControlReceiver, ControlSender, EventReceiver, EventSender, HostEndpoint, TargetEndpoint,
};
pub use value::{safe_copy_entries, JsValue};
