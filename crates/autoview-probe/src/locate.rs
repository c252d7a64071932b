//! # Component Locator
//!
//! Given a clicked DOM element, find the most specific owning component
//! node in the framework's ownership tree and resolve its source location.
//!
//! The pipeline has five steps:
//!
//! 1. **Entry-node discovery** — find *any* fiber reachable from the
//!    clicked element (own properties, legacy keys, devtools renderers,
//!    bounded ancestor walk, bounded descendant scan).
//! 2. **Candidate collection** — walk the ownership ("return") chain from
//!    the entry node, keeping component-typed fibers and recording the
//!    flags the selection policy needs.
//! 3. **Selection** — bucket policy preferring direct matches and
//!    specifically-named components over generic wrappers and oversized
//!    containers. The naive "first function-type ancestor" frequently
//!    yields a Layout/Provider wrapper instead of the widget the user
//!    actually clicked; the buckets encode that lesson.
//! 4. **Source resolution** — debug-source on the node, debug-source on
//!    the type, stack-frame scan, module-registry lookup; first hit wins.
//! 5. **Descriptor assembly** — safe-copied props/state, never a live
//!    reference.
//!
//! All tree walks are bounded by the named constants below so worst-case
//! cost and termination are auditable.

use autoview_core::prelude::*;
use autoview_core::{is_project_source, ComponentDescriptor, SourceLocation};

use crate::detect::{is_instance_key, LEGACY_INSTANCE_KEYS};
use crate::page::ElementId;
use crate::runtime::{FiberId, TargetPage};
use crate::value::safe_copy_entries;

/// Maximum ancestor elements checked for instance-reference keys.
pub const MAX_ANCESTOR_SCAN: usize = 15;

/// Maximum descendant elements scanned in the last-resort entry search.
pub const MAX_DESCENDANT_SCAN: usize = 64;

/// Maximum steps taken up the ownership chain.
pub const MAX_OWNER_WALK_DEPTH: usize = 32;

/// A candidate is oversized when its rendered box area exceeds the clicked
/// element's area by this factor.
pub const OVERSIZE_AREA_RATIO: f64 = 10.0;

/// Name fragments marking uninformative wrapper components.
const GENERIC_WRAPPER_NAMES: &[&str] = &[
    "Layout", "Router", "Provider", "App", "Boundary", "Suspense", "Anonymous", "Fragment",
    "Wrapper", "Container",
];

/// The locator's output: the chosen fiber and its resolved source.
#[derive(Debug, Clone)]
pub struct LocatedComponent {
    pub fiber: FiberId,
    pub source: Option<SourceLocation>,
}

/// One step of the ownership walk, with the selection-policy flags.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub fiber: FiberId,
    pub name: String,
    pub is_generic_wrapper: bool,
    pub is_oversized_container: bool,
    pub has_source_location: bool,
    pub is_direct_match: bool,
}

/// Whether a component name marks an uninformative wrapper.
pub fn is_generic_wrapper(name: &str) -> bool {
    name.is_empty()
        || GENERIC_WRAPPER_NAMES
            .iter()
            .any(|generic| name.contains(generic))
}

// ─────────────────────────────────────────────────────────
// Step 1: entry-node discovery
// ─────────────────────────────────────────────────────────

/// Read an instance-reference fiber from one element's expando properties.
fn fiber_from_properties(page: &TargetPage, element: ElementId) -> Option<FiberId> {
    let el = page.document.element(element);
    // Modern per-element keys first, then the legacy direct names.
    for key in el.property_keys() {
        if is_instance_key(key) && !LEGACY_INSTANCE_KEYS.contains(&key) {
            if let Some(fiber) = page.components.resolve_property(el.property(key)?) {
                return Some(fiber);
            }
        }
    }
    for key in LEGACY_INSTANCE_KEYS {
        if let Some(value) = el.property(key) {
            if let Some(fiber) = page.components.resolve_property(value) {
                return Some(fiber);
            }
        }
    }
    None
}

/// Find any fiber reachable from the clicked element. First hit wins.
fn find_entry_fiber(page: &TargetPage, clicked: ElementId) -> Option<FiberId> {
    // 1-2. The element's own properties (modern prefixes, then legacy names).
    if let Some(fiber) = fiber_from_properties(page, clicked) {
        return Some(fiber);
    }

    // 3. Ask the devtools hook's registered renderers.
    if let Some(hook) = &page.scope.react_devtools {
        if let Some(fiber) = hook.resolve_element(clicked) {
            return Some(fiber);
        }
    }

    // 4. Bounded ancestor walk.
    for ancestor in page
        .document
        .ancestors(clicked)
        .into_iter()
        .take(MAX_ANCESTOR_SCAN)
    {
        if let Some(fiber) = fiber_from_properties(page, ancestor) {
            return Some(fiber);
        }
    }

    // 5. Last resort: bounded descendant scan, then walk up the ownership
    // chain from any hit looking for a node whose rendered subtree
    // contains the clicked element.
    for descendant in page
        .document
        .descendants(clicked)
        .into_iter()
        .take(MAX_DESCENDANT_SCAN)
    {
        let Some(hit) = fiber_from_properties(page, descendant) else {
            continue;
        };
        let mut current = Some(hit);
        let mut depth = 0;
        while let Some(fiber_id) = current {
            if depth >= MAX_OWNER_WALK_DEPTH {
                break;
            }
            let fiber = page.components.fiber(fiber_id);
            if let Some(host) = fiber.host_node {
                if page.document.subtree_contains(host, clicked) {
                    return Some(fiber_id);
                }
            }
            current = fiber.return_owner;
            depth += 1;
        }
    }

    None
}

// ─────────────────────────────────────────────────────────
// Step 2: candidate collection
// ─────────────────────────────────────────────────────────

fn collect_candidates(page: &TargetPage, entry: FiberId, clicked: ElementId) -> Vec<Candidate> {
    let clicked_area = page.document.element(clicked).bounds().area();
    let mut candidates = Vec::new();

    let mut current = Some(entry);
    let mut depth = 0;
    while let Some(fiber_id) = current {
        if depth >= MAX_OWNER_WALK_DEPTH {
            break;
        }
        let fiber = page.components.fiber(fiber_id);

        if fiber.fiber_type.is_component() {
            let name = fiber
                .display_name
                .clone()
                .or_else(|| fiber.fiber_type.name().map(str::to_string))
                .unwrap_or_default();

            let rendered_area = fiber
                .host_node
                .map(|host| page.document.element(host).bounds().area());
            let is_oversized = match rendered_area {
                Some(area) if clicked_area > 0.0 => area > clicked_area * OVERSIZE_AREA_RATIO,
                _ => false,
            };

            candidates.push(Candidate {
                fiber: fiber_id,
                is_generic_wrapper: is_generic_wrapper(&name),
                is_oversized_container: is_oversized,
                has_source_location: fiber.debug_source.is_some()
                    || fiber.type_debug_source.is_some(),
                is_direct_match: fiber.host_node == Some(clicked),
                name,
            });
        }

        current = fiber.return_owner;
        depth += 1;
    }

    candidates
}

// ─────────────────────────────────────────────────────────
// Step 3: selection policy
// ─────────────────────────────────────────────────────────

/// First non-empty bucket wins; within a bucket, walk order (most specific
/// first) is preserved.
fn select_candidate(candidates: &[Candidate]) -> Option<&Candidate> {
    let buckets: [fn(&Candidate) -> bool; 5] = [
        |c| c.is_direct_match && c.has_source_location && !c.is_generic_wrapper,
        |c| c.is_direct_match,
        |c| !c.is_generic_wrapper && !c.is_oversized_container && c.has_source_location,
        |c| !c.is_generic_wrapper && !c.is_oversized_container,
        |c| !c.is_oversized_container,
    ];
    for bucket in buckets {
        if let Some(found) = candidates.iter().find(|c| bucket(c)) {
            return Some(found);
        }
    }
    candidates.first()
}

// ─────────────────────────────────────────────────────────
// Step 4: source resolution
// ─────────────────────────────────────────────────────────

fn resolve_source(page: &TargetPage, candidate: &Candidate) -> Option<SourceLocation> {
    let fiber = page.components.fiber(candidate.fiber);

    // Debug metadata on the node, then on the component type.
    if let Some(source) = &fiber.debug_source {
        return Some(source.clone());
    }
    if let Some(source) = &fiber.type_debug_source {
        return Some(source.clone());
    }

    // Stack-frame scan: first frame in project source.
    for frame in &page.scope.stack_frames {
        if is_project_source(&frame.file) {
            return Some(SourceLocation::new(&frame.file, frame.line, frame.column));
        }
    }

    // Module-registry lookup keyed by component identity.
    if !candidate.name.is_empty() {
        if let Some(path) = page.scope.module_registry.get(&candidate.name) {
            return Some(SourceLocation::new(path, None, None));
        }
    }

    None
}

// ─────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────

/// Run the full pipeline for a clicked element.
///
/// Returns `None` on introspection miss — the caller reports a null
/// component, never an error.
pub fn locate_component(page: &TargetPage, clicked: ElementId) -> Option<LocatedComponent> {
    let entry = find_entry_fiber(page, clicked)?;
    let candidates = collect_candidates(page, entry, clicked);
    let chosen = select_candidate(&candidates)?;
    let source = resolve_source(page, chosen);
    debug!(
        component = %chosen.name,
        direct = chosen.is_direct_match,
        has_source = source.is_some(),
        "located component for clicked element"
    );
    Some(LocatedComponent {
        fiber: chosen.fiber,
        source,
    })
}

/// Step 5: assemble the safe descriptor for a located component.
pub fn describe_component(page: &TargetPage, located: &LocatedComponent) -> ComponentDescriptor {
    let fiber = page.components.fiber(located.fiber);
    let component_name = fiber
        .fiber_type
        .name()
        .map(str::to_string)
        .or_else(|| fiber.display_name.clone())
        .unwrap_or_else(|| "Anonymous".to_string());

    ComponentDescriptor {
        component_name,
        display_name: fiber.display_name.clone(),
        props: safe_copy_entries(&fiber.props),
        state: safe_copy_entries(&fiber.state),
        source_location: located.source.clone(),
    }
}
