//! # Injection Strategy Selector
//!
//! Ordered, first-success-wins ladder over the four ways of getting the
//! probe running inside a target context. Every rung failure is caught and
//! logged, never thrown to the caller; only full exhaustion surfaces, and
//! the controller answers that by activating the fallback inspector.
//!
//! Idempotence is owned here: a per-target registry keyed by surface
//! identity and load generation. A duplicate `inject` against the same
//! generation no-ops; a reload (new generation) naturally re-arms.

use std::collections::HashMap;

use autoview_core::prelude::*;
use autoview_core::Error;
use autoview_probe::transport::HostEndpoint;

use crate::surface::{PreviewSurface, SurfaceId};

/// The four ladder rungs, in attempt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionStrategy {
    /// Privileged execute-in-context bridge — most reliable, works across
    /// origins, only present in native embedding shells.
    PrivilegedBridge,
    /// Script element attached to the target document head.
    ScriptElement,
    /// Direct evaluation against the target global scope.
    GlobalEval,
    /// Best-effort message asking the target to self-inject.
    SelfInjectRequest,
}

impl InjectionStrategy {
    /// All strategies in ladder order.
    pub const LADDER: &'static [InjectionStrategy] = &[
        Self::PrivilegedBridge,
        Self::ScriptElement,
        Self::GlobalEval,
        Self::SelfInjectRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrivilegedBridge => "privileged-bridge",
            Self::ScriptElement => "script-element",
            Self::GlobalEval => "global-eval",
            Self::SelfInjectRequest => "self-inject-request",
        }
    }

    fn attempt(&self, surface: &dyn PreviewSurface) -> Result<HostEndpoint> {
        match self {
            Self::PrivilegedBridge => surface.execute_in_context(),
            Self::ScriptElement => surface.inject_script_element(),
            Self::GlobalEval => surface.eval_in_global(),
            Self::SelfInjectRequest => surface.request_self_injection(),
        }
    }
}

impl std::fmt::Display for InjectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful selector run.
#[derive(Debug)]
pub struct Injection {
    pub strategy: InjectionStrategy,
    pub endpoint: HostEndpoint,
}

/// Runs the ladder and owns the per-target injection registry.
#[derive(Default)]
pub struct InjectionSelector {
    injected: HashMap<SurfaceId, u64>,
}

impl InjectionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this surface's current generation is already injected.
    pub fn is_injected(&self, surface: &dyn PreviewSurface) -> bool {
        self.injected.get(&surface.id()) == Some(&surface.generation())
    }

    /// Run the ladder against a surface.
    ///
    /// Returns `Ok(None)` when this generation is already injected (the
    /// duplicate attempt no-ops). Returns [`Error::InjectionExhausted`]
    /// when every rung failed — the only error this method produces.
    pub fn inject(&mut self, surface: &dyn PreviewSurface) -> Result<Option<Injection>> {
        if self.is_injected(surface) {
            debug!(
                "surface {:?} gen {} already injected, skipping",
                surface.id(),
                surface.generation()
            );
            return Ok(None);
        }

        for &strategy in InjectionStrategy::LADDER {
            match strategy.attempt(surface) {
                Ok(endpoint) => {
                    info!("injection via {strategy} succeeded for {:?}", surface.id());
                    self.injected.insert(surface.id(), surface.generation());
                    return Ok(Some(Injection { strategy, endpoint }));
                }
                Err(e) => {
                    debug!("injection strategy {strategy} failed: {e}");
                }
            }
        }

        warn!("all injection strategies failed for {:?}", surface.id());
        Err(Error::InjectionExhausted)
    }

    /// Forget a surface entirely (detach).
    pub fn forget(&mut self, id: SurfaceId) {
        self.injected.remove(&id);
    }
}
