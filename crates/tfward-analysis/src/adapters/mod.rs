//! Provider adapters: normalize related raw blocks into domain objects.
//!
//! Each adapter walks the module graph through the reference resolver, seeds a
//! resolved-ID map for every child type it expects, and reconciles leftover
//! orphans into a synthetic unmanaged parent before returning. Typed rules
//! only ever see a [`State`] whose adapters have all finished.

pub mod aws;

use serde::Serialize;

use crate::graph::{ModuleGraph, Typed};

use self::aws::apigateway::{HttpApiAdapter, RestApiAdapter};
use self::aws::Aws;

/// Normalized domain objects for every supported provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct State {
    pub aws: Aws,
}

/// One resource family's normalization pass.
pub trait Adapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Append this family's domain objects to `state`.
    fn adapt(&self, graph: &ModuleGraph, state: &mut State);
}

/// Every built-in adapter, in execution order.
pub fn default_adapters() -> Vec<Box<dyn Adapter>> {
    vec![Box::new(RestApiAdapter), Box::new(HttpApiAdapter)]
}

/// Run every built-in adapter to completion.
pub fn adapt(graph: &ModuleGraph) -> State {
    let mut state = State::default();
    for adapter in default_adapters() {
        adapter.adapt(graph, &mut state);
    }
    state
}

/// Three-tier precedence for cascading fields: an explicit value on the child
/// beats one inherited from a parent-level settings block, which beats the
/// built-in default.
pub fn cascade<T>(builtin: Typed<T>, inherited: Option<Typed<T>>, explicit: Option<Typed<T>>) -> Typed<T> {
    explicit.or(inherited).unwrap_or(builtin)
}
