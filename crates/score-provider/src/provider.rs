use score_convert::ComposeProject;
use score_domain::{ResourceDeclaration, ResourceUid};
use score_state::ScoreResourceState;
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// Cooperative cancellation signal threaded through a provisioning run (spec
/// §5: "the caller supplies a context that providers should honor for
/// cancellation"). The core itself never cancels a call in flight; a
/// provider doing long blocking work should poll `is_cancelled` between
/// steps.
pub struct ProvisionContext<'a> {
    is_cancelled: &'a dyn Fn() -> bool,
}

impl<'a> ProvisionContext<'a> {
    pub fn new(is_cancelled: &'a dyn Fn() -> bool) -> Self {
        Self { is_cancelled }
    }

    pub fn never_cancelled() -> Self {
        Self { is_cancelled: &|| false }
    }

    pub fn is_cancelled(&self) -> bool {
        (self.is_cancelled)()
    }
}

/// A pluggable provisioner for one class of resource types (spec §4.3).
///
/// Implementations must be deterministic given identical inputs but may
/// consult and mutate `shared_state` for cross-resource coordination, and may
/// mutate `project` directly (e.g. to register a top-level volume).
pub trait Provider: Send + Sync {
    /// Stable identifier persisted in state; re-provisioning a resource with
    /// a provider whose uri differs from the one on record is a hard error.
    fn provider_uri(&self) -> &str;

    /// Whether this provider handles `declaration`. Most implementations
    /// only look at `res_type`/`class`/`id`, matching the spec's
    /// `match(type, class, id)` contract; a provider may also inspect
    /// `declaration.params` when its applicability depends on the
    /// declaration's shape (e.g. the static-outputs provider).
    fn matches(&self, declaration: &ResourceDeclaration) -> bool;

    /// Whether this provider supports a non-empty volume `subPath` as a
    /// pass-through (spec §4.7's `Subpath` capability, "newer schema allows
    /// it as a pass-through"). Defaults to unsupported; a provider that
    /// knows how to honor a sub-path into its volume overrides this.
    fn supports_subpath(&self) -> bool {
        false
    }

    fn provision(
        &self,
        ctx: &ProvisionContext<'_>,
        uid: &ResourceUid,
        declaration: &ResourceDeclaration,
        shared_state: &mut Map<String, Value>,
        resource_state: &mut ScoreResourceState,
        project: &mut ComposeProject,
    ) -> Result<(), ProviderError>;
}
