use std::sync::Arc;

use score_convert::ComposeProject;
use score_domain::{ResourceDeclaration, ResourceUid};
use score_state::ScoreResourceState;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::provider::{Provider, ProvisionContext};

/// The legacy prefix-based env-var emitter (spec §9's design note). Matches
/// anything not claimed by a more specific provider; for a lookup of key `K`
/// on a resource whose local name is `N`, emits
/// `${<UPPER_SNAKE(N)>_<UPPER_SNAKE(K)>?required}` — a placeholder the
/// downstream runtime is expected to fill in at container start.
pub struct PlaceholderEnvProvider;

impl Provider for PlaceholderEnvProvider {
    fn provider_uri(&self) -> &str {
        "builtin://placeholder-env"
    }

    fn matches(&self, _declaration: &ResourceDeclaration) -> bool {
        true
    }

    fn provision(
        &self,
        _ctx: &ProvisionContext<'_>,
        uid: &ResourceUid,
        _declaration: &ResourceDeclaration,
        _shared_state: &mut Map<String, Value>,
        resource_state: &mut ScoreResourceState,
        _project: &mut ComposeProject,
    ) -> Result<(), ProviderError> {
        let prefix = upper_snake(local_name(uid));
        resource_state.output_lookup = Some(Arc::new(move |parts: &[&str]| {
            let key = parts.first().copied().unwrap_or("");
            Ok(Value::String(format!("${{{prefix}_{}?required}}", upper_snake(key))))
        }));
        Ok(())
    }
}

/// The resource's workload-local name: the last `.`-segment of its uid's id
/// part (`<workload>.<name>` for unshared resources).
fn local_name(uid: &ResourceUid) -> &str {
    uid.id().ok().and_then(|id| id.rsplit('.').next()).unwrap_or("resource")
}

fn upper_snake(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
