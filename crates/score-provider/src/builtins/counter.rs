use score_convert::ComposeProject;
use score_domain::{ResourceDeclaration, ResourceUid};
use score_state::ScoreResourceState;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::provider::{Provider, ProvisionContext};

/// Catch-all fallback, registered last: matches anything, records an
/// incrementing call count in `shared_state["counter"][uid]`. Grounds spec
/// §9's "in-memory counters" example and demonstrates `shared_state`
/// coordination across resources.
pub struct CounterProvider;

impl Provider for CounterProvider {
    fn provider_uri(&self) -> &str {
        "builtin://counter"
    }

    fn matches(&self, _declaration: &ResourceDeclaration) -> bool {
        true
    }

    fn provision(
        &self,
        _ctx: &ProvisionContext<'_>,
        uid: &ResourceUid,
        _declaration: &ResourceDeclaration,
        shared_state: &mut Map<String, Value>,
        _resource_state: &mut ScoreResourceState,
        _project: &mut ComposeProject,
    ) -> Result<(), ProviderError> {
        let counters = shared_state
            .entry("counter".to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .expect("shared_state[\"counter\"] is reserved for CounterProvider's own bookkeeping");

        let count = counters.get(uid.as_str()).and_then(Value::as_i64).unwrap_or(0);
        counters.insert(uid.as_str().to_string(), Value::from(count + 1));
        Ok(())
    }
}
