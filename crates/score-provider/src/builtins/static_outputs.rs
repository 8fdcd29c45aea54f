use score_convert::ComposeProject;
use score_domain::{ResourceDeclaration, ResourceUid};
use score_state::ScoreResourceState;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::provider::{Provider, ProvisionContext};

/// Matches any resource carrying a `params._outputs_` map and copies it
/// verbatim into `Outputs` (spec §9's "static-outputs" provider). Primarily
/// used by tests to pin exact output values.
pub struct StaticOutputsProvider;

const OUTPUTS_KEY: &str = "_outputs_";

impl Provider for StaticOutputsProvider {
    fn provider_uri(&self) -> &str {
        "builtin://static-outputs"
    }

    fn matches(&self, declaration: &ResourceDeclaration) -> bool {
        Self::applies_to(&declaration.params)
    }

    fn provision(
        &self,
        _ctx: &ProvisionContext<'_>,
        _uid: &ResourceUid,
        declaration: &ResourceDeclaration,
        _shared_state: &mut Map<String, Value>,
        resource_state: &mut ScoreResourceState,
        _project: &mut ComposeProject,
    ) -> Result<(), ProviderError> {
        let outputs = declaration
            .params
            .get(OUTPUTS_KEY)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        resource_state.outputs = Some(outputs);
        Ok(())
    }
}

impl StaticOutputsProvider {
    /// Whether `params` carries a static outputs map — the registry consults
    /// this ahead of the generic `matches` dispatch, since this provider's
    /// applicability depends on the declaration's params, not just its type
    /// coordinates.
    pub fn applies_to(params: &Map<String, Value>) -> bool {
        params.get(OUTPUTS_KEY).is_some_and(Value::is_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_outputs_verbatim() {
        let p = StaticOutputsProvider;
        let mut params = Map::new();
        let mut outputs = Map::new();
        outputs.insert("source".to_string(), Value::String("example".to_string()));
        params.insert(OUTPUTS_KEY.to_string(), Value::Object(outputs.clone()));
        assert!(StaticOutputsProvider::applies_to(&params));

        let decl = ResourceDeclaration {
            res_type: "whatever".to_string(),
            class: "default".to_string(),
            id: None,
            metadata: Map::new(),
            params,
        };
        let uid = ResourceUid::new("app", "data", "whatever", None, None);
        let mut shared = Map::new();
        let mut state = ScoreResourceState {
            res_type: "whatever".to_string(),
            class: "default".to_string(),
            id: "app.data".to_string(),
            metadata: Map::new(),
            params: Map::new(),
            provisioner: String::new(),
            state: Map::new(),
            outputs: None,
            output_lookup: None,
            source_workload: "app".to_string(),
            supports_subpath: false,
        };
        let mut project = ComposeProject::new();
        let ctx = ProvisionContext::never_cancelled();
        p.provision(&ctx, &uid, &decl, &mut shared, &mut state, &mut project).unwrap();
        assert_eq!(state.outputs, Some(outputs));
    }
}
