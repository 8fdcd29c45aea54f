use score_convert::ComposeProject;
use score_domain::{ResourceDeclaration, ResourceUid};
use score_state::ScoreResourceState;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::provider::{Provider, ProvisionContext};

/// Matches `type == "volume"`: provisions a single `source` output (the
/// concrete Compose volume name) and registers it as a top-level volume on
/// the project. Registration is idempotent, so re-provisioning a shared
/// volume resource across workloads is safe.
pub struct VolumeProvider;

impl Provider for VolumeProvider {
    fn provider_uri(&self) -> &str {
        "builtin://volume"
    }

    fn matches(&self, declaration: &ResourceDeclaration) -> bool {
        declaration.res_type == "volume"
    }

    fn provision(
        &self,
        _ctx: &ProvisionContext<'_>,
        uid: &ResourceUid,
        declaration: &ResourceDeclaration,
        _shared_state: &mut Map<String, Value>,
        resource_state: &mut ScoreResourceState,
        project: &mut ComposeProject,
    ) -> Result<(), ProviderError> {
        let source = declaration
            .params
            .get("source")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| uid.id().map(str::to_string).unwrap_or_else(|_| uid.to_string()));

        project.ensure_volume(source.clone());

        let mut outputs = Map::new();
        outputs.insert("source".to_string(), Value::String(source));
        resource_state.outputs = Some(outputs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(params: Map<String, Value>) -> ResourceDeclaration {
        ResourceDeclaration {
            res_type: "volume".to_string(),
            class: "default".to_string(),
            id: None,
            metadata: Map::new(),
            params,
        }
    }

    fn fresh_state() -> ScoreResourceState {
        ScoreResourceState {
            res_type: "volume".to_string(),
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
        }
    }

    #[test]
    fn defaults_source_to_resource_id() {
        let p = VolumeProvider;
        let uid = ResourceUid::new("app", "data", "volume", None, None);
        let mut shared = Map::new();
        let mut state = fresh_state();
        let mut project = ComposeProject::new();
        let ctx = ProvisionContext::never_cancelled();
        p.provision(&ctx, &uid, &decl(Map::new()), &mut shared, &mut state, &mut project).unwrap();
        assert_eq!(state.outputs.unwrap()["source"], Value::String("app.data".to_string()));
        assert!(project.volumes.contains_key("app.data"));
    }

    #[test]
    fn explicit_source_param_overrides_default() {
        let p = VolumeProvider;
        let uid = ResourceUid::new("app", "data", "volume", None, None);
        let mut params = Map::new();
        params.insert("source".to_string(), Value::String("example".to_string()));
        let mut shared = Map::new();
        let mut state = fresh_state();
        let mut project = ComposeProject::new();
        let ctx = ProvisionContext::never_cancelled();
        p.provision(&ctx, &uid, &decl(params), &mut shared, &mut state, &mut project).unwrap();
        assert_eq!(state.outputs.unwrap()["source"], Value::String("example".to_string()));
    }
}
