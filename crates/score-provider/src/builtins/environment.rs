use std::sync::Arc;

use score_convert::ComposeProject;
use score_domain::{ResourceDeclaration, ResourceUid};
use score_state::ScoreResourceState;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::provider::{Provider, ProvisionContext};

/// Matches `type == "environment"`: the resource stands in for the caller's
/// own shell environment, so an output lookup for key `K` just re-emits the
/// bare placeholder `${K}` for the downstream runtime to fill in.
pub struct EnvironmentProvider;

impl Provider for EnvironmentProvider {
    fn provider_uri(&self) -> &str {
        "builtin://environment"
    }

    fn matches(&self, declaration: &ResourceDeclaration) -> bool {
        declaration.res_type == "environment"
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
        let _ = uid;
        resource_state.output_lookup = Some(Arc::new(|parts: &[&str]| {
            let key = parts.first().copied().unwrap_or("");
            Ok(Value::String(format!("${{{key}}}")))
        }));
        Ok(())
    }
}
