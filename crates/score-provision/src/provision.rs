use std::collections::HashMap;

use score_domain::{ResourceDeclaration, ResourceUid};
use score_graph::{sort_resources, ResourceNode};
use score_provider::{Provider, ProviderRegistry, ProvisionContext};
use score_state::State;
use tracing::{debug, info};

use crate::error::ProvisionError;

/// Run the provisioning loop over every resource in `state` (spec §4.6).
///
/// Resources are visited in the topological order computed by
/// `score-graph`; each is handed to the first matching provider in
/// `registry`, with `state.shared_state` and the resource's own
/// `ScoreResourceState` threaded through so providers can coordinate and
/// record outputs.
pub fn provision_all(
    state: &mut State,
    registry: &ProviderRegistry,
    project: &mut score_convert::ComposeProject,
    ctx: &ProvisionContext<'_>,
) -> Result<(), ProvisionError> {
    let local_uid_tables = build_local_uid_tables(state);
    let empty_table = HashMap::new();

    let order = {
        let nodes: Vec<ResourceNode<'_>> = state
            .resources
            .iter()
            .map(|(uid, res)| {
                let table = local_uid_tables.get(&res.source_workload).unwrap_or(&empty_table);
                ResourceNode {
                    uid: uid.clone(),
                    params: &res.params,
                    name_resolution: table,
                }
            })
            .collect();
        sort_resources(&nodes)?
    };

    info!(resources = order.len(), "provisioning resources in dependency order");

    for uid in order {
        let declaration = {
            let res = state.resources.get(&uid).expect("uid from sort_resources must be primed");
            ResourceDeclaration {
                res_type: res.res_type.clone(),
                class: res.class.clone(),
                id: Some(res.id.clone()),
                metadata: res.metadata.clone(),
                params: res.params.clone(),
            }
        };

        let provider = registry
            .find_first_matching(&declaration)
            .map_err(|source| ProvisionError::Provider { uid: uid.to_string(), source })?;

        let res = state.resources.get_mut(&uid).expect("uid from sort_resources must be primed");

        if res.provisioner.is_empty() {
            res.provisioner = provider.provider_uri().to_string();
        } else if res.provisioner != provider.provider_uri() {
            return Err(ProvisionError::Provider {
                uid: uid.to_string(),
                source: score_provider::ProviderError::ProviderMismatch,
            });
        }
        res.supports_subpath = provider.supports_subpath();

        debug!(uid = %uid, provider = provider.provider_uri(), "provisioning resource");
        provider
            .provision(ctx, &uid, &declaration, &mut state.shared_state, res, project)
            .map_err(|source| ProvisionError::Provider { uid: uid.to_string(), source })?;
    }

    Ok(())
}

fn build_local_uid_tables(state: &State) -> HashMap<String, HashMap<String, ResourceUid>> {
    state
        .workloads
        .iter()
        .map(|(workload_name, ws)| {
            let table = ws
                .spec
                .resources
                .iter()
                .map(|(res_name, decl)| {
                    let uid = ResourceUid::new(
                        workload_name,
                        res_name,
                        &decl.res_type,
                        Some(decl.class.as_str()),
                        decl.id.as_deref(),
                    );
                    (res_name.clone(), uid)
                })
                .collect();
            (workload_name.clone(), table)
        })
        .collect()
}
