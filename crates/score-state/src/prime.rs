use score_domain::{Metadata, Params, ResourceUid};
use tracing::debug;

use crate::error::StateError;
use crate::types::{ScoreResourceState, State};

/// Fold every workload's resource declarations into `state.resources`,
/// detecting conflicting re-declarations of the same shared resource (spec
/// §4.4).
///
/// Mutates `state` in place; on error `state` may hold a partial merge of the
/// offending resource (earlier resources are fully primed) — callers that
/// need rollback-on-error semantics should prime a clone.
pub fn prime_resources(state: &mut State) -> Result<(), StateError> {
    let mut workload_names: Vec<&String> = state.workloads.keys().collect();
    workload_names.sort();

    for workload_name in workload_names {
        let workload = &state.workloads[workload_name].spec;
        let mut res_names: Vec<&String> = workload.resources.keys().collect();
        res_names.sort();

        for res_name in res_names {
            let decl = &workload.resources[res_name];
            let uid = ResourceUid::new(
                workload_name,
                res_name,
                &decl.res_type,
                Some(decl.class.as_str()),
                decl.id.as_deref(),
            );

            match state.resources.get(&uid) {
                None => {
                    debug!(uid = %uid, workload = %workload_name, "priming resource");
                    state.resources.insert(
                        uid.clone(),
                        ScoreResourceState {
                            res_type: decl.res_type.clone(),
                            class: decl.class.clone(),
                            id: uid.id()?.to_string(),
                            metadata: decl.metadata.clone(),
                            params: decl.params.clone(),
                            provisioner: String::new(),
                            state: serde_json::Map::new(),
                            outputs: None,
                            output_lookup: None,
                            source_workload: workload_name.clone(),
                            supports_subpath: false,
                        },
                    );
                }
                Some(existing) => {
                    if !params_equal(&existing.params, &decl.params) {
                        return Err(StateError::ParamsConflict(uid.to_string()));
                    }
                    if !metadata_equal(&existing.metadata, &decl.metadata) {
                        return Err(StateError::MetadataConflict(uid.to_string()));
                    }
                }
            }
        }
    }

    Ok(())
}

fn params_equal(a: &Params, b: &Params) -> bool {
    a == b
}

fn metadata_equal(a: &Metadata, b: &Metadata) -> bool {
    a == b
}
