use std::collections::HashMap;
use std::path::Path;

use score_domain::{ResourceUid, Workload};
use score_state::ScoreResourceState;
use score_substitute::{OutputLookupFn as SubstOutputLookupFn, Resolver, StandardResolver, SubstituteError};
use serde_json::Value;
use tracing::warn;

use crate::error::ConvertError;
use crate::files::expand_files;
use crate::project::{ComposeProject, ComposeService, NamedVolumeMount, PortMapping, ServiceVolumeMount};

/// Convert one workload into services on `project` (spec §4.7).
///
/// `resources` is the full provisioned resource map (`ResourceUid` →
/// provisioned state); only the entries this workload declares are
/// consulted, resolved through `local_uid`.
pub fn convert_workload_into(
    project: &mut ComposeProject,
    workload_name: &str,
    workload: &Workload,
    workload_source: Option<&Path>,
    resources: &HashMap<ResourceUid, ScoreResourceState>,
    mounts_dir: Option<&Path>,
) -> Result<(), ConvertError> {
    if workload.containers.is_empty() {
        return Err(ConvertError::NoContainers(workload_name.to_string()));
    }

    let local_uid = local_uid_table(workload_name, workload);
    let lookup_table = build_lookup_table(&local_uid, resources);
    let resolver = StandardResolver {
        metadata: &workload.metadata,
        resources: &lookup_table,
    };

    let mut container_names: Vec<&String> = workload.containers.keys().collect();
    container_names.sort();
    let network_owner = container_names[0].clone();

    for container_name in container_names {
        let container = &workload.containers[container_name];
        let mut service = ComposeService::new(format!("{workload_name}-{container_name}"));
        service.image = Some(container.image.clone());
        service.command = container.command.clone();
        service.entrypoint = None;

        for (k, v) in &container.variables {
            let (resolved, err) = score_substitute::substitute_string_preserving_escapes(v, &resolver);
            if let Some(err) = err {
                return Err(ConvertError::Substitution {
                    container: container_name.clone(),
                    field: "variables",
                    target: k.clone(),
                    inner: err.to_string(),
                });
            }
            service.environment.insert(k.clone(), resolved);
        }

        if *container_name == network_owner {
            if let Some(service_ports) = &workload.service {
                let mut ports: Vec<PortMapping> = service_ports
                    .values()
                    .map(|p| PortMapping {
                        published: p.port.to_string(),
                        target: p.target_port.unwrap_or(p.port).to_string(),
                        protocol: p.protocol.clone().unwrap_or_else(|| "tcp".to_string()).to_lowercase(),
                    })
                    .collect();
                ports.sort_by(|a, b| a.published.parse::<u32>().unwrap_or(0).cmp(&b.published.parse::<u32>().unwrap_or(0)));
                service.ports = ports;
            }
        } else {
            service.network_mode = Some(format!("service:{workload_name}-{network_owner}"));
        }

        let mut volume_mounts = Vec::with_capacity(container.volumes.len());
        for (target, vm) in &container.volumes {
            let (resolved_name, err) = score_substitute::substitute_string(&vm.source, &resolver);
            if let Some(err) = err {
                return Err(ConvertError::Substitution {
                    container: container_name.clone(),
                    field: "volumes",
                    target: target.clone(),
                    inner: err.to_string(),
                });
            }

            let declared = workload.resources.get(&resolved_name);
            let is_volume = declared.is_some_and(|d| d.res_type == "volume");
            if !is_volume {
                return Err(ConvertError::VolumeNotDeclared {
                    container: container_name.clone(),
                    target: target.clone(),
                    resolved: resolved_name,
                });
            }

            let resolved_state = local_uid.get(&resolved_name).and_then(|uid| resources.get(uid));

            if vm.sub_path.as_deref().is_some_and(|p| !p.is_empty())
                && !resolved_state.is_some_and(|state| state.supports_subpath)
            {
                return Err(ConvertError::SubPathUnsupported {
                    container: container_name.clone(),
                    target: target.clone(),
                });
            }

            let concrete_source = resolved_state
                .and_then(|state| state.outputs.as_ref())
                .and_then(|o| o.get("source"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(resolved_name);

            volume_mounts.push(ServiceVolumeMount::Named(NamedVolumeMount {
                source: concrete_source,
                target: target.clone(),
                read_only: vm.read_only,
            }));
        }

        let bind_mounts = expand_files(
            workload_name,
            container_name,
            &container.files,
            mounts_dir,
            workload_source,
            &resolver,
        )?;
        for bind in bind_mounts {
            volume_mounts.push(ServiceVolumeMount::Bind(bind));
        }
        volume_mounts.sort_by(|a, b| a.source().cmp(b.source()));
        service.volumes = volume_mounts;

        if container.unsupported.resources.is_some() {
            warn!(workload = workload_name, container = %container_name, "resource requests/limits are not supported and were ignored");
        }
        if container.unsupported.readiness_probe.is_some() {
            warn!(workload = workload_name, container = %container_name, "readinessProbe is not supported and was ignored");
        }
        if container.unsupported.liveness_probe.is_some() {
            warn!(workload = workload_name, container = %container_name, "livenessProbe is not supported and was ignored");
        }

        project.services.insert(service.name.clone(), service);
    }

    Ok(())
}

/// Local resource name → `ResourceUid`, for resources this workload declares.
fn local_uid_table(workload_name: &str, workload: &Workload) -> HashMap<String, ResourceUid> {
    workload
        .resources
        .iter()
        .map(|(name, decl)| {
            let uid = ResourceUid::new(
                workload_name,
                name,
                &decl.res_type,
                Some(decl.class.as_str()),
                decl.id.as_deref(),
            );
            (name.clone(), uid)
        })
        .collect()
}

/// Build the `resourceName → outputFn` table (spec §4.7): prefers the
/// provider's deferred `output_lookup`, falling back to a lookup that walks
/// the resolved `outputs` tree directly.
fn build_lookup_table<'a>(
    local_uid: &'a HashMap<String, ResourceUid>,
    resources: &'a HashMap<ResourceUid, ScoreResourceState>,
) -> HashMap<String, Box<SubstOutputLookupFn>> {
    let mut table: HashMap<String, Box<SubstOutputLookupFn>> = HashMap::new();
    for (name, uid) in local_uid {
        let Some(state) = resources.get(uid) else { continue };

        if let Some(lookup) = state.output_lookup.clone() {
            table.insert(
                name.clone(),
                Box::new(move |parts: &[&str]| lookup(parts).map_err(SubstituteError::Lookup)),
            );
        } else {
            let outputs = state.outputs.clone().unwrap_or_default();
            table.insert(
                name.clone(),
                Box::new(move |parts: &[&str]| {
                    let mut cur = Value::Object(outputs.clone());
                    for key in parts {
                        cur = match cur {
                            Value::Object(ref m) => m
                                .get(*key)
                                .cloned()
                                .ok_or_else(|| SubstituteError::Lookup(format!("no such output '{key}'")))?,
                            _ => return Err(SubstituteError::Lookup(format!("'{key}' is not a map"))),
                        };
                    }
                    Ok(cur)
                }),
            );
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_domain::{ContainerSpec, ResourceDeclaration, ServicePort, VolumeMount};
    use serde_json::json;

    fn base_workload(name: &str) -> Workload {
        let mut metadata = serde_json::Map::new();
        metadata.insert("name".to_string(), json!(name));
        Workload { metadata, service: None, containers: HashMap::new(), resources: HashMap::new() }
    }

    fn container(image: &str) -> ContainerSpec {
        ContainerSpec {
            image: image.to_string(),
            command: None,
            args: None,
            variables: HashMap::new(),
            volumes: HashMap::new(),
            files: HashMap::new(),
            unsupported: Default::default(),
        }
    }

    #[test]
    fn single_container_ports_sorted_by_published() {
        let mut workload = base_workload("test");
        workload.containers.insert("backend".to_string(), container("busybox"));
        let mut service = HashMap::new();
        service.insert("www".to_string(), ServicePort { port: 80, target_port: Some(8080), protocol: None });
        service.insert("admin".to_string(), ServicePort { port: 8080, target_port: None, protocol: Some("UDP".to_string()) });
        workload.service = Some(service);

        let mut project = ComposeProject::new();
        let resources = HashMap::new();
        convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap();

        let svc = &project.services["test-backend"];
        assert_eq!(svc.ports.len(), 2);
        assert_eq!(svc.ports[0].published, "80");
        assert_eq!(svc.ports[1].published, "8080");
        assert_eq!(svc.ports[1].protocol, "udp");
    }

    #[test]
    fn multi_container_network_owner_is_lexicographically_first() {
        let mut workload = base_workload("test");
        workload.containers.insert("frontend".to_string(), container("nginx"));
        workload.containers.insert("backend".to_string(), container("app"));

        let mut project = ComposeProject::new();
        let resources = HashMap::new();
        convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap();

        assert!(project.services["test-backend"].network_mode.is_none());
        assert_eq!(
            project.services["test-frontend"].network_mode.as_deref(),
            Some("service:test-backend")
        );
    }

    #[test]
    fn volume_source_rewritten_from_provisioned_output() {
        let mut workload = base_workload("test");
        let mut c = container("busybox");
        c.volumes.insert(
            "/mnt/data".to_string(),
            VolumeMount { source: "${resources.data}".to_string(), sub_path: None, read_only: true },
        );
        workload.containers.insert("backend".to_string(), c);
        workload.resources.insert(
            "data".to_string(),
            ResourceDeclaration {
                res_type: "volume".to_string(),
                class: "default".to_string(),
                id: None,
                metadata: serde_json::Map::new(),
                params: serde_json::Map::new(),
            },
        );

        let uid = ResourceUid::new("test", "data", "volume", None, None);
        let mut outputs = serde_json::Map::new();
        outputs.insert("source".to_string(), json!("example"));
        let state = ScoreResourceState {
            res_type: "volume".to_string(),
            class: "default".to_string(),
            id: uid.id().unwrap().to_string(),
            metadata: serde_json::Map::new(),
            params: serde_json::Map::new(),
            provisioner: "builtin://volume".to_string(),
            state: serde_json::Map::new(),
            outputs: Some(outputs),
            output_lookup: None,
            source_workload: "test".to_string(),
            supports_subpath: false,
        };
        let mut resources = HashMap::new();
        resources.insert(uid, state);

        let mut project = ComposeProject::new();
        convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap();

        let svc = &project.services["test-backend"];
        assert_eq!(svc.volumes.len(), 1);
        assert_eq!(svc.volumes[0].source(), "example");
    }

    #[test]
    fn escaped_dollar_in_environment_value_is_preserved_verbatim() {
        let mut workload = base_workload("test");
        let mut c = container("busybox");
        c.variables.insert("LOGS_LEVEL".to_string(), "$${LOGS_LEVEL}".to_string());
        workload.containers.insert("backend".to_string(), c);

        let mut project = ComposeProject::new();
        let resources = HashMap::new();
        convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap();

        let svc = &project.services["test-backend"];
        assert_eq!(svc.environment["LOGS_LEVEL"], "$${LOGS_LEVEL}");
    }

    #[test]
    fn non_empty_subpath_is_rejected_without_provider_capability() {
        let mut workload = base_workload("test");
        let mut c = container("busybox");
        c.volumes.insert(
            "/mnt/data".to_string(),
            VolumeMount { source: "${resources.data}".to_string(), sub_path: Some("nested".to_string()), read_only: false },
        );
        workload.containers.insert("backend".to_string(), c);
        workload.resources.insert(
            "data".to_string(),
            ResourceDeclaration {
                res_type: "volume".to_string(),
                class: "default".to_string(),
                id: None,
                metadata: serde_json::Map::new(),
                params: serde_json::Map::new(),
            },
        );

        let uid = ResourceUid::new("test", "data", "volume", None, None);
        let state = ScoreResourceState {
            res_type: "volume".to_string(),
            class: "default".to_string(),
            id: uid.id().unwrap().to_string(),
            metadata: serde_json::Map::new(),
            params: serde_json::Map::new(),
            provisioner: "builtin://volume".to_string(),
            state: serde_json::Map::new(),
            outputs: None,
            output_lookup: None,
            source_workload: "test".to_string(),
            supports_subpath: false,
        };
        let mut resources = HashMap::new();
        resources.insert(uid, state);

        let mut project = ComposeProject::new();
        let err = convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap_err();
        assert!(matches!(err, ConvertError::SubPathUnsupported { .. }));
    }

    #[test]
    fn non_empty_subpath_passes_through_when_provider_supports_it() {
        let mut workload = base_workload("test");
        let mut c = container("busybox");
        c.volumes.insert(
            "/mnt/data".to_string(),
            VolumeMount { source: "${resources.data}".to_string(), sub_path: Some("nested".to_string()), read_only: false },
        );
        workload.containers.insert("backend".to_string(), c);
        workload.resources.insert(
            "data".to_string(),
            ResourceDeclaration {
                res_type: "volume".to_string(),
                class: "default".to_string(),
                id: None,
                metadata: serde_json::Map::new(),
                params: serde_json::Map::new(),
            },
        );

        let uid = ResourceUid::new("test", "data", "volume", None, None);
        let state = ScoreResourceState {
            res_type: "volume".to_string(),
            class: "default".to_string(),
            id: uid.id().unwrap().to_string(),
            metadata: serde_json::Map::new(),
            params: serde_json::Map::new(),
            provisioner: "builtin://volume".to_string(),
            state: serde_json::Map::new(),
            outputs: None,
            output_lookup: None,
            source_workload: "test".to_string(),
            supports_subpath: true,
        };
        let mut resources = HashMap::new();
        resources.insert(uid, state);

        let mut project = ComposeProject::new();
        convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap();
        assert_eq!(project.services["test-backend"].volumes.len(), 1);
    }

    #[test]
    fn zero_containers_is_rejected() {
        let workload = base_workload("test");
        let mut project = ComposeProject::new();
        let resources = HashMap::new();
        let err = convert_workload_into(&mut project, "test", &workload, None, &resources, None).unwrap_err();
        assert!(matches!(err, ConvertError::NoContainers(_)));
    }
}
