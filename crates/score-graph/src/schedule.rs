use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use score_domain::{Params, ResourceUid};
use score_substitute::{scan_tokens, split_ref};
use serde_json::Value;

use crate::error::GraphError;

/// One resource as seen by the scheduler: its identity, its (merged) params,
/// and the local-name → uid table valid for resolving `${resources.<name>}`
/// placeholders inside those params (the table of the workload that first
/// declared it, per spec §4.4's source-workload attribution).
pub struct ResourceNode<'a> {
    pub uid: ResourceUid,
    pub params: &'a Params,
    pub name_resolution: &'a HashMap<String, ResourceUid>,
}

/// Build the dependency DAG over resource uids and return any topological
/// order, stably broken by uid when multiple nodes are simultaneously ready
/// (spec §4.5).
pub fn sort_resources(nodes: &[ResourceNode<'_>]) -> Result<Vec<ResourceUid>, GraphError> {
    let mut graph: DiGraph<ResourceUid, ()> = DiGraph::new();
    let mut index_of: HashMap<ResourceUid, NodeIndex> = HashMap::new();

    for node in nodes {
        let idx = graph.add_node(node.uid.clone());
        index_of.insert(node.uid.clone(), idx);
    }

    for node in nodes {
        for referenced in referenced_resource_names(node.params) {
            let Some(referenced_uid) = node.name_resolution.get(&referenced) else {
                // Unknown reference names are a substitution-time error, not
                // a scheduling concern; the scheduler only wires edges for
                // names it can resolve to a known resource.
                continue;
            };
            if referenced_uid == &node.uid {
                continue; // self-reference is nonsensical but not a 2-node cycle
            }
            if let (Some(&from), Some(&to)) =
                (index_of.get(referenced_uid), index_of.get(&node.uid))
            {
                graph.add_edge(from, to, ());
            }
        }
    }

    toposort_stable(&graph)
}

/// Kahn's algorithm with a lexicographically-ordered ready set, guaranteeing
/// a deterministic tie-break (spec §4.5, §5 ordering guarantee (a)).
fn toposort_stable(graph: &DiGraph<ResourceUid, ()>) -> Result<Vec<ResourceUid>, GraphError> {
    let mut in_degree: HashMap<NodeIndex, usize> = HashMap::new();
    for idx in graph.node_indices() {
        in_degree.insert(idx, 0);
    }
    for edge in graph.edge_indices() {
        let (_, target) = graph.edge_endpoints(edge).unwrap();
        *in_degree.get_mut(&target).unwrap() += 1;
    }

    let mut ready: BTreeSet<(String, NodeIndex)> = BTreeSet::new();
    for (&idx, &deg) in &in_degree {
        if deg == 0 {
            ready.insert((graph[idx].as_str().to_string(), idx));
        }
    }

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some((_, idx)) = ready.iter().next().cloned() {
        ready.remove(&(graph[idx].as_str().to_string(), idx));
        order.push(graph[idx].clone());

        for neighbor in graph.neighbors(idx) {
            let deg = in_degree.get_mut(&neighbor).unwrap();
            *deg -= 1;
            if *deg == 0 {
                ready.insert((graph[neighbor].as_str().to_string(), neighbor));
            }
        }
    }

    if order.len() != graph.node_count() {
        return Err(GraphError::Cycle);
    }
    Ok(order)
}

/// Collect every `<name>` appearing in a `${resources.<name>...}` placeholder
/// anywhere inside `params`.
fn referenced_resource_names(params: &Params) -> Vec<String> {
    let mut names = Vec::new();
    collect_from_value(&Value::Object(params.clone()), &mut names);
    names
}

fn collect_from_value(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for token in scan_tokens(s) {
                let parts = split_ref(&token);
                if parts.first().map(String::as_str) == Some("resources") {
                    if let Some(name) = parts.get(1) {
                        out.push(name.clone());
                    }
                }
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                collect_from_value(v, out);
            }
        }
        Value::Array(arr) => {
            for v in arr {
                collect_from_value(v, out);
            }
        }
        _ => {}
    }
}
