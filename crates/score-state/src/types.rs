use std::collections::HashMap;
use std::sync::Arc;

use score_domain::{Metadata, Params, ResourceUid, Workload};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A deferred output lookup, closing over whatever a provider needs to
/// resolve `${resources.<name>.<path>}` references lazily (spec §3's
/// "optionally a deferred output-lookup function that closes over the
/// provider"). Never persisted.
pub type OutputLookupFn = Arc<dyn Fn(&[&str]) -> Result<Value, String> + Send + Sync>;

/// The provisioned record of a single resource (spec §3 `ScoreResourceState`).
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreResourceState {
    #[serde(rename = "type")]
    pub res_type: String,
    pub class: String,
    pub id: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub params: Params,
    pub provisioner: String,
    #[serde(default)]
    pub state: Map<String, Value>,

    /// Resolved outputs, if the provider has run. Not persisted: outputs are
    /// recomputed on every provisioning pass (spec §4.9).
    #[serde(skip)]
    pub outputs: Option<Map<String, Value>>,

    /// Deferred output lookup. Not persisted.
    #[serde(skip)]
    pub output_lookup: Option<OutputLookupFn>,

    /// The workload that first primed this resource (spec §4.4, "useful for
    /// later error messages"). Not part of the wire format.
    #[serde(skip)]
    pub source_workload: String,

    /// Whether the provider that produced this state declared the `Subpath`
    /// capability (spec §4.7: a volume's non-empty `subPath` is rejected
    /// unless the provider opts in). Recorded fresh by `score-provision` on
    /// every provisioning pass; not part of the wire format.
    #[serde(skip)]
    pub supports_subpath: bool,
}

impl std::fmt::Debug for ScoreResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreResourceState")
            .field("res_type", &self.res_type)
            .field("class", &self.class)
            .field("id", &self.id)
            .field("provisioner", &self.provisioner)
            .field("outputs", &self.outputs)
            .field("source_workload", &self.source_workload)
            .finish()
    }
}

/// A validated workload plus its optional source-file path (spec §3
/// `ScoreWorkloadState`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreWorkloadState {
    pub spec: Workload,
    #[serde(default)]
    pub source_file: Option<String>,
}

/// The mega-structure holding everything a provisioning/conversion run needs
/// (spec §3 `State`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct State {
    #[serde(default)]
    pub workloads: HashMap<String, ScoreWorkloadState>,
    #[serde(default)]
    pub resources: HashMap<ResourceUid, ScoreResourceState>,
    #[serde(default)]
    pub shared_state: Map<String, Value>,
    pub compose_project: String,
    pub mounts_directory: String,
}

impl State {
    pub fn new(compose_project: impl Into<String>, mounts_directory: impl Into<String>) -> Self {
        Self {
            workloads: HashMap::new(),
            resources: HashMap::new(),
            shared_state: Map::new(),
            compose_project: compose_project.into(),
            mounts_directory: mounts_directory.into(),
        }
    }
}
