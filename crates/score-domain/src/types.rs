use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;

/// Free-form JSON-like mapping, used for workload metadata and resource params.
///
/// Represented as `serde_json::Map` (rather than a typed struct) because both
/// the substitution engine (`score-substitute`) and the provisioning loop
/// need to walk these trees generically — keys, nested maps, sequences and
/// scalars alike — without knowing their shape ahead of time.
pub type Metadata = Map<String, Value>;
pub type Params = Map<String, Value>;

/// A single named port exposed by a workload's service section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePort {
    pub port: u16,
    #[serde(rename = "targetPort")]
    pub target_port: Option<u16>,
    #[serde(default)]
    pub protocol: Option<String>,
}

/// A volume mount declared on a container, keyed by target path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub source: String,
    #[serde(default, rename = "path")]
    pub sub_path: Option<String>,
    #[serde(default, rename = "readOnly")]
    pub read_only: bool,
}

/// A file-backed bind mount declared on a container, keyed by target path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMount {
    pub content: Option<String>,
    #[serde(rename = "binaryContent")]
    pub binary_content: Option<String>,
    pub source: Option<String>,
    #[serde(default, rename = "noExpand")]
    pub no_expand: bool,
    pub mode: Option<String>,
}

impl FileMount {
    /// Returns true if exactly one of `content` / `binary_content` / `source` is set.
    pub fn has_single_content_source(&self) -> bool {
        let set = [
            self.content.is_some(),
            self.binary_content.is_some(),
            self.source.is_some(),
        ];
        set.iter().filter(|b| **b).count() == 1
    }
}

/// Resource requests/limits and probes are accepted in the schema but ignored
/// by the converter — warned, not errors (spec §3, §4.7).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedContainerFields {
    #[serde(default)]
    pub resources: Option<Value>,
    #[serde(default, rename = "readinessProbe")]
    pub readiness_probe: Option<Value>,
    #[serde(default, rename = "livenessProbe")]
    pub liveness_probe: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: String,
    #[serde(default)]
    pub command: Option<Vec<String>>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    pub volumes: HashMap<String, VolumeMount>,
    #[serde(default)]
    pub files: HashMap<String, FileMount>,
    #[serde(flatten)]
    pub unsupported: UnsupportedContainerFields,
}

/// One resource declaration within a workload (spec §3 "Resource declaration").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    #[serde(rename = "type")]
    pub res_type: String,
    #[serde(default = "default_class")]
    pub class: String,
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub params: Params,
}

fn default_class() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub metadata: Metadata,
    #[serde(default)]
    pub service: Option<HashMap<String, ServicePort>>,
    pub containers: HashMap<String, ContainerSpec>,
    #[serde(default)]
    pub resources: HashMap<String, ResourceDeclaration>,
}

impl Workload {
    /// The workload's `metadata.name`, required per spec §3.
    pub fn name(&self) -> Result<&str, DomainError> {
        self.metadata
            .get("name")
            .and_then(Value::as_str)
            .ok_or(DomainError::MissingMetadataName)
    }
}
