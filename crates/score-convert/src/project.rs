use std::collections::BTreeMap;

use serde::Serialize;

/// The generated Compose Project (spec §6's output document).
///
/// Serialized as YAML with two-space indentation by the caller. Keyed
/// mappings use `BTreeMap` so the emitted document has a stable key order
/// independent of insertion order, matching the deterministic-output
/// requirement in spec §5(c).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComposeProject {
    pub services: BTreeMap<String, ComposeService>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, ComposeVolume>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl ComposeProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named top-level volume. Idempotent: calling this more than
    /// once for the same name (as happens when a shared volume resource is
    /// referenced by multiple workloads) is a no-op after the first call.
    pub fn ensure_volume(&mut self, name: impl Into<String>) {
        self.volumes.entry(name.into()).or_default();
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComposeVolume {
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub external: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComposeService {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ports: Vec<PortMapping>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub volumes: Vec<ServiceVolumeMount>,
    #[serde(rename = "networkMode", skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl ComposeService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            build: None,
            entrypoint: None,
            command: None,
            environment: BTreeMap::new(),
            ports: Vec::new(),
            volumes: Vec::new(),
            network_mode: None,
            annotations: BTreeMap::new(),
            hostname: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PortMapping {
    pub published: String,
    pub target: String,
    pub protocol: String,
}

/// A volume attached to a service: either a named/provider-backed volume or a
/// generated file bind mount (spec §4.7/§4.8).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ServiceVolumeMount {
    Named(NamedVolumeMount),
    Bind(BindMount),
}

impl ServiceVolumeMount {
    pub fn source(&self) -> &str {
        match self {
            ServiceVolumeMount::Named(v) => &v.source,
            ServiceVolumeMount::Bind(b) => &b.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct NamedVolumeMount {
    pub source: String,
    pub target: String,
    #[serde(rename = "readOnly")]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct BindMount {
    #[serde(rename = "type")]
    pub kind: BindKind,
    pub source: String,
    pub target: String,
    #[serde(rename = "readOnly")]
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindKind {
    Bind,
}
